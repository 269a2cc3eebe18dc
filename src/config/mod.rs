//! Configuration module for ossindex-client.
//!
//! This module provides:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ossindex_client::config::{ClientConfig, CacheConfig, DirectoryCacheConfig};
//!
//! let config = ClientConfig::default()
//!     .with_batch_size(128)
//!     .with_cache(CacheConfig::Directory(DirectoryCacheConfig::new("/var/cache/ossindex")));
//!
//! // Load from file
//! use ossindex_client::config::load_or_default;
//! let (config, loaded_from) = load_or_default(None)?;
//! ```
//!
//! # Configuration File
//!
//! Place a `.ossindex.yaml` file in your project root or `~/.config/ossindex/`:
//!
//! ```yaml
//! batch_size: 128
//! cache:
//!   type: directory
//!   expire_after: 12h
//! ```

mod defaults;
pub mod duration;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    DEFAULT_BASE_URL, DEFAULT_BATCH_SIZE, DEFAULT_EXPIRE_AFTER, DEFAULT_EXPIRE_AFTER_ACCESS,
    DEFAULT_MEMORY_MAXIMUM_SIZE, MAX_BATCH_SIZE, default_cache_dir,
};
pub use duration::parse_duration;
pub use types::{
    AuthConfig, CacheConfig, ClientConfig, CorrelationStrategy, DirectoryCacheConfig,
    MemoryCacheConfig, ProxyConfig, ProxyProtocol, TimeoutConfig, ValueStrength,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    ConfigFileError, discover_config_file, generate_example_config, load_config_file,
    load_or_default,
};

/// Generate a JSON Schema for the `ClientConfig` configuration format.
pub fn generate_json_schema() -> crate::error::Result<String> {
    let schema = schemars::schema_for!(ClientConfig);
    Ok(serde_json::to_string_pretty(&schema)?)
}
