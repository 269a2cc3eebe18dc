//! Report caches.
//!
//! [`ReportCache`] is the contract the client resolves against before going
//! to the network. Two backends implement it:
//!
//! - [`MemoryCache`]: bounded, process-local, size and idle-time eviction
//! - [`DirectoryCache`]: persistent, sharded, file-locked, shared between processes
//!
//! The backend is chosen from [`CacheConfig`] by [`build_cache`].
//!
//! # Example
//!
//! ```no_run
//! use ossindex_client::cache::{ReportCache, build_cache};
//! use ossindex_client::config::{CacheConfig, DirectoryCacheConfig};
//! use ossindex_client::marshal::JsonMarshaller;
//! use std::sync::Arc;
//!
//! let config = CacheConfig::Directory(DirectoryCacheConfig::new("/tmp/ossindex-cache"));
//! let cache = build_cache(&config, Arc::new(JsonMarshaller)).unwrap();
//! assert_eq!(cache.name(), "directory");
//! ```

mod directory;
mod lock;
mod memory;
mod stats;

pub use directory::DirectoryCache;
pub use memory::MemoryCache;
pub use stats::CacheStats;

use crate::config::CacheConfig;
use crate::error::Result;
use crate::marshal::Marshaller;
use crate::model::{ComponentReport, Identifier};
use sha1::{Digest, Sha1};
use std::sync::Arc;

/// Storage for resolved component reports.
///
/// A missing entry is `Ok(None)`, never an error. Backends swallow and log
/// their own I/O failures; the only error a caller sees is use after
/// [`close`](ReportCache::close).
pub trait ReportCache: Send + Sync {
    /// Look up the report for `id`.
    fn get_if_present(&self, id: &Identifier) -> Result<Option<ComponentReport>>;

    /// Store a set of resolved reports.
    fn put_all(&self, reports: &[(Identifier, ComponentReport)]) -> Result<()>;

    /// Release resources. Every later call, including another `close`, fails.
    fn close(&self) -> Result<()>;

    /// Backend name for log output.
    fn name(&self) -> &'static str;
}

/// Hex-encoded SHA-1 of the identifier's canonical string.
#[must_use]
pub fn entry_key(id: &Identifier) -> String {
    let mut hasher = Sha1::new();
    hasher.update(id.as_str().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Build the cache backend selected by `config`.
///
/// Directory setup failures propagate; nothing is created for a memory cache.
pub fn build_cache(
    config: &CacheConfig,
    marshaller: Arc<dyn Marshaller>,
) -> Result<Box<dyn ReportCache>> {
    tracing::debug!("Building {} cache", config.name());
    Ok(match config {
        CacheConfig::Memory(memory) => Box::new(MemoryCache::new(memory)),
        CacheConfig::Directory(directory) => Box::new(DirectoryCache::new(directory, marshaller)?),
    })
}
