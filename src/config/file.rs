//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::ClientConfig;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".ossindex.yaml",
    ".ossindex.yml",
    "ossindex.yaml",
    "ossindex.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. User config directory (~/.config/ossindex/)
/// 4. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then(|| path.to_path_buf());
    }

    if let Some(path) = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_in_dir(&cwd))
    {
        return Some(path);
    }

    if let Some(path) =
        dirs::config_dir().and_then(|dir| find_config_in_dir(&dir.join("ossindex")))
    {
        return Some(path);
    }

    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigFileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load a `ClientConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<ClientConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: ClientConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from an explicit or discovered file, or return defaults.
///
/// An explicit path that cannot be loaded is an error; a discovered file
/// that fails to parse is logged and skipped.
pub fn load_or_default(
    explicit_path: Option<&Path>,
) -> Result<(ClientConfig, Option<PathBuf>), ConfigFileError> {
    if let Some(path) = explicit_path {
        return load_config_file(path).map(|config| (config, Some(path.to_path_buf())));
    }

    Ok(discover_config_file(None).map_or_else(
        || (ClientConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (ClientConfig::default(), None)
            }
        },
    ))
}

/// Generate an example YAML configuration.
#[must_use]
pub fn generate_example_config() -> String {
    let example = r#"# ossindex-client configuration
#
# Place this file at ./.ossindex.yaml or ~/.config/ossindex/ossindex.yaml

# Report service location
base_url: https://ossindex.sonatype.org/

# Identifiers per round trip (1-1024)
batch_size: 64

# Report cache: either an in-memory cache...
#
# cache:
#   type: memory
#   maximum_size: 256
#   expire_after_access: 2m
#   value_strength: soft
#
# ...or a persistent cache shared between processes
cache:
  type: directory
  # base_dir: /var/cache/ossindex   (defaults to the per-user data directory)
  expire_after: 12h

# Match responses by declared coordinates (self-describing) or position (positional)
correlation: self-describing

# auth:
#   username: user@example.com
#   password: api-token

# proxy:
#   protocol: http
#   host: proxy.example.com
#   port: 8080

timeout:
  connect_timeout: 30s
  read_timeout: 60s
"#;
    example.to_string()
}
