//! Configuration validation for ossindex-client.
//!
//! Provides validation traits and implementations for all configuration types.

use super::defaults::MAX_BATCH_SIZE;
use super::types::*;
use crate::error::{OssIndexError, Result};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

impl ClientConfig {
    /// Validate and convert any problems into a single configuration error.
    pub fn validated(&self) -> Result<&Self> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(self);
        }
        let message = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(OssIndexError::config(message))
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for ClientConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            errors.push(ConfigError::new("base_url", "Base-URL required"));
        } else {
            let rest = base_url
                .strip_prefix("https://")
                .or_else(|| base_url.strip_prefix("http://"));
            match rest {
                Some(host) if !host.is_empty() && !host.starts_with('/') => {}
                _ => errors.push(ConfigError::new(
                    "base_url",
                    format!("Expected an absolute http(s) URL, got '{base_url}'"),
                )),
            }
        }

        if !(1..=MAX_BATCH_SIZE).contains(&self.batch_size) {
            errors.push(ConfigError::new(
                "batch_size",
                format!(
                    "Batch-size out of range; must be between 1 and {MAX_BATCH_SIZE}, got {}",
                    self.batch_size
                ),
            ));
        }

        errors.extend(self.cache.validate());

        if let Some(ref auth) = self.auth {
            errors.extend(prefixed("auth", auth.validate()));
        }
        if let Some(ref proxy) = self.proxy {
            errors.extend(prefixed("proxy", proxy.validate()));
        }

        errors
    }
}

impl Validatable for CacheConfig {
    fn validate(&self) -> Vec<ConfigError> {
        match self {
            Self::Memory(memory) => prefixed("cache", memory.validate()),
            Self::Directory(directory) => prefixed("cache", directory.validate()),
        }
    }
}

impl Validatable for MemoryCacheConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.maximum_size == 0 {
            errors.push(ConfigError::new(
                "maximum_size",
                "Maximum size must be at least 1",
            ));
        }
        if self.expire_after_access.is_zero() {
            errors.push(ConfigError::new(
                "expire_after_access",
                "Expiry must be greater than zero",
            ));
        }
        errors
    }
}

impl Validatable for DirectoryCacheConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.base_dir.as_os_str().is_empty() {
            errors.push(ConfigError::new(
                "base_dir",
                "Missing required base-directory",
            ));
        } else if self.base_dir.exists() && !self.base_dir.is_dir() {
            errors.push(ConfigError::new(
                "base_dir",
                format!("Not a directory: {}", self.base_dir.display()),
            ));
        }
        if self.expire_after.is_zero() {
            errors.push(ConfigError::new(
                "expire_after",
                "Expiry must be greater than zero",
            ));
        }
        errors
    }
}

impl Validatable for AuthConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.username.is_empty() {
            errors.push(ConfigError::new("username", "Missing: username"));
        }
        if self.username.contains(':') {
            errors.push(ConfigError::new(
                "username",
                "Username must not contain ':'",
            ));
        }
        errors
    }
}

impl Validatable for ProxyConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.host.trim().is_empty() {
            errors.push(ConfigError::new("host", "Proxy host required"));
        }
        if self.port == 0 {
            errors.push(ConfigError::new("port", "Proxy port must be non-zero"));
        }
        if let Some(ref auth) = self.auth {
            errors.extend(prefixed("auth", auth.validate()));
        }
        errors
    }
}

/// Qualify nested field names, e.g. `maximum_size` -> `cache.maximum_size`.
fn prefixed(prefix: &str, errors: Vec<ConfigError>) -> Vec<ConfigError> {
    errors
        .into_iter()
        .map(|e| ConfigError {
            field: format!("{prefix}.{}", e.field),
            message: e.message,
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ClientConfig::default().is_valid());
    }

    #[test]
    fn test_batch_size_bounds() {
        assert!(ClientConfig::default().with_batch_size(1).is_valid());
        assert!(ClientConfig::default().with_batch_size(1024).is_valid());

        let errors = ClientConfig::default().with_batch_size(0).validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "batch_size");

        assert!(!ClientConfig::default().with_batch_size(1025).is_valid());
    }

    #[test]
    fn test_base_url_required() {
        let errors = ClientConfig::default().with_base_url("").validate();
        assert_eq!(errors[0].message, "Base-URL required");

        assert!(!ClientConfig::default().with_base_url("ftp://example.com").is_valid());
        assert!(!ClientConfig::default().with_base_url("https://").is_valid());
        assert!(ClientConfig::default().with_base_url("http://localhost:8080").is_valid());
    }

    #[test]
    fn test_nested_cache_errors_are_prefixed() {
        let config = ClientConfig::default().with_cache(CacheConfig::Memory(MemoryCacheConfig {
            maximum_size: 0,
            ..MemoryCacheConfig::default()
        }));
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "cache.maximum_size");
    }

    #[test]
    fn test_directory_cache_rejects_file_base_dir() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = DirectoryCacheConfig::new(file.path());
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with("Not a directory"));

        let zero = DirectoryCacheConfig::new("/tmp/x").with_expire_after(Duration::ZERO);
        assert!(!zero.is_valid());
    }

    #[test]
    fn test_validated_collects_messages() {
        let config = ClientConfig::default().with_base_url("").with_batch_size(0);
        match config.validated() {
            Err(OssIndexError::Config(message)) => {
                assert!(message.contains("base_url"));
                assert!(message.contains("batch_size"));
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_proxy_validation() {
        let mut proxy = ProxyConfig::new("", 0);
        proxy.auth = Some(AuthConfig::new("", "secret"));
        let fields: Vec<_> = proxy.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, ["host", "port", "auth.username"]);
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::new("batch_size", "out of range");
        assert_eq!(error.to_string(), "batch_size: out of range");
    }
}
