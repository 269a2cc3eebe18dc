//! Configuration types for ossindex-client.
//!
//! All types are serde-(de)serializable so they can be loaded from YAML
//! config files, and derive `JsonSchema` for editor support.

use super::defaults::{
    DEFAULT_BASE_URL, DEFAULT_BATCH_SIZE, DEFAULT_EXPIRE_AFTER, DEFAULT_EXPIRE_AFTER_ACCESS,
    DEFAULT_MEMORY_MAXIMUM_SIZE, DEFAULT_PROXY_PORT, default_cache_dir,
};
use super::duration::parse_duration;
use super::validation::ConfigError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

// ============================================================================
// Client configuration
// ============================================================================

/// Top-level configuration for [`ReportClient`](crate::ReportClient).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the report service
    pub base_url: String,
    /// Identifiers submitted per round trip (1-1024)
    #[schemars(range(min = 1, max = 1024))]
    pub batch_size: usize,
    /// Report cache backend
    pub cache: CacheConfig,
    /// How batch responses are matched to requested identifiers
    pub correlation: CorrelationStrategy,
    /// Credentials for the report service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
    /// HTTP proxy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
    /// Transport timeouts
    pub timeout: TimeoutConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            cache: CacheConfig::default(),
            correlation: CorrelationStrategy::default(),
            auth: None,
            proxy: None,
            timeout: TimeoutConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the batch size.
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the cache backend.
    #[must_use]
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Set the correlation strategy.
    #[must_use]
    pub const fn with_correlation(mut self, correlation: CorrelationStrategy) -> Self {
        self.correlation = correlation;
        self
    }

    /// Set service credentials.
    #[must_use]
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set an HTTP proxy.
    #[must_use]
    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Base URL guaranteed to end with a trailing `/`.
    #[must_use]
    pub fn normalized_base_url(&self) -> String {
        let trimmed = self.base_url.trim();
        if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        }
    }
}

/// Strategy for matching batch response entries to requested identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CorrelationStrategy {
    /// Match each report by the coordinates it declares
    #[default]
    SelfDescribing,
    /// Match reports to identifiers by position
    Positional,
}

// ============================================================================
// Cache configuration
// ============================================================================

/// Report cache backend selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CacheConfig {
    /// Bounded, process-local cache
    Memory(MemoryCacheConfig),
    /// Persistent cache shared between processes
    Directory(DirectoryCacheConfig),
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::Memory(MemoryCacheConfig::default())
    }
}

impl CacheConfig {
    /// Backend name used in logs and CLI output.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Directory(_) => "directory",
        }
    }
}

/// Value retention for the in-memory cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ValueStrength {
    /// Values may be dropped early under memory pressure
    #[default]
    Soft,
    /// Values are kept until evicted by size or time
    Strong,
}

/// Settings for the in-memory cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MemoryCacheConfig {
    /// Maximum number of entries
    #[schemars(range(min = 1))]
    pub maximum_size: u64,
    /// Entries idle for longer than this are evicted
    #[serde(with = "super::duration::serde_str")]
    #[schemars(with = "String")]
    pub expire_after_access: Duration,
    /// Value retention
    pub value_strength: ValueStrength,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            maximum_size: DEFAULT_MEMORY_MAXIMUM_SIZE,
            expire_after_access: DEFAULT_EXPIRE_AFTER_ACCESS,
            value_strength: ValueStrength::default(),
        }
    }
}

impl FromStr for MemoryCacheConfig {
    type Err = ConfigError;

    /// Parse a compact spec such as `maximumSize=256,expireAfterAccess=2m,softValues`.
    ///
    /// Keys not mentioned keep their defaults.
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let mut config = Self::default();
        let invalid = |message: String| ConfigError {
            field: "cache.spec".to_string(),
            message,
        };

        for part in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('=') {
                Some(("maximumSize", value)) => {
                    config.maximum_size = value.trim().parse().map_err(|_| {
                        invalid(format!("Invalid maximumSize '{value}'"))
                    })?;
                }
                Some(("expireAfterAccess", value)) => {
                    config.expire_after_access =
                        parse_duration(value).map_err(|e| invalid(e.message))?;
                }
                None if part == "softValues" => config.value_strength = ValueStrength::Soft,
                None if part == "strongValues" => config.value_strength = ValueStrength::Strong,
                _ => return Err(invalid(format!("Unknown cache spec key '{part}'"))),
            }
        }

        Ok(config)
    }
}

impl fmt::Display for MemoryCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strength = match self.value_strength {
            ValueStrength::Soft => "softValues",
            ValueStrength::Strong => "strongValues",
        };
        write!(
            f,
            "maximumSize={},expireAfterAccess={},{strength}",
            self.maximum_size,
            super::duration::format_duration(self.expire_after_access)
        )
    }
}

/// Settings for the persistent directory cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DirectoryCacheConfig {
    /// Root of the sharded entry tree
    pub base_dir: PathBuf,
    /// Entries older than this are treated as missing and removed
    #[serde(with = "super::duration::serde_str")]
    #[schemars(with = "String")]
    pub expire_after: Duration,
}

impl Default for DirectoryCacheConfig {
    fn default() -> Self {
        Self {
            base_dir: default_cache_dir(),
            expire_after: DEFAULT_EXPIRE_AFTER,
        }
    }
}

impl DirectoryCacheConfig {
    /// Create a config rooted at `base_dir` with the default expiry.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Default::default()
        }
    }

    /// Set the entry expiry.
    #[must_use]
    pub const fn with_expire_after(mut self, expire_after: Duration) -> Self {
        self.expire_after = expire_after;
        self
    }
}

// ============================================================================
// Transport configuration
// ============================================================================

/// Username/password credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

impl AuthConfig {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Proxy scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProxyProtocol {
    #[default]
    Http,
    Https,
}

impl ProxyProtocol {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

/// HTTP proxy settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProxyConfig {
    #[serde(default)]
    pub protocol: ProxyProtocol,
    pub host: String,
    #[serde(default = "default_proxy_port")]
    pub port: u16,
    /// Hosts reached directly, `|` or `,` separated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_proxy_hosts: Option<String>,
    /// Proxy credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
}

const fn default_proxy_port() -> u16 {
    DEFAULT_PROXY_PORT
}

impl ProxyConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            protocol: ProxyProtocol::default(),
            host: host.into(),
            port,
            non_proxy_hosts: None,
            auth: None,
        }
    }

    /// Proxy URL in `scheme://host:port` form.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.protocol.as_str(), self.host, self.port)
    }
}

/// Timeouts handed to the transport. `None` means no timeout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TimeoutConfig {
    #[serde(
        with = "super::duration::serde_opt_str",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<String>")]
    pub connect_timeout: Option<Duration>,
    #[serde(
        with = "super::duration::serde_opt_str",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<String>")]
    pub read_timeout: Option<Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://ossindex.sonatype.org/");
        assert_eq!(config.batch_size, 64);
        assert_eq!(config.correlation, CorrelationStrategy::SelfDescribing);
        assert!(matches!(config.cache, CacheConfig::Memory(_)));
    }

    #[test]
    fn test_normalized_base_url() {
        let config = ClientConfig::default().with_base_url("http://localhost:8080/ossindex");
        assert_eq!(config.normalized_base_url(), "http://localhost:8080/ossindex/");
        let config = config.with_base_url("http://localhost:8080/");
        assert_eq!(config.normalized_base_url(), "http://localhost:8080/");
    }

    #[test]
    fn test_memory_spec_parsing() {
        let config: MemoryCacheConfig = "maximumSize=10,expireAfterAccess=30s,strongValues"
            .parse()
            .unwrap();
        assert_eq!(config.maximum_size, 10);
        assert_eq!(config.expire_after_access, Duration::from_secs(30));
        assert_eq!(config.value_strength, ValueStrength::Strong);

        let default_spec = MemoryCacheConfig::default().to_string();
        assert_eq!(default_spec, "maximumSize=256,expireAfterAccess=2m,softValues");
        assert_eq!(
            default_spec.parse::<MemoryCacheConfig>().unwrap(),
            MemoryCacheConfig::default()
        );
    }

    #[test]
    fn test_memory_spec_rejects_unknown_keys() {
        assert!("weakKeys".parse::<MemoryCacheConfig>().is_err());
        assert!("maximumSize=lots".parse::<MemoryCacheConfig>().is_err());
        assert!("expireAfterAccess=soon".parse::<MemoryCacheConfig>().is_err());
    }

    #[test]
    fn test_cache_config_tagged_yaml() {
        let yaml = "type: directory\nbase_dir: /tmp/ossindex\nexpire_after: 6h\n";
        let cache: CacheConfig = serde_yaml::from_str(yaml).unwrap();
        match cache {
            CacheConfig::Directory(dir) => {
                assert_eq!(dir.base_dir, PathBuf::from("/tmp/ossindex"));
                assert_eq!(dir.expire_after, Duration::from_secs(6 * 3600));
            }
            CacheConfig::Memory(_) => panic!("expected directory cache"),
        }
    }

    #[test]
    fn test_auth_debug_redacts_password() {
        let auth = AuthConfig::new("user", "hunter2");
        let debug = format!("{auth:?}");
        assert!(debug.contains("user"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_proxy_url() {
        let mut proxy = ProxyConfig::new("proxy.internal", 3128);
        assert_eq!(proxy.url(), "http://proxy.internal:3128");
        proxy.protocol = ProxyProtocol::Https;
        assert_eq!(proxy.url(), "https://proxy.internal:3128");
    }
}
