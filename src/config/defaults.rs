//! Default values for ossindex-client configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default remote service location.
pub const DEFAULT_BASE_URL: &str = "https://ossindex.sonatype.org/";

/// Default number of identifiers per batch request.
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Largest batch the service accepts.
pub const MAX_BATCH_SIZE: usize = 1024;

/// Default in-memory cache capacity.
pub const DEFAULT_MEMORY_MAXIMUM_SIZE: u64 = 256;

/// Default idle expiry for in-memory entries.
pub const DEFAULT_EXPIRE_AFTER_ACCESS: Duration = Duration::from_secs(2 * 60);

/// Default expiry for persisted entries.
pub const DEFAULT_EXPIRE_AFTER: Duration = Duration::from_secs(12 * 3600);

/// Default proxy port.
pub const DEFAULT_PROXY_PORT: u16 = 8080;

/// Default directory for persisted report entries.
#[must_use]
pub fn default_cache_dir() -> PathBuf {
    user_data_dir().join("report-cache")
}

/// Per-user data location for this client.
///
/// Linux keeps it under the XDG config directory, macOS under
/// `Application Support`, Windows under `LOCALAPPDATA`; anything else
/// falls back to a dot-directory in the home directory.
fn user_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    let dir = dirs::config_dir().map(|d| d.join("sonatype-ossindex"));

    #[cfg(target_os = "macos")]
    let dir = dirs::data_dir().map(|d| d.join("Sonatype").join("Ossindex"));

    #[cfg(target_os = "windows")]
    let dir = dirs::data_local_dir().map(|d| d.join("Sonatype").join("Ossindex"));

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    let dir: Option<PathBuf> = None;

    dir.or_else(|| dirs::home_dir().map(|h| h.join(".sonatype-ossindex")))
        .unwrap_or_else(|| PathBuf::from(".sonatype-ossindex"))
}
