//! Persistent cache statistics.

use serde::Serialize;
use std::fmt;

/// Snapshot of a directory cache's on-disk state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Entry files found under the shard tree
    pub total_entries: usize,
    /// Entries older than the configured expiry
    pub expired_entries: usize,
    /// Total size of entry files in bytes
    pub total_size: u64,
}

impl CacheStats {
    /// Entries that would still be served.
    #[must_use]
    pub const fn live_entries(&self) -> usize {
        self.total_entries.saturating_sub(self.expired_entries)
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries ({} expired), {} bytes",
            self.total_entries, self.expired_entries, self.total_size
        )
    }
}
