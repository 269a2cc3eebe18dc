//! Persistent report cache shared between processes.
//!
//! Each report lives in its own file under a two-level shard tree:
//!
//! ```text
//! <base_dir>/<h[0..2]>/<h[2..4]>/<h>      h = hex(sha1(identifier))
//! ```
//!
//! Entries carry no header. Age comes from the file's modification time.
//! Concurrent access to one entry is serialized with per-file advisory
//! locks; there is no directory-wide lock.

use super::lock::{FileLock, with_exclusive_lock, with_shared_lock};
use super::{CacheStats, ReportCache, entry_key};
use crate::config::DirectoryCacheConfig;
use crate::error::{ErrorContext, OssIndexError, Result};
use crate::marshal::Marshaller;
use crate::model::{ComponentReport, Identifier};
use std::fs::{self, Metadata};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, SystemTime};

/// Result of looking at an entry while holding a lock on it.
enum Inspection {
    Fresh(ComponentReport),
    Stale(Duration),
    Corrupt(String),
}

/// File-per-entry report cache with expiry by modification time.
pub struct DirectoryCache {
    base_dir: PathBuf,
    expire_after: Duration,
    marshaller: Arc<dyn Marshaller>,
    closed: AtomicBool,
}

impl DirectoryCache {
    /// Open a cache rooted at the configured directory, creating it if needed.
    ///
    /// Fails if the directory cannot be created or the path is not a directory.
    pub fn new(config: &DirectoryCacheConfig, marshaller: Arc<dyn Marshaller>) -> Result<Self> {
        let base_dir = config.base_dir.clone();
        if base_dir.exists() && !base_dir.is_dir() {
            return Err(OssIndexError::config(format!(
                "Not a directory: {}",
                base_dir.display()
            )));
        }
        fs::create_dir_all(&base_dir)
            .map_err(|e| OssIndexError::io(&base_dir, e))
            .context("creating cache directory")?;

        tracing::debug!(
            "Directory cache: {} (expire after {:?}, marshaller {})",
            base_dir.display(),
            config.expire_after,
            marshaller.name()
        );

        Ok(Self {
            base_dir,
            expire_after: config.expire_after,
            marshaller,
            closed: AtomicBool::new(false),
        })
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    #[must_use]
    pub const fn expire_after(&self) -> Duration {
        self.expire_after
    }

    /// Location of the entry file for `id`.
    #[must_use]
    pub fn entry_path(&self, id: &Identifier) -> PathBuf {
        let key = entry_key(id);
        self.base_dir.join(&key[0..2]).join(&key[2..4]).join(&key)
    }

    fn ensure_open(&self, operation: &str) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(OssIndexError::cache_closed(format!(
                "directory cache {operation}"
            )));
        }
        Ok(())
    }

    fn age(&self, metadata: &Metadata) -> io::Result<Duration> {
        let modified = metadata.modified()?;
        // mtime in the future counts as brand new
        Ok(SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO))
    }

    fn is_stale(&self, metadata: &Metadata) -> io::Result<bool> {
        Ok(self.age(metadata)? > self.expire_after)
    }

    fn inspect(&self, lock: &FileLock) -> io::Result<Inspection> {
        tracing::trace!("Inspecting {} ({:?})", lock.path().display(), lock.mode());
        let metadata = lock.file().metadata()?;
        let age = self.age(&metadata)?;
        if age > self.expire_after {
            return Ok(Inspection::Stale(age));
        }
        let mut reader = lock.file();
        Ok(match self.marshaller.unmarshal_report(&mut reader) {
            Ok(report) => Inspection::Fresh(report),
            Err(e) => Inspection::Corrupt(e.to_string()),
        })
    }

    /// Look up an entry, treating every I/O failure as a miss.
    fn read_entry(&self, path: &Path) -> Option<ComponentReport> {
        let inspection = match with_shared_lock(path, |lock| self.inspect(lock)) {
            Ok(inspection) => inspection,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read cache entry {}: {}", path.display(), e);
                return None;
            }
        };

        match inspection {
            Inspection::Fresh(report) => {
                tracing::trace!("Cache hit: {}", path.display());
                return Some(report);
            }
            Inspection::Stale(age) => {
                tracing::trace!("Cache entry expired ({:?} old): {}", age, path.display());
            }
            Inspection::Corrupt(reason) => {
                tracing::debug!("Corrupt cache entry {}: {}", path.display(), reason);
            }
        }

        // the shared lock is gone; re-check under an exclusive one before deleting
        self.purge_if_invalid(path);
        None
    }

    fn purge_if_invalid(&self, path: &Path) {
        let file = match fs::File::options().read(true).write(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return,
            Err(e) => {
                tracing::debug!("Unable to reopen cache entry {}: {}", path.display(), e);
                return;
            }
        };
        let lock = match FileLock::exclusive(file, path) {
            Ok(lock) => lock,
            Err(e) => {
                tracing::debug!("Unable to lock cache entry {}: {}", path.display(), e);
                return;
            }
        };

        match self.inspect(&lock) {
            // a writer replaced it in the meantime
            Ok(Inspection::Fresh(_)) => {}
            Ok(Inspection::Stale(_) | Inspection::Corrupt(_)) | Err(_) => {
                match fs::remove_file(path) {
                    Ok(()) => tracing::trace!("Removed cache entry: {}", path.display()),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => tracing::debug!(
                        "Failed to remove cache entry {}: {}",
                        path.display(),
                        e
                    ),
                }
            }
        }
        drop(lock);
    }

    fn write_entry(&self, path: &Path, report: &ComponentReport) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let result = with_exclusive_lock(path, |lock| {
            let mut file = lock.file();
            file.set_len(0)?;
            let mut buffer = Vec::new();
            self.marshaller
                .marshal_report(report, &mut buffer)
                .map_err(io::Error::other)?;
            file.write_all(&buffer)?;
            file.flush()?;
            file.sync_data()
        });
        if result.is_err() {
            // never leave a partial entry behind
            let _ = fs::remove_file(path);
        }
        result
    }

    /// Remove the entry for `id`. Returns whether a file was deleted.
    pub fn purge_entry(&self, id: &Identifier) -> Result<bool> {
        self.ensure_open("purge")?;
        let path = self.entry_path(id);
        let removed = with_exclusive_lock_if_exists(&path, || fs::remove_file(&path))
            .map_err(|e| OssIndexError::io(&path, e))
            .context("purging cache entry")?;
        if removed {
            tracing::debug!("Purged cache entry for {}", id);
        }
        Ok(removed)
    }

    /// Remove every entry file. Returns the number of entries removed.
    pub fn clear(&self) -> Result<usize> {
        self.ensure_open("clear")?;
        let mut removed = 0;
        for path in self.entry_files()? {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(OssIndexError::io(&path, e)).context("clearing cache"),
            }
        }
        tracing::debug!("Cleared {} cache entries from {}", removed, self.base_dir.display());
        Ok(removed)
    }

    /// Count entries, expired entries and bytes on disk.
    pub fn stats(&self) -> Result<CacheStats> {
        self.ensure_open("stats")?;
        let mut stats = CacheStats::default();
        for path in self.entry_files()? {
            let Ok(metadata) = fs::metadata(&path) else {
                continue;
            };
            stats.total_entries += 1;
            stats.total_size += metadata.len();
            if self.is_stale(&metadata).unwrap_or(false) {
                stats.expired_entries += 1;
            }
        }
        Ok(stats)
    }

    /// Entry files in the two shard levels below the base directory.
    fn entry_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for first in shard_dirs(&self.base_dir)? {
            for second in shard_dirs(&first)? {
                let entries = fs::read_dir(&second).map_err(|e| OssIndexError::io(&second, e))?;
                files.extend(
                    entries
                        .flatten()
                        .map(|entry| entry.path())
                        .filter(|path| path.is_file()),
                );
            }
        }
        Ok(files)
    }
}

fn shard_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| OssIndexError::io(dir, e))?;
    Ok(entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_dir()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.len() == 2)
        })
        .collect())
}

/// Run `f` under an exclusive lock if the file at `path` exists.
fn with_exclusive_lock_if_exists(path: &Path, f: impl FnOnce() -> io::Result<()>) -> io::Result<bool> {
    let file = match fs::File::options().read(true).write(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    let _lock = FileLock::exclusive(file, path)?;
    match f() {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

impl ReportCache for DirectoryCache {
    fn get_if_present(&self, id: &Identifier) -> Result<Option<ComponentReport>> {
        self.ensure_open("get")?;
        Ok(self.read_entry(&self.entry_path(id)))
    }

    fn put_all(&self, reports: &[(Identifier, ComponentReport)]) -> Result<()> {
        self.ensure_open("put")?;
        for (id, report) in reports {
            let path = self.entry_path(id);
            tracing::trace!("Caching {} -> {}", id, path.display());
            if let Err(e) = self.write_entry(&path, report) {
                tracing::warn!("Failed to write cache entry {}: {}", path.display(), e);
            }
        }
        Ok(())
    }

    fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(OssIndexError::cache_closed("directory cache close"));
        }
        tracing::debug!("Closed directory cache: {}", self.base_dir.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "directory"
    }
}

impl std::fmt::Debug for DirectoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryCache")
            .field("base_dir", &self.base_dir)
            .field("expire_after", &self.expire_after)
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
