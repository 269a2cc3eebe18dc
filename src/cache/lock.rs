//! Advisory whole-file locks for persistent cache entries.
//!
//! A [`FileLock`] owns the open handle it locked. The lock is released when
//! the guard is dropped, so every exit path (including `?` and panics)
//! gives it back.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LockMode {
    Shared,
    Exclusive,
}

impl LockMode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Shared => "shared",
            Self::Exclusive => "exclusive",
        }
    }
}

/// Scoped advisory lock on one entry file.
#[derive(Debug)]
pub(crate) struct FileLock {
    file: File,
    path: PathBuf,
    mode: LockMode,
}

impl FileLock {
    /// Block until a shared lock is held on `file`.
    pub(crate) fn shared(file: File, path: &Path) -> io::Result<Self> {
        Self::acquire(file, path, LockMode::Shared)
    }

    /// Block until an exclusive lock is held on `file`.
    pub(crate) fn exclusive(file: File, path: &Path) -> io::Result<Self> {
        Self::acquire(file, path, LockMode::Exclusive)
    }

    fn acquire(file: File, path: &Path, mode: LockMode) -> io::Result<Self> {
        tracing::trace!("Acquiring {} lock: {}", mode.as_str(), path.display());
        match mode {
            LockMode::Shared => file.lock_shared()?,
            LockMode::Exclusive => file.lock()?,
        }
        tracing::trace!("Acquired {} lock: {}", mode.as_str(), path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
            mode,
        })
    }

    pub(crate) const fn file(&self) -> &File {
        &self.file
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) const fn mode(&self) -> LockMode {
        self.mode
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        match self.file.unlock() {
            Ok(()) => tracing::trace!(
                "Released {} lock: {}",
                self.mode.as_str(),
                self.path.display()
            ),
            // closing the handle releases it anyway
            Err(e) => tracing::debug!("Failed to unlock {}: {}", self.path.display(), e),
        }
    }
}

/// Run `f` while holding a shared lock on the file at `path`.
pub(crate) fn with_shared_lock<T>(
    path: &Path,
    f: impl FnOnce(&FileLock) -> io::Result<T>,
) -> io::Result<T> {
    let lock = FileLock::shared(File::open(path)?, path)?;
    f(&lock)
}

/// Run `f` while holding an exclusive lock on the file at `path`.
///
/// The file is opened for read and write and created if missing so the
/// lock has a target. Existing content is left in place for `f` to handle.
pub(crate) fn with_exclusive_lock<T>(
    path: &Path,
    f: impl FnOnce(&FileLock) -> io::Result<T>,
) -> io::Result<T> {
    let file = File::options()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?;
    let lock = FileLock::exclusive(file, path)?;
    f(&lock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    #[test]
    fn test_exclusive_lock_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entry");

        with_exclusive_lock(&path, |lock| {
            assert_eq!(lock.mode(), LockMode::Exclusive);
            let mut file = lock.file();
            file.write_all(b"payload")
        })
        .unwrap();

        let content = with_shared_lock(&path, |lock| {
            let mut content = String::new();
            let mut file = lock.file();
            file.read_to_string(&mut content)?;
            Ok(content)
        })
        .unwrap();
        assert_eq!(content, "payload");
    }

    #[test]
    fn test_shared_lock_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = with_shared_lock(&dir.path().join("absent"), |_| Ok(())).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_lock_released_on_error_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entry");

        let result: io::Result<()> =
            with_exclusive_lock(&path, |_| Err(io::Error::other("write failed")));
        assert!(result.is_err());

        // a second handle can lock again once the guard is gone
        let file = File::open(&path).unwrap();
        assert!(file.try_lock().is_ok());
    }

    #[test]
    fn test_shared_locks_coexist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entry");
        std::fs::write(&path, b"x").unwrap();

        let first = FileLock::shared(File::open(&path).unwrap(), &path).unwrap();
        let second = File::open(&path).unwrap();
        assert!(second.try_lock_shared().is_ok());
        assert_eq!(first.path(), path.as_path());
    }
}
