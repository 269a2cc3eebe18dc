//! Bounded in-process report cache.

use super::ReportCache;
use crate::config::{MemoryCacheConfig, ValueStrength};
use crate::error::{OssIndexError, Result};
use crate::model::{ComponentReport, Identifier};
use moka::sync::Cache;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory report cache using Moka (size bound plus time-to-idle).
///
/// Safe to share between threads; `get_if_present` and `put_all` need no
/// external synchronization.
pub struct MemoryCache {
    inner: Cache<Identifier, ComponentReport>,
    closed: AtomicBool,
}

impl MemoryCache {
    pub fn new(config: &MemoryCacheConfig) -> Self {
        tracing::debug!("Creating memory cache: {}", config);
        if config.value_strength == ValueStrength::Soft {
            // no collector-driven reclamation here; the size bound is the only pressure valve
            tracing::debug!("Soft values are held strongly");
        }
        let inner = Cache::builder()
            .max_capacity(config.maximum_size)
            .time_to_idle(config.expire_after_access)
            .build();
        Self {
            inner,
            closed: AtomicBool::new(false),
        }
    }

    /// Approximate number of cached entries.
    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }

    fn ensure_open(&self, operation: &str) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(OssIndexError::cache_closed(format!(
                "memory cache {operation}"
            )));
        }
        Ok(())
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(&MemoryCacheConfig::default())
    }
}

impl ReportCache for MemoryCache {
    fn get_if_present(&self, id: &Identifier) -> Result<Option<ComponentReport>> {
        self.ensure_open("get")?;
        Ok(self.inner.get(id))
    }

    fn put_all(&self, reports: &[(Identifier, ComponentReport)]) -> Result<()> {
        self.ensure_open("put")?;
        for (id, report) in reports {
            self.inner.insert(id.clone(), report.clone());
        }
        Ok(())
    }

    fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(OssIndexError::cache_closed("memory cache close"));
        }
        self.inner.invalidate_all();
        tracing::debug!("Closed memory cache");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entries", &self.inner.entry_count())
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn report(coordinates: &str) -> (Identifier, ComponentReport) {
        let id = Identifier::new(coordinates);
        (id.clone(), ComponentReport::new(id))
    }

    #[test]
    fn test_put_then_get() {
        let cache = MemoryCache::default();
        let entry = report("pkg:maven/commons-fileupload/commons-fileupload@1.3");
        assert!(cache.get_if_present(&entry.0).unwrap().is_none());

        cache.put_all(std::slice::from_ref(&entry)).unwrap();
        assert_eq!(cache.get_if_present(&entry.0).unwrap(), Some(entry.1));
    }

    #[test]
    fn test_size_bound() {
        let config = MemoryCacheConfig {
            maximum_size: 2,
            ..MemoryCacheConfig::default()
        };
        let cache = MemoryCache::new(&config);
        let entries: Vec<_> = (0..20).map(|i| report(&format!("pkg:npm/p{i}@1"))).collect();
        cache.put_all(&entries).unwrap();
        assert!(cache.entry_count() <= 2);
    }

    #[test]
    fn test_expire_after_access() {
        let config = MemoryCacheConfig {
            expire_after_access: Duration::from_millis(50),
            ..MemoryCacheConfig::default()
        };
        let cache = MemoryCache::new(&config);
        let entry = report("pkg:npm/left-pad@1.0.0");
        cache.put_all(std::slice::from_ref(&entry)).unwrap();
        std::thread::sleep(Duration::from_millis(200));
        assert!(cache.get_if_present(&entry.0).unwrap().is_none());
    }

    #[test]
    fn test_operations_after_close_fail() {
        let cache = MemoryCache::default();
        let entry = report("pkg:npm/a@1");
        cache.close().unwrap();

        assert!(cache.get_if_present(&entry.0).unwrap_err().is_cache_error());
        assert!(cache.put_all(&[entry]).is_err());
        assert!(cache.close().is_err());
    }

    #[test]
    fn test_concurrent_access() {
        let cache = std::sync::Arc::new(MemoryCache::default());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let cache = std::sync::Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        let entry = report(&format!("pkg:npm/t{t}-{i}@1"));
                        cache.put_all(std::slice::from_ref(&entry)).unwrap();
                        assert!(cache.get_if_present(&entry.0).unwrap().is_some());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
