use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// On-disk URL→bytes store with an age-based staleness policy.
///
/// One file per URL, named by the hex SHA-256 of the URL. Entries are
/// read-then-write with no locking; concurrent invocations of the whole
/// tool against one cache directory are not protected against interleaved
/// writes.
#[derive(Debug, Clone)]
pub struct PageCache {
    dir: PathBuf,
}

impl PageCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        self.dir.join(hex::encode(Sha256::digest(url.as_bytes())))
    }

    /// Cached bytes for `url`, only when the entry's age is within budget.
    /// Any I/O problem reads as a miss.
    pub fn lookup(&self, url: &str, max_age: Duration) -> Option<Vec<u8>> {
        let path = self.entry_path(url);
        let modified = fs::metadata(&path).ok()?.modified().ok()?;
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or_default();
        if age > max_age {
            return None;
        }
        fs::read(&path).ok()
    }

    /// Persist `bytes` for `url` unconditionally, empty results included,
    /// so a dead link is not re-fetched on every run.
    pub fn store(&self, url: &str, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|source| Error::CreateCacheDir {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.entry_path(url);
        fs::write(&path, bytes).map_err(|source| Error::WriteCacheEntry { path, source })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ONE_DAY;

    #[test]
    fn stored_entries_come_back_within_budget() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PageCache::new(dir.path());
        cache.store("http://example.org/page", b"hello").unwrap();
        assert_eq!(
            cache.lookup("http://example.org/page", ONE_DAY),
            Some(b"hello".to_vec())
        );
    }

    #[test]
    fn missing_entries_are_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PageCache::new(dir.path());
        assert_eq!(cache.lookup("http://example.org/nothing", ONE_DAY), None);
    }

    #[test]
    fn empty_results_are_persisted_too() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PageCache::new(dir.path());
        cache.store("http://example.org/dead-link", b"").unwrap();
        assert_eq!(
            cache.lookup("http://example.org/dead-link", ONE_DAY),
            Some(Vec::new())
        );
    }

    #[test]
    fn distinct_urls_get_distinct_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PageCache::new(dir.path());
        cache.store("http://example.org/a", b"a").unwrap();
        cache.store("http://example.org/b", b"b").unwrap();
        assert_eq!(cache.lookup("http://example.org/a", ONE_DAY), Some(b"a".to_vec()));
        assert_eq!(cache.lookup("http://example.org/b", ONE_DAY), Some(b"b".to_vec()));
    }
}
