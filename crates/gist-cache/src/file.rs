//! File-based cache implementation.
//!
//! [`FileCache`] stores each entry as a plain-text file with no header:
//!
//! ```text
//! {base}/
//! +-- 3f5a...e1.cache    # raw gist body for one (id, filename) pair
//! +-- 9b0c...42.cache
//! ```
//!
//! Writes go to a temporary file in the same directory which is then renamed
//! over the target, so concurrent readers see either the old entry, the new
//! entry, or no entry at all.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::{CacheError, CacheKey, GistCache};

/// File-based [`GistCache`] rooted at a directory on disk.
///
/// The directory does not need to exist up front; it is created on the first
/// write.
#[derive(Debug, Clone)]
pub struct FileCache {
    base: PathBuf,
}

impl FileCache {
    /// Create a cache rooted at `base`.
    #[must_use]
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Cache root directory.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Path of the file holding the entry for `key`.
    #[must_use]
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.base.join(key.file_name())
    }
}

impl GistCache for FileCache {
    fn get(&self, key: &CacheKey) -> Result<Option<String>, CacheError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => {
                tracing::debug!(path = %path.display(), "cache hit");
                Ok(Some(content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CacheError::Read { path, source }),
        }
    }

    fn set(&self, key: &CacheKey, content: &str) -> Result<(), CacheError> {
        let path = self.path_for(key);
        let write_err = |source: std::io::Error| CacheError::Write {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.base).map_err(write_err)?;

        let mut tmp = NamedTempFile::new_in(&self.base).map_err(write_err)?;
        tmp.write_all(content.as_bytes()).map_err(write_err)?;
        tmp.persist(&path).map_err(|e| write_err(e.error))?;

        tracing::debug!(path = %path.display(), bytes = content.len(), "cache entry written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_file_cache_set_and_get() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path());
        let key = CacheKey::new("abc123", Some("hello.py"));

        cache.set(&key, "print(\"hi\")\n").unwrap();
        assert_eq!(cache.get(&key).unwrap(), Some("print(\"hi\")\n".to_owned()));
    }

    #[test]
    fn test_file_cache_miss_is_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path());

        assert_eq!(cache.get(&CacheKey::new("deadbeef", None)).unwrap(), None);
    }

    #[test]
    fn test_file_cache_missing_base_dir_is_a_miss() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path().join("not/created/yet"));

        assert_eq!(cache.get(&CacheKey::new("abc", None)).unwrap(), None);
    }

    #[test]
    fn test_file_cache_creates_base_dir_on_write() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("deeply/nested/cache");
        let cache = FileCache::new(&base);
        let key = CacheKey::new("abc", None);

        assert!(!base.exists());
        cache.set(&key, "body").unwrap();

        assert!(base.is_dir());
        assert_eq!(cache.get(&key).unwrap(), Some("body".to_owned()));
    }

    #[test]
    fn test_file_cache_layout() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path());
        let key = CacheKey::new("abc123", None);

        cache.set(&key, "raw body").unwrap();

        let expected = tmp.path().join(format!("{}.cache", key.as_hex()));
        assert_eq!(cache.path_for(&key), expected);
        // Plain text, no header
        assert_eq!(fs::read_to_string(expected).unwrap(), "raw body");
        // No temp files left behind
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_file_cache_overwrite() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path());
        let key = CacheKey::new("abc", None);

        cache.set(&key, "first").unwrap();
        cache.set(&key, "second").unwrap();

        assert_eq!(cache.get(&key).unwrap(), Some("second".to_owned()));
    }

    #[test]
    fn test_file_cache_filenames_are_isolated() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path());
        let a = CacheKey::new("abc", Some("a.py"));
        let b = CacheKey::new("abc", Some("b.py"));

        cache.set(&a, "alpha").unwrap();
        cache.set(&b, "beta").unwrap();

        assert_eq!(cache.get(&a).unwrap(), Some("alpha".to_owned()));
        assert_eq!(cache.get(&b).unwrap(), Some("beta".to_owned()));
        assert_eq!(cache.get(&CacheKey::new("abc", None)).unwrap(), None);
    }

    #[test]
    fn test_file_cache_unicode_round_trip() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path());
        let key = CacheKey::new("f00d", None);
        let content = "fn main() {\r\n    println!(\"héllo → 世界\");\r\n}\n";

        cache.set(&key, content).unwrap();
        assert_eq!(cache.get(&key).unwrap().as_deref(), Some(content));
    }

    #[test]
    fn test_file_cache_invalid_utf8_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path());
        let key = CacheKey::new("abc", None);
        fs::write(cache.path_for(&key), [0xFF, 0xFE, 0x00]).unwrap();

        let err = cache.get(&key).unwrap_err();
        assert!(matches!(err, CacheError::Read { .. }));
    }

    #[test]
    fn test_file_cache_entry_path_is_directory_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path());
        let key = CacheKey::new("abc", None);
        fs::create_dir(cache.path_for(&key)).unwrap();

        assert!(matches!(
            cache.get(&key).unwrap_err(),
            CacheError::Read { .. }
        ));
    }

    #[test]
    fn test_file_cache_base_is_file_is_write_error() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("occupied");
        fs::write(&base, "not a directory").unwrap();
        let cache = FileCache::new(&base);

        let err = cache.set(&CacheKey::new("abc", None), "body").unwrap_err();
        assert!(matches!(err, CacheError::Write { .. }));
    }

    #[test]
    fn test_file_cache_concurrent_writers() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path());

        std::thread::scope(|s| {
            for i in 0..8 {
                let cache = &cache;
                s.spawn(move || {
                    let key = CacheKey::new("abc", Some(&format!("f{}.txt", i % 4)));
                    cache.set(&key, &format!("content {}", i % 4)).unwrap();
                });
            }
        });

        for i in 0..4 {
            let key = CacheKey::new("abc", Some(&format!("f{i}.txt")));
            assert_eq!(cache.get(&key).unwrap(), Some(format!("content {i}")));
        }
    }
}
