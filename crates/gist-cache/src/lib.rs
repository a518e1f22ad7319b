//! On-disk cache for fetched Gist bodies.
//!
//! The cache is keyed by a [`CacheKey`] derived from the gist id and an
//! optional filename. Two implementations of [`GistCache`] are provided:
//!
//! - [`FileCache`]: one plain-text file per key, `<base>/<hexdigest>.cache`
//! - [`NullCache`]: no-op store used when caching is disabled (always misses)
//!
//! Entries are never invalidated or removed by this crate. Operators clear
//! the cache by deleting the directory.
//!
//! # Example
//!
//! ```
//! use gist_cache::{CacheKey, GistCache, NullCache};
//!
//! let cache = NullCache;
//! let key = CacheKey::new("abc123", None);
//! cache.set(&key, "print('hi')").unwrap();
//! assert_eq!(cache.get(&key).unwrap(), None); // NullCache always misses
//! ```

mod file;
mod key;

use std::path::PathBuf;

pub use file::FileCache;
pub use key::CacheKey;

/// Cache I/O failure.
///
/// A missing entry is not an error; [`GistCache::get`] reports it as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Reading an existing entry failed (permissions, invalid UTF-8, bad path).
    #[error("failed to read cache entry {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Writing an entry failed.
    #[error("failed to write cache entry {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Store for raw Gist bodies.
///
/// Implementations must tolerate concurrent readers and concurrent writers
/// of distinct keys. Writers of the same key may race, but a reader must never
/// observe a partially written entry.
pub trait GistCache: Send + Sync {
    /// Look up the cached body for `key`.
    ///
    /// Returns `Ok(None)` when no entry exists.
    fn get(&self, key: &CacheKey) -> Result<Option<String>, CacheError>;

    /// Store `content` under `key`, replacing any previous entry.
    fn set(&self, key: &CacheKey, content: &str) -> Result<(), CacheError>;
}

/// No-op [`GistCache`] that never stores or retrieves data.
///
/// Use when caching is disabled.
pub struct NullCache;

impl GistCache for NullCache {
    fn get(&self, _key: &CacheKey) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    fn set(&self, _key: &CacheKey, _content: &str) -> Result<(), CacheError> {
        Ok(())
    }
}
