//! Cache key derivation.

use std::fmt;

use sha2::{Digest, Sha256};

/// Deterministic digest identifying one Gist fetch.
///
/// Computed as SHA-256 over the gist id, followed by a NUL separator and the
/// filename when one is given. Gist ids are hex, so the separator cannot
/// occur inside an id and `(id, None)` never collides with `(id, Some(""))`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    digest: String,
}

impl CacheKey {
    /// Derive the key for a gist id and optional filename.
    #[must_use]
    pub fn new(gist_id: &str, filename: Option<&str>) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(gist_id.as_bytes());
        if let Some(filename) = filename {
            hasher.update([0u8]);
            hasher.update(filename.as_bytes());
        }
        Self {
            digest: hex::encode(hasher.finalize()),
        }
    }

    /// Lowercase hex digest (64 characters).
    #[must_use]
    pub fn as_hex(&self) -> &str {
        &self.digest
    }

    /// Name of the cache file for this key.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.cache", self.digest)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digest)
    }
}
