//! Plan cache keys: the flat shape encoding and its digest.

mod encode;

#[cfg(test)]
mod tests;

pub use encode::compute_key;
pub(crate) use encode::shape_sort_key;

use sha2::{Digest, Sha256};
use std::fmt;

///
/// PlanCacheKey
///
/// Opaque lookup address for a query shape. Equal keys are interchangeable
/// as cache addresses; they say nothing about plan validity across catalog
/// changes. Keys are compared for equality only and carry no ordering.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct PlanCacheKey(String);

impl PlanCacheKey {
    pub(crate) const fn from_encoded(encoded: String) -> Self {
        Self(encoded)
    }

    /// Human-diffable shape encoding.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compute a compact, stable digest of this key for diagnostics surfaces.
    #[must_use]
    pub fn fingerprint(&self) -> KeyFingerprint {
        let mut hasher = Sha256::new();
        hasher.update(b"plancachekey:v1");
        hasher.update(self.0.as_bytes());
        let digest = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        KeyFingerprint(out)
    }
}

impl fmt::Display for PlanCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

///
/// KeyFingerprint
///
/// SHA-256 digest of a plan cache key.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct KeyFingerprint([u8; 32]);

impl KeyFingerprint {
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn as_hex(&self) -> String {
        let mut out = String::with_capacity(64);
        for byte in self.0 {
            use std::fmt::Write as _;
            let _ = write!(out, "{byte:02x}");
        }
        out
    }

    /// First eight hex digits, for log lines.
    #[must_use]
    pub fn short_hex(&self) -> String {
        let mut out = self.as_hex();
        out.truncate(8);
        out
    }
}

impl fmt::Display for KeyFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_hex())
    }
}
