use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Content-addressed identifier for a log entry.
///
/// An `EntryHash` is the BLAKE3 hash of an entry's canonical encoding.
/// Identical entries always produce the same hash across replicas, which is
/// what makes it usable both for deduplication during merge and as the
/// final, stable tie-breaker when two entries carry equal causal stamps.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryHash([u8; 32]);

impl EntryHash {
    /// Compute an `EntryHash` from raw bytes.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Create an `EntryHash` from a pre-computed hash.
    pub fn from_hash(hash: [u8; 32]) -> Self {
        Self(hash)
    }

    /// The null hash (all zeros). Used as the placeholder while the real
    /// hash is being computed over the zeroed entry.
    pub const fn null() -> Self {
        Self([0u8; 32])
    }

    /// Returns `true` if this is the null hash.
    pub fn is_null(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for EntryHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryHash({})", self.short_hex())
    }
}

impl fmt::Display for EntryHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 32]> for EntryHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_content_same_hash() {
        let h1 = EntryHash::from_bytes(b"content");
        let h2 = EntryHash::from_bytes(b"content");
        assert_eq!(h1, h2);
    }

    #[test]
    fn different_content_different_hash() {
        let h1 = EntryHash::from_bytes(b"a");
        let h2 = EntryHash::from_bytes(b"b");
        assert_ne!(h1, h2);
    }

    #[test]
    fn null_is_null() {
        assert!(EntryHash::null().is_null());
        assert!(!EntryHash::from_bytes(b"x").is_null());
    }

    #[test]
    fn hex_roundtrip() {
        let h = EntryHash::from_bytes(b"roundtrip");
        let parsed = EntryHash::from_hex(&h.to_hex()).unwrap();
        assert_eq!(h, parsed);
    }

    #[test]
    fn from_hex_rejects_bad_length() {
        assert!(EntryHash::from_hex("abcd").is_err());
    }

    #[test]
    fn ordering_is_total() {
        let h1 = EntryHash::from_hash([0; 32]);
        let h2 = EntryHash::from_hash([1; 32]);
        assert!(h1 < h2);
    }
}
