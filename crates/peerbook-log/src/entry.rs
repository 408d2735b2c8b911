use serde::{Deserialize, Serialize};
use peerbook_types::{CausalStamp, EntryHash, Operation};

use crate::error::LogError;

/// Domain separator mixed into every entry hash.
const ENTRY_DOMAIN: &[u8] = b"peerbook-entry-v1:";

/// An admitted-or-proposed log entry: an operation plus its causal stamp
/// and content hash.
///
/// The hash is computed over the canonical JSON encoding of the entry
/// with its own hash field zeroed, so every replica derives the same hash
/// for the same entry. `(stamp, hash)` is the total order merge uses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// The proposed mutation.
    pub op: Operation,
    /// Causal stamp assigned by the appending replica's clock.
    pub stamp: CausalStamp,
    /// Content hash of the sealed entry.
    pub hash: EntryHash,
}

impl LogEntry {
    /// Seal an operation into an entry: stamp it and compute its hash.
    pub fn seal(op: Operation, stamp: CausalStamp) -> Result<Self, LogError> {
        let mut entry = Self {
            op,
            stamp,
            hash: EntryHash::null(),
        };
        entry.hash = entry.compute_hash()?;
        Ok(entry)
    }

    /// Recompute the hash and compare against the stored one.
    pub fn verify_hash(&self) -> Result<bool, LogError> {
        Ok(self.compute_hash()? == self.hash)
    }

    /// Total merge order: causal stamp first, content hash as the stable
    /// tie-breaker.
    pub fn merge_key(&self) -> (CausalStamp, EntryHash) {
        (self.stamp, self.hash)
    }

    fn compute_hash(&self) -> Result<EntryHash, LogError> {
        let mut canonical = self.clone();
        canonical.hash = EntryHash::null();
        let encoded = serde_json::to_vec(&canonical)
            .map_err(|e| LogError::Serialization(e.to_string()))?;
        let mut hasher = blake3::Hasher::new();
        hasher.update(ENTRY_DOMAIN);
        hasher.update(&encoded);
        Ok(EntryHash::from_hash(*hasher.finalize().as_bytes()))
    }
}
