//! Fuzzy name index for Peerbook.
//!
//! The [`NameIndex`] is a derived acceleration structure over record
//! names: it reflects the local actor's own staged-and-committed mutations
//! immediately and observes remote admissions only on the next
//! [`NameIndex::rebuild`]. It holds no authority — on any mismatch the
//! materialized store view wins.
//!
//! Optimistic mutation is two-phase: [`NameIndex::stage_add`] and
//! [`NameIndex::stage_remove`] mutate immediately and return a
//! [`StagedMutation`] token the caller must either commit (after the log
//! admitted the corresponding operation) or roll back (after a rejection
//! or transport failure).

pub mod entry;
pub mod error;
pub mod index;
pub mod scorer;

pub use entry::IndexEntry;
pub use error::IndexError;
pub use index::{NameIndex, StagedMutation, DEFAULT_THRESHOLD};
pub use scorer::{JaroWinklerScorer, SimilarityScorer};
