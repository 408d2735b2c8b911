//! Replicated append-only operation log for Peerbook.
//!
//! This crate realizes the log collaborator in memory: every append, and
//! every entry replayed during merge, passes through the ownership gate
//! before a replica marks it admitted. Admitted entries fold into a
//! latest-wins key→record view, and two replicas that diverged reconcile
//! through a deterministic total order over entries (causal stamp, then
//! content hash) so their admitted sequences and views converge.

pub mod clock;
pub mod entry;
pub mod error;
pub mod log;
pub mod replay;
pub mod traits;

pub use clock::HybridLogicalClock;
pub use entry::LogEntry;
pub use error::LogError;
pub use log::{InMemoryLog, MergeReport};
pub use replay::{replay_entries, ReplayResult};
pub use traits::{AppendOutcome, ReplicatedLog};
