use peerbook_gate::RejectReason;
use peerbook_types::{CausalStamp, EntryHash, Operation};

use crate::entry::LogEntry;
use crate::error::LogError;

/// Result of submitting an operation to the log.
///
/// Policy rejection is an expected outcome, not an error; transport and
/// storage failures travel separately as [`LogError`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The gate admitted the operation; it is now part of the log.
    Admitted {
        hash: EntryHash,
        stamp: CausalStamp,
    },
    /// The gate rejected the operation; the log is unchanged.
    Rejected { reason: RejectReason },
}

impl AppendOutcome {
    /// Returns `true` if the operation was admitted.
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted { .. })
    }
}

/// Append boundary of the replicated log.
///
/// Guarantees the ownership gate has evaluated every entry it reports as
/// admitted, local or remote. Timeouts and cancellation belong to the
/// transport behind implementations; callers only observe an outcome or a
/// [`LogError`].
pub trait ReplicatedLog: Send + Sync {
    /// Submit an operation for admission.
    fn append(&self, op: Operation) -> Result<AppendOutcome, LogError>;

    /// Snapshot of the admitted entries, in admission order.
    fn admitted(&self) -> Vec<LogEntry>;

    /// Number of admitted entries.
    fn admitted_len(&self) -> usize;
}

impl<L: ReplicatedLog + ?Sized> ReplicatedLog for std::sync::Arc<L> {
    fn append(&self, op: Operation) -> Result<AppendOutcome, LogError> {
        (**self).append(op)
    }

    fn admitted(&self) -> Vec<LogEntry> {
        (**self).admitted()
    }

    fn admitted_len(&self) -> usize {
        (**self).admitted_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_predicates() {
        let admitted = AppendOutcome::Admitted {
            hash: EntryHash::null(),
            stamp: CausalStamp::zero(),
        };
        assert!(admitted.is_admitted());

        let rejected = AppendOutcome::Rejected {
            reason: RejectReason::MissingKey,
        };
        assert!(!rejected.is_admitted());
    }
}
