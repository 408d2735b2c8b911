use peerbook_types::AuthorId;
use thiserror::Error;

/// Errors surfaced by the entry service.
///
/// `OwnershipViolation` and `InvalidOperation` are expected, recoverable
/// outcomes; the service surfaces them without retrying. `AppendFailed`
/// is transient: the caller may resubmit the same operation, whose
/// re-evaluation by the gate is an ordinary admission decision.
/// `IndexInconsistent` means an optimistic index mutation could not be
/// reconciled after a failed submission; the remedy is an index rebuild.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("identity verification failed")]
    IdentityVerificationFailed,

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("ownership violation: key {key:?} is owned by {owner}")]
    OwnershipViolation { key: String, owner: AuthorId },

    #[error("append failed: {0}")]
    AppendFailed(String),

    #[error("index inconsistent: {0}")]
    IndexInconsistent(String),
}
