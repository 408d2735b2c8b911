use std::fmt;

use serde::{Deserialize, Serialize};
use peerbook_types::AuthorId;

/// Why the gate turned an operation away.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// The identity reference did not resolve, or the resolved identity
    /// failed self-certification.
    IdentityUnverified,
    /// The operation carries no key (absent or empty).
    MissingKey,
    /// A PUT whose value is absent, or whose value's name or author does
    /// not match the operation.
    MalformedValue { detail: String },
    /// The key is currently owned by a different identity.
    NotOwner { key: String, owner: AuthorId },
    /// A DEL for a key with no current record.
    NoSuchRecord { key: String },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::IdentityUnverified => {
                write!(f, "identity could not be resolved and verified")
            }
            RejectReason::MissingKey => write!(f, "operation has no key"),
            RejectReason::MalformedValue { detail } => {
                write!(f, "malformed operation value: {detail}")
            }
            RejectReason::NotOwner { key, owner } => {
                write!(f, "key {key:?} is owned by {owner}")
            }
            RejectReason::NoSuchRecord { key } => {
                write!(f, "no current record for key {key:?}")
            }
        }
    }
}

/// The gate's verdict on a single operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdmitDecision {
    /// The operation may be appended to the log.
    Admitted,
    /// The operation must not be appended.
    Rejected { reason: RejectReason },
}

impl AdmitDecision {
    /// Returns `true` if the operation was admitted.
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted)
    }

    /// The rejection reason, if any.
    pub fn reason(&self) -> Option<&RejectReason> {
        match self {
            Self::Admitted => None,
            Self::Rejected { reason } => Some(reason),
        }
    }
}
