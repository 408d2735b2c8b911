use thiserror::Error;

/// Errors from log operations.
///
/// Policy rejection is not an error, it is an
/// [`AppendOutcome`](crate::AppendOutcome) variant. These errors cover the
/// transport and encoding failures that are distinct from the gate saying no.
#[derive(Debug, Error)]
pub enum LogError {
    /// Storage or transport failure while appending.
    #[error("append transport failure: {0}")]
    Transport(String),

    /// Canonical encoding of an entry failed.
    #[error("entry serialization error: {0}")]
    Serialization(String),
}
