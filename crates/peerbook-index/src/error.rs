use thiserror::Error;

/// Errors from index operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    /// A staged mutation could not be rolled back: the index no longer
    /// matches what the stage recorded. The caller should rebuild.
    #[error("index inconsistent: {0}")]
    Inconsistent(String),
}
