//! Entry service for Peerbook.
//!
//! [`EntryService`] is the only surface a UI or CLI layer touches: it
//! coordinates the replicated log (which enforces the ownership gate) and
//! the local fuzzy name index, keeping the two consistent across the
//! optimistic-update window. Mutations stage the index first, submit to
//! the log, then commit or roll the stage back depending on the outcome,
//! so a rejection never leaves a phantom search result behind.

pub mod error;
pub mod service;

pub use error::ServiceError;
pub use service::EntryService;
