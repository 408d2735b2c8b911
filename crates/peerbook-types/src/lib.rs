//! Foundation types for Peerbook.
//!
//! This crate provides the identity, temporal, and record types used
//! throughout the Peerbook system. Every other Peerbook crate depends on
//! `peerbook-types`.
//!
//! # Key Types
//!
//! - [`AuthorId`] — Persistent cryptographic identity derived from an ed25519 public key
//! - [`EntryHash`] — Content-addressed identifier for a log entry (BLAKE3 hash)
//! - [`CausalStamp`] — Hybrid Logical Clock timestamp for causal ordering
//! - [`Record`] — A named address record, the domain entity replicated across peers
//! - [`Operation`] — A proposed log entry: PUT or DEL on a record key
//! - [`StoreView`] — Read contract for the materialized key→record view

pub mod author;
pub mod entry_hash;
pub mod error;
pub mod operation;
pub mod record;
pub mod stamp;
pub mod view;

pub use author::AuthorId;
pub use entry_hash::EntryHash;
pub use error::TypeError;
pub use operation::{IdentityRef, OpKind, Operation};
pub use record::Record;
pub use stamp::CausalStamp;
pub use view::{EmptyView, StoreView};
