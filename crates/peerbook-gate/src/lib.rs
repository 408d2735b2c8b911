//! Ownership admission gate for Peerbook.
//!
//! Every operation, local or remote, must pass through the gate before a
//! replica accepts it into its log view. The gate is a pure predicate over
//! `(operation, materialized view)`: a key is claimed by the first admitted
//! PUT, and only the claiming identity may update or delete it until the
//! claim is released by a DEL.
//!
//! # Quick Start
//!
//! ```rust
//! use peerbook_gate::{GateConfig, OwnershipGate};
//! use peerbook_identity::{Identity, KeyringVerifier, SigningKey};
//! use peerbook_types::{EmptyView, Operation, Record};
//!
//! let keyring = KeyringVerifier::new();
//! let identity = Identity::create(&SigningKey::generate());
//! keyring.register(identity.clone());
//!
//! let gate = OwnershipGate::new(keyring, GateConfig::default());
//! let record = Record::new("Alice", "wonderland 1", identity.id);
//! let op = Operation::put(record, identity.to_ref());
//! assert!(gate.can_append(&op, &EmptyView));
//! ```

pub mod config;
pub mod decision;
pub mod gate;

pub use config::GateConfig;
pub use decision::{AdmitDecision, RejectReason};
pub use gate::OwnershipGate;
