//! Identity layer for Peerbook.
//!
//! Writers are identified by an [`AuthorId`](peerbook_types::AuthorId)
//! derived from an ed25519 public key. An [`Identity`] bundles the id, the
//! public key, and a self-certifying signature; the [`IdentityVerifier`]
//! trait is the resolve-and-verify contract the admission gate calls before
//! any ownership decision.

pub mod identity;
pub mod keys;
pub mod verifier;

pub use identity::Identity;
pub use keys::{Signature, SignatureError, SigningKey, VerifyingKey};
pub use verifier::{IdentityVerifier, KeyringVerifier};
