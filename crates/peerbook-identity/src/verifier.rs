use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use peerbook_types::{AuthorId, IdentityRef};

use crate::identity::Identity;

/// Resolve-and-verify contract the admission gate depends on.
///
/// The gate calls `resolve` to turn the opaque reference carried by an
/// operation into a full identity, then `verify` to check the identity's
/// self-certification. Both must happen before any ownership decision.
pub trait IdentityVerifier: Send + Sync {
    /// Resolve an opaque identity reference to a full identity.
    fn resolve(&self, identity_ref: &IdentityRef) -> Option<Identity>;

    /// Check an identity's self-certification.
    fn verify(&self, identity: &Identity) -> bool;
}

impl<V: IdentityVerifier + ?Sized> IdentityVerifier for Arc<V> {
    fn resolve(&self, identity_ref: &IdentityRef) -> Option<Identity> {
        (**self).resolve(identity_ref)
    }

    fn verify(&self, identity: &Identity) -> bool {
        (**self).verify(identity)
    }
}

/// In-memory identity registry.
///
/// Replicas learn identities out of band (key exchange, gossip, both
/// outside this crate); `register` feeds them in, and resolution is a
/// plain lookup.
/// Registration rejects identities that fail self-certification, so
/// everything resolvable through a keyring is already structurally sound;
/// `verify` re-checks anyway since the trait makes no such promise.
pub struct KeyringVerifier {
    identities: RwLock<HashMap<AuthorId, Identity>>,
}

impl KeyringVerifier {
    /// Create an empty keyring.
    pub fn new() -> Self {
        Self {
            identities: RwLock::new(HashMap::new()),
        }
    }

    /// Register an identity. Returns `false` if the identity does not
    /// self-certify; a forged identity never enters the keyring.
    pub fn register(&self, identity: Identity) -> bool {
        if !identity.verify() {
            return false;
        }
        let mut identities = self.identities.write().unwrap_or_else(|e| e.into_inner());
        identities.insert(identity.id, identity);
        true
    }

    /// Number of registered identities.
    pub fn len(&self) -> usize {
        self.identities
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Returns `true` if no identities are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for KeyringVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityVerifier for KeyringVerifier {
    fn resolve(&self, identity_ref: &IdentityRef) -> Option<Identity> {
        let identities = self.identities.read().unwrap_or_else(|e| e.into_inner());
        identities.get(&identity_ref.author()).cloned()
    }

    fn verify(&self, identity: &Identity) -> bool {
        identity.verify()
    }
}
