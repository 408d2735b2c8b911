use serde::{Deserialize, Serialize};
use peerbook_types::{AuthorId, IdentityRef};

use crate::keys::{Signature, SigningKey, VerifyingKey};

/// Domain separator for the self-certification signature.
const IDENTITY_DOMAIN: &[u8] = b"peerbook-identity-v1:";

/// A self-certifying writer identity.
///
/// Bundles the derived [`AuthorId`], the ed25519 public key, and a proof
/// signature over the domain-tagged public key. An identity is valid iff
/// the id equals the BLAKE3 derivation of the public key and the proof
/// verifies against that key, so validity can be checked by any replica
/// with no shared state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Derived author id.
    pub id: AuthorId,
    /// Raw ed25519 public key.
    pub public_key: [u8; 32],
    /// Self-certification: signature over the domain-tagged public key.
    pub proof: Signature,
}

impl Identity {
    /// Create a valid identity from a signing key.
    pub fn create(signing_key: &SigningKey) -> Self {
        let verifying_key = signing_key.verifying_key();
        let public_key = verifying_key.as_bytes();
        let proof = signing_key.sign(&certification_message(&public_key));
        Self {
            id: verifying_key.to_author_id(),
            public_key,
            proof,
        }
    }

    /// Check the self-certification: id derivation and proof signature.
    pub fn verify(&self) -> bool {
        if AuthorId::derive(&self.public_key) != self.id {
            return false;
        }
        let Ok(key) = VerifyingKey::from_bytes(self.public_key) else {
            return false;
        };
        key.verify(&certification_message(&self.public_key), &self.proof)
            .is_ok()
    }

    /// The opaque reference form carried by operations.
    pub fn to_ref(&self) -> IdentityRef {
        IdentityRef(self.id)
    }
}

fn certification_message(public_key: &[u8; 32]) -> Vec<u8> {
    let mut message = Vec::with_capacity(IDENTITY_DOMAIN.len() + 32);
    message.extend_from_slice(IDENTITY_DOMAIN);
    message.extend_from_slice(public_key);
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_identity_verifies() {
        let sk = SigningKey::generate();
        let identity = Identity::create(&sk);
        assert!(identity.verify());
    }

    #[test]
    fn id_matches_key_derivation() {
        let sk = SigningKey::generate();
        let identity = Identity::create(&sk);
        assert_eq!(identity.id, sk.verifying_key().to_author_id());
    }

    #[test]
    fn tampered_id_fails() {
        let sk = SigningKey::generate();
        let mut identity = Identity::create(&sk);
        identity.id = AuthorId::ephemeral();
        assert!(!identity.verify());
    }

    #[test]
    fn swapped_key_fails() {
        let sk = SigningKey::generate();
        let other = SigningKey::generate();
        let mut identity = Identity::create(&sk);
        identity.public_key = other.verifying_key().as_bytes();
        assert!(!identity.verify());
    }

    #[test]
    fn forged_proof_fails() {
        let sk = SigningKey::generate();
        let forger = SigningKey::generate();
        let mut identity = Identity::create(&sk);
        identity.proof = forger.sign(b"anything");
        assert!(!identity.verify());
    }

    #[test]
    fn serde_roundtrip() {
        let identity = Identity::create(&SigningKey::generate());
        let json = serde_json::to_string(&identity).unwrap();
        let parsed: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(identity, parsed);
        assert!(parsed.verify());
    }
}
