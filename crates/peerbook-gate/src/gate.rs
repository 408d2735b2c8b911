use peerbook_identity::IdentityVerifier;
use peerbook_types::{OpKind, Operation, StoreView};
use tracing::debug;

use crate::config::GateConfig;
use crate::decision::{AdmitDecision, RejectReason};

/// The ownership gate: decides which identity may create, update, or
/// delete a keyed record.
///
/// The gate holds the identity verifier; the materialized view is passed
/// per evaluation so merge replay can re-evaluate entries against the
/// progressively-extended view of the merged prefix. Evaluation is
/// side-effect free, deterministic, and total: the same operation against
/// the same view always yields the same decision, on every replica.
pub struct OwnershipGate<V: IdentityVerifier> {
    verifier: V,
    config: GateConfig,
}

impl<V: IdentityVerifier> OwnershipGate<V> {
    /// Create a gate over the given verifier.
    pub fn new(verifier: V, config: GateConfig) -> Self {
        Self { verifier, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// The held verifier.
    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    /// Boolean admissibility contract: `true` iff the operation may be
    /// appended given the current view.
    pub fn can_append(&self, op: &Operation, view: &dyn StoreView) -> bool {
        self.evaluate(op, view).is_admitted()
    }

    /// Full evaluation with a rejection reason.
    ///
    /// The checks run in a fixed order: identity resolution and
    /// verification first, then structure, then ownership.
    pub fn evaluate(&self, op: &Operation, view: &dyn StoreView) -> AdmitDecision {
        let Some(identity) = self.verifier.resolve(&op.identity) else {
            return self.reject(op, RejectReason::IdentityUnverified);
        };
        if !self.verifier.verify(&identity) {
            return self.reject(op, RejectReason::IdentityUnverified);
        }

        let Some(key) = op.key() else {
            return self.reject(op, RejectReason::MissingKey);
        };

        if op.kind == OpKind::Put {
            if let Some(reason) = malformed_put(op, key, identity.id) {
                return self.reject(op, reason);
            }
        }

        if self.config.permissive {
            debug!(kind = %op.kind, key, "gate permissive admit");
            return AdmitDecision::Admitted;
        }

        match (op.kind, view.get(key)) {
            // First-writer claims the key.
            (OpKind::Put, None) => {
                debug!(key, author = %identity.id, "gate admit: first claim");
                AdmitDecision::Admitted
            }
            // An existing claim can only be advanced or released by its owner.
            (_, Some(current)) if current.author == identity.id => {
                debug!(kind = %op.kind, key, author = %identity.id, "gate admit: owner");
                AdmitDecision::Admitted
            }
            (_, Some(current)) => self.reject(
                op,
                RejectReason::NotOwner {
                    key: key.to_string(),
                    owner: current.author,
                },
            ),
            (OpKind::Del, None) => self.reject(
                op,
                RejectReason::NoSuchRecord {
                    key: key.to_string(),
                },
            ),
        }
    }

    fn reject(&self, op: &Operation, reason: RejectReason) -> AdmitDecision {
        debug!(kind = %op.kind, key = ?op.key, %reason, "gate reject");
        AdmitDecision::Rejected { reason }
    }
}

/// Structural checks on a PUT: the value must be present, keyed by its own
/// name, and attributed to the proposing identity.
fn malformed_put(
    op: &Operation,
    key: &str,
    author: peerbook_types::AuthorId,
) -> Option<RejectReason> {
    let Some(value) = &op.value else {
        return Some(RejectReason::MalformedValue {
            detail: "PUT without a value".into(),
        });
    };
    if value.name != key {
        return Some(RejectReason::MalformedValue {
            detail: format!("value name {:?} does not match key {key:?}", value.name),
        });
    }
    if value.author != author {
        return Some(RejectReason::MalformedValue {
            detail: "value author does not match proposing identity".into(),
        });
    }
    None
}
