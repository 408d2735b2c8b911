use std::collections::{BTreeMap, HashSet};
use std::sync::RwLock;

use peerbook_gate::OwnershipGate;
use peerbook_identity::IdentityVerifier;
use peerbook_types::{EntryHash, Operation, Record, StoreView};
use tracing::{debug, info, warn};

use crate::clock::HybridLogicalClock;
use crate::entry::LogEntry;
use crate::error::LogError;
use crate::replay::{self, MapView};
use crate::traits::{AppendOutcome, ReplicatedLog};

/// Outcome summary of a merge reconciliation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergeReport {
    /// Entries admitted into the merged log.
    pub admitted: usize,
    /// Entries the gate turned away during re-validation (losing branches).
    pub discarded: u64,
    /// Remote entries dropped before replay because their hash did not
    /// verify.
    pub invalid: usize,
}

/// In-memory replicated log for tests, local stores, and embedding.
///
/// Holds the ownership gate, a hybrid logical clock scoped to this
/// replica's node id, the admitted entry sequence, and the materialized
/// latest-wins view. Everything mutable sits behind one lock so the entry
/// list and the view can never drift apart.
pub struct InMemoryLog<V: IdentityVerifier> {
    gate: OwnershipGate<V>,
    clock: HybridLogicalClock,
    inner: RwLock<LogState>,
}

#[derive(Default)]
struct LogState {
    entries: Vec<LogEntry>,
    seen: HashSet<EntryHash>,
    view: BTreeMap<String, Record>,
}

impl<V: IdentityVerifier> InMemoryLog<V> {
    /// Create an empty log for the given replica.
    pub fn new(node_id: u16, gate: OwnershipGate<V>) -> Self {
        Self {
            gate,
            clock: HybridLogicalClock::new(node_id),
            inner: RwLock::new(LogState::default()),
        }
    }

    /// The gate this log admits entries through.
    pub fn gate(&self) -> &OwnershipGate<V> {
        &self.gate
    }

    /// This replica's node id.
    pub fn node_id(&self) -> u16 {
        self.clock.node_id()
    }

    /// Merge the admitted entries of another replica into this log.
    ///
    /// Deterministic branch healing: the union of both admitted sets
    /// (deduplicated by content hash) is totally ordered by
    /// `(causal stamp, entry hash)` and replayed through the gate against
    /// a progressively-rebuilt view. Entries that fail re-validation
    /// against the merged prefix are discarded permanently. Any two
    /// replicas merging the same entry sets converge to identical
    /// admitted sequences and views, whichever direction they merge in.
    pub fn merge(&self, other: &InMemoryLog<V>) -> MergeReport {
        self.merge_entries(&other.admitted())
    }

    /// Merge raw remote entries (as handed over by a sync transport).
    pub fn merge_entries(&self, remote: &[LogEntry]) -> MergeReport {
        let mut state = self.inner.write().unwrap_or_else(|e| e.into_inner());

        let mut invalid = 0usize;
        let mut combined = state.entries.clone();
        let mut seen: HashSet<EntryHash> = state.seen.clone();
        for entry in remote {
            match entry.verify_hash() {
                Ok(true) => {}
                _ => {
                    warn!(hash = %entry.hash.short_hex(), "dropping remote entry with bad hash");
                    invalid += 1;
                    continue;
                }
            }
            if seen.insert(entry.hash) {
                combined.push(entry.clone());
            }
        }

        combined.sort_by_key(LogEntry::merge_key);

        let result = replay::replay_entries(&self.gate, &combined);

        // Advance the clock past every merged stamp so subsequent local
        // appends sort after the merge.
        if let Some(max_stamp) = combined.last().map(|e| e.stamp) {
            self.clock.update(&max_stamp);
        }

        let report = MergeReport {
            admitted: result.admitted.len(),
            discarded: result.discarded,
            invalid,
        };

        state.seen = result.admitted.iter().map(|e| e.hash).collect();
        state.entries = result.admitted;
        state.view = result.view;

        info!(
            admitted = report.admitted,
            discarded = report.discarded,
            invalid = report.invalid,
            "merge reconciled"
        );
        report
    }
}

impl<V: IdentityVerifier> ReplicatedLog for InMemoryLog<V> {
    fn append(&self, op: Operation) -> Result<AppendOutcome, LogError> {
        let stamp = self.clock.now();
        let entry = LogEntry::seal(op, stamp)?;

        let mut state = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let decision = self.gate.evaluate(&entry.op, &MapView(&state.view));

        match decision {
            peerbook_gate::AdmitDecision::Admitted => {
                let hash = entry.hash;
                replay::apply(&mut state.view, &entry);
                state.seen.insert(hash);
                state.entries.push(entry);
                debug!(hash = %hash.short_hex(), %stamp, "entry admitted");
                Ok(AppendOutcome::Admitted { hash, stamp })
            }
            peerbook_gate::AdmitDecision::Rejected { reason } => {
                debug!(%reason, "entry rejected");
                Ok(AppendOutcome::Rejected { reason })
            }
        }
    }

    fn admitted(&self) -> Vec<LogEntry> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .clone()
    }

    fn admitted_len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .len()
    }
}

impl<V: IdentityVerifier> StoreView for InMemoryLog<V> {
    fn get(&self, key: &str) -> Option<Record> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .view
            .get(key)
            .cloned()
    }

    fn all(&self) -> Vec<Record> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .view
            .values()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use peerbook_gate::{GateConfig, RejectReason};
    use peerbook_identity::{Identity, KeyringVerifier, SigningKey};
    use peerbook_types::Record;

    use super::*;

    fn log_with(identities: &[&Identity], node_id: u16) -> InMemoryLog<KeyringVerifier> {
        let keyring = KeyringVerifier::new();
        for identity in identities {
            keyring.register((*identity).clone());
        }
        InMemoryLog::new(node_id, OwnershipGate::new(keyring, GateConfig::default()))
    }

    fn identity() -> Identity {
        Identity::create(&SigningKey::generate())
    }

    fn put(id: &Identity, name: &str, address: &str) -> Operation {
        Operation::put(Record::new(name, address, id.id), id.to_ref())
    }

    #[test]
    fn append_claims_and_materializes() {
        let alice = identity();
        let log = log_with(&[&alice], 0);

        let outcome = log.append(put(&alice, "Alice", "a1")).unwrap();
        assert!(outcome.is_admitted());
        assert_eq!(log.admitted_len(), 1);
        assert_eq!(log.get("Alice").unwrap().address, "a1");
    }

    #[test]
    fn owner_update_replaces_record() {
        let alice = identity();
        let log = log_with(&[&alice], 0);

        log.append(put(&alice, "Alice", "a1")).unwrap();
        log.append(put(&alice, "Alice", "a2")).unwrap();
        assert_eq!(log.get("Alice").unwrap().address, "a2");
        assert_eq!(log.admitted_len(), 2);
    }

    #[test]
    fn foreign_put_is_rejected_and_leaves_log_unchanged() {
        let alice = identity();
        let bob = identity();
        let log = log_with(&[&alice, &bob], 0);

        log.append(put(&alice, "shared", "a1")).unwrap();
        let outcome = log.append(put(&bob, "shared", "b1")).unwrap();

        match outcome {
            AppendOutcome::Rejected {
                reason: RejectReason::NotOwner { owner, .. },
            } => assert_eq!(owner, alice.id),
            other => panic!("expected NotOwner rejection, got {other:?}"),
        }
        assert_eq!(log.admitted_len(), 1);
        assert_eq!(log.get("shared").unwrap().author, alice.id);
    }

    #[test]
    fn delete_then_reclaim() {
        let alice = identity();
        let bob = identity();
        let log = log_with(&[&alice, &bob], 0);

        assert!(log.append(put(&alice, "k", "a1")).unwrap().is_admitted());
        assert!(log
            .append(Operation::del("k", alice.to_ref()))
            .unwrap()
            .is_admitted());
        assert!(log.get("k").is_none());

        // Key unclaimed again; Bob may claim it.
        assert!(log.append(put(&bob, "k", "b1")).unwrap().is_admitted());
        assert_eq!(log.get("k").unwrap().author, bob.id);
    }

    #[test]
    fn all_returns_store_order() {
        let alice = identity();
        let log = log_with(&[&alice], 0);

        log.append(put(&alice, "zeta", "z")).unwrap();
        log.append(put(&alice, "alpha", "a")).unwrap();
        log.append(put(&alice, "mid", "m")).unwrap();

        let names: Vec<String> = log.all().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn merge_unions_disjoint_keys() {
        let alice = identity();
        let bob = identity();
        let log_a = log_with(&[&alice, &bob], 1);
        let log_b = log_with(&[&alice, &bob], 2);

        log_a.append(put(&alice, "Alice", "a1")).unwrap();
        log_b.append(put(&bob, "Bob", "b1")).unwrap();

        let report = log_a.merge(&log_b);
        assert_eq!(report.admitted, 2);
        assert_eq!(report.discarded, 0);
        assert!(log_a.get("Alice").is_some());
        assert!(log_a.get("Bob").is_some());
    }

    #[test]
    fn merge_converges_in_both_directions() {
        let alice = identity();
        let bob = identity();
        let log_a = log_with(&[&alice, &bob], 1);
        let log_b = log_with(&[&alice, &bob], 2);

        // Concurrent conflicting claims on the same unclaimed key.
        log_a.append(put(&alice, "contested", "a1")).unwrap();
        log_b.append(put(&bob, "contested", "b1")).unwrap();

        log_a.merge(&log_b);
        log_b.merge(&log_a);

        // One deterministic winner on both replicas.
        let winner_a = log_a.get("contested").unwrap();
        let winner_b = log_b.get("contested").unwrap();
        assert_eq!(winner_a, winner_b);
        assert_eq!(log_a.admitted(), log_b.admitted());
    }

    #[test]
    fn losing_branch_followups_are_discarded() {
        let alice = identity();
        let bob = identity();
        let log_a = log_with(&[&alice, &bob], 1);
        let log_b = log_with(&[&alice, &bob], 2);

        // Alice claims first (earlier stamp), Bob claims concurrently and
        // keeps updating on his own branch.
        log_a.append(put(&alice, "contested", "a1")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        log_b.append(put(&bob, "contested", "b1")).unwrap();
        log_b.append(put(&bob, "contested", "b2")).unwrap();

        let report = log_a.merge(&log_b);
        assert_eq!(report.discarded, 2);
        assert_eq!(log_a.get("contested").unwrap().author, alice.id);

        // Bob reconciles to the same state.
        log_b.merge(&log_a);
        assert_eq!(log_b.get("contested").unwrap().author, alice.id);
        assert_eq!(log_a.admitted(), log_b.admitted());
    }

    #[test]
    fn merge_drops_tampered_remote_entries() {
        let alice = identity();
        let log_a = log_with(&[&alice], 1);
        let log_b = log_with(&[&alice], 2);

        log_b.append(put(&alice, "Alice", "a1")).unwrap();
        let mut stolen = log_b.admitted();
        stolen[0].op.value.as_mut().unwrap().address = "evil".into();

        let report = log_a.merge_entries(&stolen);
        assert_eq!(report.invalid, 1);
        assert_eq!(report.admitted, 0);
        assert!(log_a.get("Alice").is_none());
    }

    #[test]
    fn merge_is_idempotent() {
        let alice = identity();
        let log_a = log_with(&[&alice], 1);
        let log_b = log_with(&[&alice], 2);

        log_a.append(put(&alice, "Alice", "a1")).unwrap();
        log_b.append(put(&alice, "Bob", "b1")).unwrap();

        log_a.merge(&log_b);
        let snapshot = log_a.admitted();
        let report = log_a.merge(&log_b);
        assert_eq!(log_a.admitted(), snapshot);
        assert_eq!(report.admitted, snapshot.len());
    }

    #[test]
    fn local_append_after_merge_sorts_after_merged_entries() {
        let alice = identity();
        let log_a = log_with(&[&alice], 1);
        let log_b = log_with(&[&alice], 2);

        log_b.append(put(&alice, "Alice", "a1")).unwrap();
        log_a.merge(&log_b);
        log_a.append(put(&alice, "Alice", "a2")).unwrap();

        let entries = log_a.admitted();
        assert_eq!(entries.len(), 2);
        assert!(entries[1].stamp > entries[0].stamp);
        assert_eq!(log_a.get("Alice").unwrap().address, "a2");
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        /// A scripted mutation for property runs.
        #[derive(Clone, Debug)]
        struct ScriptedOp {
            author: usize,
            key: usize,
            is_put: bool,
        }

        fn scripted_ops(max_len: usize) -> impl Strategy<Value = Vec<ScriptedOp>> {
            prop::collection::vec(
                (0..3usize, 0..4usize, any::<bool>()).prop_map(|(author, key, is_put)| {
                    ScriptedOp {
                        author,
                        key,
                        is_put,
                    }
                }),
                0..max_len,
            )
        }

        fn key_name(key: usize) -> String {
            format!("key-{key}")
        }

        fn apply_script(
            log: &InMemoryLog<KeyringVerifier>,
            identities: &[Identity],
            script: &[ScriptedOp],
        ) {
            for op in script {
                let identity = &identities[op.author];
                let operation = if op.is_put {
                    put(identity, &key_name(op.key), "addr")
                } else {
                    Operation::del(key_name(op.key), identity.to_ref())
                };
                log.append(operation).unwrap();
            }
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            /// Ownership invariant: at every point, the current record for
            /// a key is authored by the identity of the admitted PUT that
            /// most recently produced it, and no admitted operation ever
            /// mutated a record owned by someone else.
            #[test]
            fn ownership_invariant_holds(script in scripted_ops(40)) {
                let identities: Vec<Identity> =
                    (0..3).map(|_| identity()).collect();
                let refs: Vec<&Identity> = identities.iter().collect();
                let log = log_with(&refs, 0);

                apply_script(&log, &identities, &script);

                let mut owners: std::collections::BTreeMap<String, peerbook_types::AuthorId> =
                    Default::default();
                for entry in log.admitted() {
                    let key = entry.op.key().unwrap().to_string();
                    let actor = entry.op.identity.author();
                    if let Some(owner) = owners.get(&key) {
                        prop_assert_eq!(*owner, actor);
                    }
                    match entry.op.kind {
                        peerbook_types::OpKind::Put => {
                            owners.insert(key, actor);
                        }
                        peerbook_types::OpKind::Del => {
                            owners.remove(&key);
                        }
                    }
                }

                // The materialized view agrees with the fold.
                for record in log.all() {
                    prop_assert_eq!(owners.get(&record.name), Some(&record.author));
                }
            }

            /// Replaying the admitted sequence re-admits everything: the
            /// gate is stable under re-evaluation in admission order.
            #[test]
            fn admitted_sequence_is_replay_stable(script in scripted_ops(40)) {
                let identities: Vec<Identity> =
                    (0..3).map(|_| identity()).collect();
                let refs: Vec<&Identity> = identities.iter().collect();
                let log = log_with(&refs, 0);

                apply_script(&log, &identities, &script);

                let entries = log.admitted();
                let result = crate::replay::replay_entries(log.gate(), &entries);
                prop_assert_eq!(result.discarded, 0);
                prop_assert_eq!(result.admitted, entries);
            }

            /// Merge convergence: two replicas with divergent histories
            /// reach identical admitted sequences and views, whichever
            /// direction they merge in.
            #[test]
            fn merge_converges(
                script_a in scripted_ops(25),
                script_b in scripted_ops(25),
            ) {
                let identities: Vec<Identity> =
                    (0..3).map(|_| identity()).collect();
                let refs: Vec<&Identity> = identities.iter().collect();
                let log_a = log_with(&refs, 1);
                let log_b = log_with(&refs, 2);

                apply_script(&log_a, &identities, &script_a);
                apply_script(&log_b, &identities, &script_b);

                log_a.merge(&log_b);
                log_b.merge(&log_a);

                prop_assert_eq!(log_a.admitted(), log_b.admitted());
                prop_assert_eq!(log_a.all(), log_b.all());
            }
        }
    }
}
