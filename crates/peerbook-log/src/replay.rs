use std::collections::BTreeMap;

use peerbook_gate::OwnershipGate;
use peerbook_identity::IdentityVerifier;
use peerbook_types::{OpKind, Record, StoreView};

use crate::entry::LogEntry;

/// Result of replaying an ordered entry sequence through the gate.
#[derive(Clone, Debug)]
pub struct ReplayResult {
    /// Entries admitted against the progressively-extended view.
    pub admitted: Vec<LogEntry>,
    /// Entries the gate turned away during replay.
    pub discarded: u64,
    /// The materialized view after the fold.
    pub view: BTreeMap<String, Record>,
}

/// Re-validate an ordered entry sequence through the gate, folding each
/// admitted entry into the view before evaluating the next.
///
/// This is the single replay routine behind both merge reconciliation and
/// convergence checks. Determinism holds because the gate is a pure
/// predicate: identical input orderings produce identical admitted
/// sequences and views on every replica.
pub fn replay_entries<V: IdentityVerifier>(
    gate: &OwnershipGate<V>,
    entries: &[LogEntry],
) -> ReplayResult {
    let mut view = BTreeMap::new();
    let mut admitted = Vec::with_capacity(entries.len());
    let mut discarded = 0u64;

    for entry in entries {
        if gate.can_append(&entry.op, &MapView(&view)) {
            apply(&mut view, entry);
            admitted.push(entry.clone());
        } else {
            discarded += 1;
        }
    }

    ReplayResult {
        admitted,
        discarded,
        view,
    }
}

/// Fold one admitted entry into the view: PUT replaces, DEL removes.
pub(crate) fn apply(view: &mut BTreeMap<String, Record>, entry: &LogEntry) {
    let Some(key) = entry.op.key() else {
        return; // gate never admits a keyless entry
    };
    match entry.op.kind {
        OpKind::Put => {
            if let Some(record) = &entry.op.value {
                view.insert(key.to_string(), record.clone());
            }
        }
        OpKind::Del => {
            view.remove(key);
        }
    }
}

/// Borrowed view over a materialized map, for gate evaluation mid-fold.
pub(crate) struct MapView<'a>(pub &'a BTreeMap<String, Record>);

impl StoreView for MapView<'_> {
    fn get(&self, key: &str) -> Option<Record> {
        self.0.get(key).cloned()
    }

    fn all(&self) -> Vec<Record> {
        self.0.values().cloned().collect()
    }
}
