use std::cmp::Ordering;

use peerbook_types::Record;

use crate::entry::IndexEntry;
use crate::error::IndexError;
use crate::scorer::{JaroWinklerScorer, SimilarityScorer};

/// Default similarity threshold: matches scoring 0.7 or higher are kept.
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// Token for a staged (optimistic) index mutation.
///
/// Returned by [`NameIndex::stage_add`] and [`NameIndex::stage_remove`];
/// the caller must pass it back to [`NameIndex::commit`] once the log has
/// admitted the corresponding operation, or to [`NameIndex::rollback`]
/// when the submission was rejected or failed. Dropping it silently means
/// the index may be serving phantom or missing results.
#[must_use = "staged index mutations must be committed or rolled back"]
#[derive(Debug)]
pub enum StagedMutation {
    /// An entry was inserted; same-name entries it displaced are kept for
    /// rollback.
    Added {
        name: String,
        displaced: Vec<IndexEntry>,
    },
    /// All entries under a name were removed.
    Removed { entries: Vec<IndexEntry> },
}

/// In-memory fuzzy index over record names.
///
/// An owned value, constructed by [`NameIndex::rebuild`] and threaded
/// through whoever coordinates mutations — there is no global instance.
/// All operations are in-memory; nothing here talks to the log or store.
pub struct NameIndex<S: SimilarityScorer = JaroWinklerScorer> {
    entries: Vec<IndexEntry>,
    scorer: S,
    threshold: f64,
}

impl NameIndex<JaroWinklerScorer> {
    /// Fresh index over the full current record set, default scorer and
    /// threshold. O(n) in record count.
    pub fn rebuild<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        Self::rebuild_with(records, JaroWinklerScorer, DEFAULT_THRESHOLD)
    }
}

impl<S: SimilarityScorer> NameIndex<S> {
    /// Fresh index with an explicit scorer and threshold.
    pub fn rebuild_with<'a>(
        records: impl IntoIterator<Item = &'a Record>,
        scorer: S,
        threshold: f64,
    ) -> Self {
        Self {
            entries: records.into_iter().map(IndexEntry::from).collect(),
            scorer,
            threshold,
        }
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The active similarity threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// All indexed entries, in insertion order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Optimistically insert an entry, displacing any entries already
    /// indexed under the same name.
    pub fn stage_add(&mut self, entry: IndexEntry) -> StagedMutation {
        let name = entry.name.clone();
        let displaced = self.take_by_name(&name);
        self.entries.push(entry);
        StagedMutation::Added { name, displaced }
    }

    /// Optimistically remove every entry indexed under the given name.
    pub fn stage_remove(&mut self, name: &str) -> StagedMutation {
        StagedMutation::Removed {
            entries: self.take_by_name(name),
        }
    }

    /// Confirm a staged mutation. The optimistic state is now the real
    /// state; the token is consumed.
    pub fn commit(&mut self, staged: StagedMutation) {
        drop(staged);
    }

    /// Undo a staged mutation after the corresponding log submission was
    /// rejected or failed.
    pub fn rollback(&mut self, staged: StagedMutation) -> Result<(), IndexError> {
        match staged {
            StagedMutation::Added { name, displaced } => {
                let before = self.entries.len();
                self.entries.retain(|e| e.name != name);
                if self.entries.len() == before {
                    return Err(IndexError::Inconsistent(format!(
                        "staged entry for {name:?} is no longer indexed"
                    )));
                }
                self.entries.extend(displaced);
                Ok(())
            }
            StagedMutation::Removed { entries } => {
                self.entries.extend(entries);
                Ok(())
            }
        }
    }

    /// Fuzzy search by name, best match first (ties by name). Entries
    /// scoring below the threshold are excluded. The empty query is not
    /// served here — that path enumerates the store view directly.
    pub fn search(&self, query: &str) -> Vec<IndexEntry> {
        if query.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(f64, &IndexEntry)> = self
            .entries
            .iter()
            .map(|entry| (self.scorer.score(query, &entry.name), entry))
            .filter(|(score, _)| *score >= self.threshold)
            .collect();

        scored.sort_by(|(score_a, entry_a), (score_b, entry_b)| {
            score_b
                .partial_cmp(score_a)
                .unwrap_or(Ordering::Equal)
                .then_with(|| entry_a.name.cmp(&entry_b.name))
        });

        scored.into_iter().map(|(_, entry)| entry.clone()).collect()
    }

    fn take_by_name(&mut self, name: &str) -> Vec<IndexEntry> {
        let mut taken = Vec::new();
        self.entries.retain(|entry| {
            if entry.name == name {
                taken.push(entry.clone());
                false
            } else {
                true
            }
        });
        taken
    }
}

impl<S: SimilarityScorer> std::fmt::Debug for NameIndex<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameIndex")
            .field("entries", &self.entries.len())
            .field("threshold", &self.threshold)
            .finish()
    }
}
