use peerbook_gate::RejectReason;
use peerbook_identity::{Identity, SigningKey};
use peerbook_index::{IndexEntry, JaroWinklerScorer, NameIndex, StagedMutation, DEFAULT_THRESHOLD};
use peerbook_log::{AppendOutcome, LogError, ReplicatedLog};
use peerbook_types::{AuthorId, Operation, Record, StoreView};
use tracing::{debug, info};

use crate::error::ServiceError;

/// The entry service: add, delete, and search over the replicated store.
///
/// One service instance per local actor. All mutations run on the caller's
/// control flow (`&mut self`), so the index needs no locking; the log
/// behind `L` is the only concurrently shared piece. The index is an owned
/// value constructed at open time — it reflects this actor's own
/// successful mutations immediately and observes remote admissions on the
/// next [`EntryService::rebuild_index`].
pub struct EntryService<L: ReplicatedLog + StoreView> {
    log: L,
    signing_key: SigningKey,
    identity: Identity,
    index: NameIndex,
    threshold: f64,
}

impl<L: ReplicatedLog + StoreView> EntryService<L> {
    /// Open the service over a log handle, building the index from the
    /// current materialized view.
    ///
    /// The derived identity must be resolvable by the verifier behind the
    /// log's gate; wiring layers register it there before opening.
    pub fn open(log: L, signing_key: SigningKey) -> Self {
        Self::open_with_threshold(log, signing_key, DEFAULT_THRESHOLD)
    }

    /// Open with an explicit similarity threshold for search.
    pub fn open_with_threshold(log: L, signing_key: SigningKey, threshold: f64) -> Self {
        let identity = Identity::create(&signing_key);
        let index = NameIndex::rebuild_with(&log.all(), JaroWinklerScorer, threshold);
        info!(author = %identity.id, indexed = index.len(), "entry service opened");
        Self {
            log,
            signing_key,
            identity,
            index,
            threshold,
        }
    }

    /// This actor's identity.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// This actor's author id.
    pub fn author_id(&self) -> AuthorId {
        self.identity.id
    }

    /// The underlying log handle.
    pub fn log(&self) -> &L {
        &self.log
    }

    /// The signing key backing this actor's identity.
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// Create or update the record under `name`.
    ///
    /// The index is staged ahead of the log submission; on rejection or
    /// transport failure the stage is rolled back so no phantom entry
    /// survives.
    pub fn add(&mut self, name: &str, address: &str) -> Result<Record, ServiceError> {
        if name.trim().is_empty() {
            return Err(ServiceError::InvalidOperation("empty name".into()));
        }
        if address.trim().is_empty() {
            return Err(ServiceError::InvalidOperation("empty address".into()));
        }

        let record = Record::new(name, address, self.identity.id);
        let staged = self.index.stage_add(IndexEntry::from(&record));
        let op = Operation::put(record.clone(), self.identity.to_ref());

        match self.log.append(op) {
            Ok(AppendOutcome::Admitted { hash, .. }) => {
                self.index.commit(staged);
                debug!(name, hash = %hash.short_hex(), "record added");
                Ok(record)
            }
            Ok(AppendOutcome::Rejected { reason }) => {
                self.reconcile(staged)?;
                Err(reject_to_error(reason))
            }
            Err(e) => {
                self.reconcile(staged)?;
                Err(append_error(e))
            }
        }
    }

    /// Delete the record under `name`, if this actor owns it.
    ///
    /// Returns `Ok(false)` when no current record exists — no DEL is
    /// issued for a missing key (the gate would reject it anyway).
    pub fn delete(&mut self, name: &str) -> Result<bool, ServiceError> {
        if self.log.get(name).is_none() {
            debug!(name, "delete skipped: no current record");
            return Ok(false);
        }

        let staged = self.index.stage_remove(name);
        let op = Operation::del(name, self.identity.to_ref());

        match self.log.append(op) {
            Ok(AppendOutcome::Admitted { .. }) => {
                self.index.commit(staged);
                debug!(name, "record deleted");
                Ok(true)
            }
            Ok(AppendOutcome::Rejected { reason }) => {
                self.reconcile(staged)?;
                Err(reject_to_error(reason))
            }
            Err(e) => {
                self.reconcile(staged)?;
                Err(append_error(e))
            }
        }
    }

    /// Search records by name.
    ///
    /// An empty query bypasses the index entirely and enumerates the
    /// materialized view in store order. A non-empty query goes through
    /// the fuzzy index, best match first; each hit is re-checked against
    /// the view, which is authoritative when it has the key.
    pub fn search(&self, query: &str) -> Vec<Record> {
        if query.is_empty() {
            return self.log.all();
        }
        self.index
            .search(query)
            .into_iter()
            .map(|entry| self.log.get(&entry.name).unwrap_or_else(|| entry.to_record()))
            .collect()
    }

    /// Wholesale index replacement from the materialized view.
    ///
    /// The remedy for the accepted staleness window: remote peers'
    /// admitted mutations become searchable only after this runs.
    pub fn rebuild_index(&mut self) {
        self.index = NameIndex::rebuild_with(&self.log.all(), JaroWinklerScorer, self.threshold);
        debug!(indexed = self.index.len(), "index rebuilt");
    }

    fn reconcile(&mut self, staged: StagedMutation) -> Result<(), ServiceError> {
        self.index
            .rollback(staged)
            .map_err(|e| ServiceError::IndexInconsistent(e.to_string()))
    }
}

fn reject_to_error(reason: RejectReason) -> ServiceError {
    match reason {
        RejectReason::IdentityUnverified => ServiceError::IdentityVerificationFailed,
        RejectReason::NotOwner { key, owner } => ServiceError::OwnershipViolation { key, owner },
        RejectReason::MissingKey => ServiceError::InvalidOperation("missing key".into()),
        RejectReason::MalformedValue { detail } => ServiceError::InvalidOperation(detail),
        RejectReason::NoSuchRecord { key } => {
            ServiceError::InvalidOperation(format!("no current record for {key:?}"))
        }
    }
}

fn append_error(e: LogError) -> ServiceError {
    ServiceError::AppendFailed(e.to_string())
}
