use std::fmt;

use serde::{Deserialize, Serialize};

use crate::author::AuthorId;
use crate::record::Record;

/// Kind of mutation an operation proposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpKind {
    /// Create or fully replace the record under a key.
    Put,
    /// Remove the record under a key.
    Del,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpKind::Put => write!(f, "PUT"),
            OpKind::Del => write!(f, "DEL"),
        }
    }
}

/// Opaque reference to a writer identity, carried by every operation.
///
/// The reference alone proves nothing; the admission gate resolves it
/// through an identity verifier and checks the resolved identity's
/// self-certification before any ownership decision.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityRef(pub AuthorId);

impl IdentityRef {
    /// The referenced author id.
    pub fn author(&self) -> AuthorId {
        self.0
    }
}

impl fmt::Debug for IdentityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityRef({})", self.0.short_id())
    }
}

/// A proposed log entry: a PUT or DEL on a record key.
///
/// Never mutated after construction; submitted once and either admitted
/// into the log or rejected. The key is optional at the wire level so the
/// gate can reject a structurally invalid operation instead of the type
/// system silently hiding it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// The kind of mutation.
    pub kind: OpKind,
    /// The record key this operation targets.
    pub key: Option<String>,
    /// The full record for PUT; absent for DEL.
    pub value: Option<Record>,
    /// Reference to the identity proposing the operation.
    pub identity: IdentityRef,
}

impl Operation {
    /// Construct a well-formed PUT carrying the given record.
    pub fn put(record: Record, identity: IdentityRef) -> Self {
        Self {
            kind: OpKind::Put,
            key: Some(record.name.clone()),
            value: Some(record),
            identity,
        }
    }

    /// Construct a well-formed DEL for the given key.
    pub fn del(key: impl Into<String>, identity: IdentityRef) -> Self {
        Self {
            kind: OpKind::Del,
            key: Some(key.into()),
            value: None,
            identity,
        }
    }

    /// The target key, if present and non-empty.
    pub fn key(&self) -> Option<&str> {
        match self.key.as_deref() {
            Some("") | None => None,
            Some(k) => Some(k),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> IdentityRef {
        IdentityRef(AuthorId::ephemeral())
    }

    #[test]
    fn put_carries_key_and_value() {
        let id = identity();
        let record = Record::new("Alice", "a1", id.author());
        let op = Operation::put(record.clone(), id);
        assert_eq!(op.kind, OpKind::Put);
        assert_eq!(op.key(), Some("Alice"));
        assert_eq!(op.value, Some(record));
    }

    #[test]
    fn del_has_no_value() {
        let op = Operation::del("Alice", identity());
        assert_eq!(op.kind, OpKind::Del);
        assert_eq!(op.key(), Some("Alice"));
        assert!(op.value.is_none());
    }

    #[test]
    fn empty_key_reads_as_absent() {
        let mut op = Operation::del("x", identity());
        op.key = Some(String::new());
        assert_eq!(op.key(), None);
        op.key = None;
        assert_eq!(op.key(), None);
    }

    #[test]
    fn serde_roundtrip() {
        let id = identity();
        let op = Operation::put(Record::new("Carol", "c3", id.author()), id);
        let json = serde_json::to_string(&op).unwrap();
        let parsed: Operation = serde_json::from_str(&json).unwrap();
        assert_eq!(op, parsed);
    }
}
