use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::author::AuthorId;

/// A named address record, the domain entity replicated across peers.
///
/// A record is immutable once created: a further PUT for the same name
/// replaces it whole, and a DEL removes it. Whoever's PUT most recently
/// produced the current record owns the name until they replace or delete
/// it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Unique display name; the key under which the record is stored.
    pub name: String,
    /// The address payload carried for display.
    pub address: String,
    /// Creation time of this version of the record.
    pub timestamp: DateTime<Utc>,
    /// Identity of the writer whose PUT produced this record.
    pub author: AuthorId,
}

impl Record {
    /// Create a record stamped with the current time.
    pub fn new(name: impl Into<String>, address: impl Into<String>, author: AuthorId) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            timestamp: Utc::now(),
            author,
        }
    }
}
