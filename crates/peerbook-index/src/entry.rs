use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use peerbook_types::{AuthorId, Record};

/// Searchable projection of a [`Record`].
///
/// The name is what gets matched; the remaining fields are carried so a
/// hit can be displayed without going back to the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub name: String,
    pub address: String,
    pub timestamp: DateTime<Utc>,
    pub author: AuthorId,
}

impl IndexEntry {
    /// Reconstruct the record this entry projects.
    pub fn to_record(&self) -> Record {
        Record {
            name: self.name.clone(),
            address: self.address.clone(),
            timestamp: self.timestamp,
            author: self.author,
        }
    }
}

impl From<&Record> for IndexEntry {
    fn from(record: &Record) -> Self {
        Self {
            name: record.name.clone(),
            address: record.address.clone(),
            timestamp: record.timestamp,
            author: record.author,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_roundtrip() {
        let record = Record::new("Alice", "a1", AuthorId::ephemeral());
        let entry = IndexEntry::from(&record);
        assert_eq!(entry.to_record(), record);
    }
}
