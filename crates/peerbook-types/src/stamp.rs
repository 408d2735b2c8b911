use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Hybrid Logical Clock timestamp for causal ordering of log entries.
///
/// Combines a physical wall-clock component with a logical counter and a
/// node identifier. This lets replicas establish a total order over
/// concurrently appended entries without synchronized clocks: entries from
/// divergent branches sort by `physical_ms`, then `logical`, then
/// `node_id`, and the merge layer breaks any remaining tie with the entry's
/// content hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CausalStamp {
    /// Wall-clock milliseconds since UNIX epoch.
    pub physical_ms: u64,
    /// Logical counter for events at the same physical time.
    pub logical: u32,
    /// Node identifier to break ties between nodes.
    pub node_id: u16,
}

impl CausalStamp {
    /// Create a new stamp with explicit values.
    pub fn new(physical_ms: u64, logical: u32, node_id: u16) -> Self {
        Self {
            physical_ms,
            logical,
            node_id,
        }
    }

    /// Create a stamp for the current wall-clock time.
    pub fn now(node_id: u16) -> Self {
        let physical_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self {
            physical_ms,
            logical: 0,
            node_id,
        }
    }

    /// The zero stamp (genesis).
    pub const fn zero() -> Self {
        Self {
            physical_ms: 0,
            logical: 0,
            node_id: 0,
        }
    }

    /// Returns `true` if this stamp is causally after `other`.
    pub fn is_after(&self, other: &Self) -> bool {
        self > other
    }

    /// Returns `true` if this stamp is causally before `other`.
    pub fn is_before(&self, other: &Self) -> bool {
        self < other
    }

    /// Advance this stamp so the result is strictly after both this stamp
    /// and the received one. Used on receipt of a remote entry.
    pub fn advance(&self, received: &Self, node_id: u16) -> Self {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        let max_physical = now_ms.max(self.physical_ms).max(received.physical_ms);

        let logical = if max_physical == self.physical_ms
            && max_physical == received.physical_ms
        {
            self.logical.max(received.logical) + 1
        } else if max_physical == self.physical_ms {
            self.logical + 1
        } else if max_physical == received.physical_ms {
            received.logical + 1
        } else {
            0
        };

        Self {
            physical_ms: max_physical,
            logical,
            node_id,
        }
    }
}

impl PartialOrd for CausalStamp {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CausalStamp {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.physical_ms
            .cmp(&other.physical_ms)
            .then(self.logical.cmp(&other.logical))
            .then(self.node_id.cmp(&other.node_id))
    }
}

impl fmt::Debug for CausalStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CausalStamp({}ms.{}.n{})",
            self.physical_ms, self.logical, self.node_id
        )
    }
}

impl fmt::Display for CausalStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.n{}", self.physical_ms, self.logical, self.node_id)
    }
}
