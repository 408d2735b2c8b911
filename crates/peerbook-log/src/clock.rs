use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use peerbook_types::CausalStamp;

/// Internal mutable state of the Hybrid Logical Clock.
struct ClockState {
    /// Last-known physical millisecond timestamp.
    physical_ms: u64,
    /// Logical counter for events within the same physical millisecond.
    logical: u32,
}

/// Hybrid Logical Clock stamping log entries for causal ordering.
///
/// Combines wall-clock time with a logical counter to produce
/// monotonically increasing [`CausalStamp`] values. Safe for concurrent
/// use via an internal [`Mutex`].
///
/// # HLC Rules
///
/// - **Local event**: `physical = max(wall_clock, state.physical)`.
///   If physical advanced, `logical = 0`; otherwise `logical += 1`.
/// - **Receive**: `physical = max(wall_clock, state.physical, received.physical)`,
///   with logical adjusted to be strictly greater than both local and received
///   counters when the physical component ties.
/// - **Guarantee**: stamps are monotonic and preserve causal ordering.
pub struct HybridLogicalClock {
    /// Unique identifier for this node.
    node_id: u16,
    /// Mutable clock state protected by a mutex.
    state: Mutex<ClockState>,
}

impl HybridLogicalClock {
    /// Create a new clock for the given node.
    pub fn new(node_id: u16) -> Self {
        Self {
            node_id,
            state: Mutex::new(ClockState {
                physical_ms: 0,
                logical: 0,
            }),
        }
    }

    /// Generate a new monotonic stamp for a local event.
    ///
    /// The returned [`CausalStamp`] is guaranteed to be strictly greater
    /// than any previously returned value from this clock.
    pub fn now(&self) -> CausalStamp {
        let wall = Self::wall_clock_ms();
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        let new_physical = wall.max(state.physical_ms);

        let new_logical = if new_physical > state.physical_ms {
            // Physical clock advanced; reset logical counter.
            0
        } else {
            // Same physical tick; increment logical counter.
            state.logical + 1
        };

        state.physical_ms = new_physical;
        state.logical = new_logical;

        CausalStamp::new(new_physical, new_logical, self.node_id)
    }

    /// Update the clock on receipt of a remote stamp, returning a new
    /// stamp that is strictly greater than both the local state and the
    /// received one. The receive rule itself lives in
    /// [`CausalStamp::advance`]; this only folds the result back into the
    /// clock state.
    pub fn update(&self, received: &CausalStamp) -> CausalStamp {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let local = CausalStamp::new(state.physical_ms, state.logical, self.node_id);
        let next = local.advance(received, self.node_id);

        state.physical_ms = next.physical_ms;
        state.logical = next.logical;
        next
    }

    /// The node identifier this clock was created with.
    pub fn node_id(&self) -> u16 {
        self.node_id
    }

    /// Current wall-clock time in milliseconds since the UNIX epoch.
    fn wall_clock_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}
