use serde::{Deserialize, Serialize};

/// Configuration for the ownership gate.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GateConfig {
    /// When `true`, the gate skips the ownership check: any operation from
    /// a verified identity with a well-formed key and value is admitted.
    /// Identity verification and structural checks still apply. Suits a
    /// single-user local store; the default is enforcing.
    pub permissive: bool,
}

impl GateConfig {
    /// A permissive configuration for single-user local stores.
    pub fn permissive() -> Self {
        Self { permissive: true }
    }
}
