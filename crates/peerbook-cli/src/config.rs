use std::fs;
use std::path::Path;

use anyhow::Context;
use peerbook_index::DEFAULT_THRESHOLD;
use serde::{Deserialize, Serialize};

/// Binary-level configuration, loadable from TOML. Missing fields fall
/// back to defaults; command-line flags override loaded values.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Replica node id mixed into causal stamps.
    pub node_id: u16,
    /// Similarity threshold for fuzzy search, 0.0 to 1.0.
    pub threshold: f64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            node_id: 0,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl CliConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_overrides(mut self, node_id: Option<u16>, threshold: Option<f64>) -> Self {
        if let Some(node_id) = node_id {
            self.node_id = node_id;
        }
        if let Some(threshold) = threshold {
            self.threshold = threshold;
        }
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.threshold),
            "threshold must be between 0.0 and 1.0, got {}",
            self.threshold
        );
        Ok(())
    }
}
