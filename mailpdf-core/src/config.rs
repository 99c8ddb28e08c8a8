use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Settings the pipeline itself needs, independent of any transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Reference whose archive snapshot is used by the all-templates export.
    pub sync_reference: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sync_reference: "master".to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn trace_loaded(&self) {
        info!(sync_reference = %self.sync_reference, "Loaded PipelineConfig");
        debug!(?self, "PipelineConfig loaded (full debug)");
    }
}
