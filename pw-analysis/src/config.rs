use serde::Deserialize;
use std::time::Duration;

/// Tunables for the analysis workflow.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Vegetation loss (as a positive NDVI drop) at which a parcel is
    /// flagged as possibly illegal.
    pub change_threshold: f64,
    /// Upper bound on a single backend measurement, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            change_threshold: 0.2,
            timeout_ms: 30_000,
        }
    }
}

impl AnalysisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
