//! Analysis outcomes and their history projection.
//!
//! Both structs serialize with the camelCase field names used by the
//! persisted `@analysisHistory` record and the analysis service payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of the vegetation change between two periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeStatus {
    NoChange,
    PossibleIllegal,
}

impl ChangeStatus {
    /// Fixed explanation shown alongside a result.
    pub fn details(&self) -> &'static str {
        match self {
            ChangeStatus::NoChange => "No significant changes in vegetation detected.",
            ChangeStatus::PossibleIllegal => {
                "Significant vegetation decrease detected. This could indicate illegal logging or land clearing."
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChangeStatus::NoChange => "No Significant Change",
            ChangeStatus::PossibleIllegal => "Possible Illegal Activity",
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The outcome of one successful analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub id: String,
    pub date: DateTime<Utc>,
    pub polygon_id: String,
    /// Mean vegetation index of period 2 minus period 1, in `[-1, 1]`.
    pub ndvi_difference: f64,
    pub image_url: String,
    pub status: ChangeStatus,
    pub details: String,
}

/// Display record of a past analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub ndvi_difference: f64,
    pub image_url: String,
    pub status: ChangeStatus,
}

impl HistoryItem {
    pub fn from_result(result: &AnalysisResult, location: impl Into<String>) -> Self {
        Self {
            id: result.id.clone(),
            date: result.date,
            location: location.into(),
            ndvi_difference: result.ndvi_difference,
            image_url: result.image_url.clone(),
            status: result.status,
        }
    }
}
