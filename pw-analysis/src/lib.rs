//! Vegetation-change analysis for drawn parcels.
//!
//! This crate provides:
//! - `request`: validation of user selections into an analysis request
//! - `engine`: the single-flight analysis workflow and its display state
//! - `backend`: where change measurements come from (imagery + metric, or
//!   a remote analysis service with the `api` feature)
//! - `metric` / `classify`: the change score and its classification

pub mod backend;
pub mod classify;
pub mod config;
pub mod engine;
pub mod metric;
#[cfg(feature = "api")]
pub mod remote;
pub mod request;

pub use backend::{AnalysisBackend, BackendError, ImageryBackend, ImageryProvider, Measurement, StaticMapProvider};
pub use config::AnalysisConfig;
pub use engine::{AnalysisEngine, AnalysisError, ANALYSIS_FAILED_MESSAGE};
pub use metric::{ChangeMetric, MeanNdviDifference, PeriodImagery, RandomDifference};
#[cfg(feature = "api")]
pub use remote::RemoteBackend;
pub use request::AnalysisRequest;
