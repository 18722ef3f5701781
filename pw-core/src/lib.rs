//! Core types for parcel-watch.
//!
//! This crate provides:
//! - `point` / `polygon`: the drawn parcel data model
//! - `geometry`: containment, centroid, bounds and zoom derivation
//! - `imagery`: satellite image request descriptors built from a polygon
//! - `period`: nullable date-range selections used as analysis inputs
//! - `analysis`: analysis results and their history projection

pub mod analysis;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod imagery;
pub mod period;
pub mod point;
pub mod polygon;

pub use analysis::{AnalysisResult, ChangeStatus, HistoryItem};
pub use error::ValidationError;
pub use geometry::{Bounds, GeometryError};
pub use imagery::ImageryRequest;
pub use period::{DateRange, PeriodSelection};
pub use point::Point;
pub use polygon::Polygon;
