use crate::error::ValidationError;
use crate::geometry::{self, Bounds, GeometryError};
use crate::point::Point;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum number of points for a polygon to be saved or analyzed.
pub const MIN_POINTS: usize = 3;

/// A land parcel outlined by an ordered ring of points.
///
/// The in-progress polygon shares this shape but may have fewer than
/// [`MIN_POINTS`] points, an empty `id` and an empty `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Polygon {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub points: Vec<Point>,
    /// Set when the polygon is committed to the saved collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Polygon {
    /// An empty, uncommitted polygon.
    pub fn empty() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            points: Vec::new(),
            created_at: None,
        }
    }

    pub fn with_points(points: Vec<Point>) -> Self {
        Self {
            points,
            ..Self::empty()
        }
    }

    pub fn is_valid(&self) -> bool {
        self.points.len() >= MIN_POINTS
    }

    pub fn ensure_valid(&self) -> Result<(), ValidationError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ValidationError::InsufficientPoints {
                found: self.points.len(),
            })
        }
    }

    pub fn contains(&self, point: &Point) -> bool {
        geometry::point_in_polygon(point, &self.points)
    }

    pub fn centroid(&self) -> Point {
        geometry::centroid(&self.points)
    }

    pub fn bounds(&self) -> Result<Bounds, GeometryError> {
        geometry::bounds(&self.points)
    }
}

impl Default for Polygon {
    fn default() -> Self {
        Self::empty()
    }
}
