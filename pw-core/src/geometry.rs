//! Pure geometry over polygon rings.
//!
//! A ring is the implicit closed loop formed by a sequence of points: the
//! last point always connects back to the first, whether or not the caller
//! repeated the first point at the end. Latitude is treated as the x axis
//! and longitude as the y axis; no projection is applied.

use crate::point::Point;
use serde::{Deserialize, Serialize};

/// Smallest span (degrees) used when deriving a zoom level.
pub const MIN_SPAN_DEGREES: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("cannot compute bounds of an empty ring")]
    EmptyInput,
}

/// Axis-aligned bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Bounds {
    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    pub fn lng_span(&self) -> f64 {
        self.east - self.west
    }

    /// Midpoint of the box. Differs from [`centroid`] for irregular rings.
    pub fn center(&self) -> Point {
        Point::new(
            (self.north + self.south) / 2.0,
            (self.east + self.west) / 2.0,
        )
    }
}

/// Ray-casting containment test.
///
/// Rings with fewer than three points contain nothing.
pub fn point_in_polygon(point: &Point, ring: &[Point]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = (ring[i].latitude, ring[i].longitude);
        let (xj, yj) = (ring[j].latitude, ring[j].longitude);
        // The straddle check guarantees yj != yi, so the division is safe.
        let crosses = (yi > point.longitude) != (yj > point.longitude)
            && point.latitude < (xj - xi) * (point.longitude - yi) / (yj - yi) + xi;
        if crosses {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Arithmetic mean of the ring's coordinates; `(0, 0)` for an empty ring.
pub fn centroid(ring: &[Point]) -> Point {
    if ring.is_empty() {
        return Point::new(0.0, 0.0);
    }
    let n = ring.len() as f64;
    let lat_sum: f64 = ring.iter().map(|p| p.latitude).sum();
    let lng_sum: f64 = ring.iter().map(|p| p.longitude).sum();
    Point::new(lat_sum / n, lng_sum / n)
}

pub fn bounds(ring: &[Point]) -> Result<Bounds, GeometryError> {
    let first = ring.first().ok_or(GeometryError::EmptyInput)?;
    let init = Bounds {
        north: first.latitude,
        south: first.latitude,
        east: first.longitude,
        west: first.longitude,
    };
    Ok(ring.iter().skip(1).fold(init, |b, p| Bounds {
        north: b.north.max(p.latitude),
        south: b.south.min(p.latitude),
        east: b.east.max(p.longitude),
        west: b.west.min(p.longitude),
    }))
}

/// Zoom level at which the bounds roughly fill a map tile:
/// `floor(log2(360 / max_span)) + 1`.
///
/// Degenerate bounds (a single repeated point) are clamped to
/// [`MIN_SPAN_DEGREES`] so the logarithm stays finite.
pub fn zoom_level(bounds: &Bounds) -> i32 {
    let max_span = bounds
        .lat_span()
        .max(bounds.lng_span())
        .max(MIN_SPAN_DEGREES);
    (360.0 / max_span).log2().floor() as i32 + 1
}
