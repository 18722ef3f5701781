//! Satellite imagery request descriptors.
//!
//! [`build_imagery_request`] only assembles parameters; fetching the image
//! is left to whichever imagery provider consumes the request.

use crate::geometry::{self, GeometryError};
use crate::point::Point;
use crate::polygon::Polygon;
use serde::{Deserialize, Serialize};

pub const STATIC_MAP_BASE_URL: &str = "https://maps.googleapis.com/maps/api/staticmap";

/// Highest zoom level the static map provider accepts.
pub const MAX_PROVIDER_ZOOM: i32 = 21;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageryRequest {
    /// Midpoint of the polygon's bounds (not its centroid).
    pub center: Point,
    pub zoom: i32,
    pub path: Vec<Point>,
}

/// Fixed rendering parameters for the static map provider.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticMapStyle {
    pub base_url: String,
    pub api_key: String,
    pub width: u32,
    pub height: u32,
    pub stroke_color: String,
    pub stroke_weight: u32,
    pub fill_color: String,
}

impl StaticMapStyle {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: STATIC_MAP_BASE_URL.to_string(),
            api_key: api_key.into(),
            width: 600,
            height: 400,
            stroke_color: "0xFF0000".to_string(),
            stroke_weight: 2,
            fill_color: "0xFF000033".to_string(),
        }
    }
}

pub fn build_imagery_request(polygon: &Polygon) -> Result<ImageryRequest, GeometryError> {
    let bounds = geometry::bounds(&polygon.points)?;
    Ok(ImageryRequest {
        center: bounds.center(),
        zoom: geometry::zoom_level(&bounds),
        path: polygon.points.clone(),
    })
}

impl ImageryRequest {
    /// Pipe-delimited `lat,lng` list.
    pub fn encoded_path(&self) -> String {
        self.path
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join("|")
    }

    pub fn static_map_url(&self, style: &StaticMapStyle) -> String {
        let zoom = self.zoom.clamp(0, MAX_PROVIDER_ZOOM);
        format!(
            "{}?center={}&zoom={}&size={}x{}&maptype=satellite&path=color:{}|weight:{}|fillcolor:{}|{}&key={}",
            style.base_url,
            self.center,
            zoom,
            style.width,
            style.height,
            style.stroke_color,
            style.stroke_weight,
            style.fill_color,
            self.encoded_path(),
            style.api_key
        )
    }
}
