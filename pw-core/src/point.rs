use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Formats as `lat,lng`, the form used in imagery path parameters.
impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid point {0:?}: expected `lat,lng`")]
pub struct ParsePointError(pub String);

impl FromStr for Point {
    type Err = ParsePointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| ParsePointError(s.to_string()))?;
        let latitude: f64 = lat
            .trim()
            .parse()
            .map_err(|_| ParsePointError(s.to_string()))?;
        let longitude: f64 = lng
            .trim()
            .parse()
            .map_err(|_| ParsePointError(s.to_string()))?;
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(ParsePointError(s.to_string()));
        }
        Ok(Point::new(latitude, longitude))
    }
}
