use std::fmt;

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
///
/// No range invariant is enforced here; callers that need one validate at
/// their own boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Parsed geocoding response. Only `origin` drives the view; the rest is kept
/// for display and debugging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub origin: Coordinate,
    pub address: Option<String>,
    pub confidence: Option<f64>,
    pub raw: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathOrdering {
    /// Points stay in start-to-end order.
    #[default]
    Traversal,
    /// Points are stably sorted by latitude, northernmost first.
    LatitudeDescending,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<Coordinate>);

impl Path {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self(points)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.0
    }

    pub fn first(&self) -> Option<Coordinate> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<Coordinate> {
        self.0.last().copied()
    }

    pub fn sort_by_latitude_desc(&mut self) {
        self.0.sort_by(|a, b| b.latitude.total_cmp(&a.latitude));
    }
}

impl IntoIterator for Path {
    type Item = Coordinate;
    type IntoIter = std::vec::IntoIter<Coordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
