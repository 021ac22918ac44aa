//! Coordinate conversion module
//!
//! Maps GPS coordinates onto the planar campus map frame and back using an
//! equirectangular small-area approximation around a fixed reference point.
//! No curvature correction is applied, so results are only meaningful within
//! a few kilometers of the origin.

use geo::Point;
use serde::{Deserialize, Serialize};

/// Meters per degree used for both axes
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Campus center the planar frame is anchored to
pub const CAMPUS_ORIGIN: Coordinate = Coordinate {
    lat: 33.6844,
    lng: 73.0479,
};

/// External GPS representation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinate> for Point<f64> {
    fn from(coord: Coordinate) -> Self {
        Point::new(coord.lng, coord.lat)
    }
}

impl From<Point<f64>> for Coordinate {
    fn from(point: Point<f64>) -> Self {
        Coordinate {
            lat: point.y(),
            lng: point.x(),
        }
    }
}

/// GPS <-> planar conversion anchored at `origin`.
///
/// `x` grows eastwards, `y` grows southwards (screen orientation).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateTransform {
    pub origin: Coordinate,
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self::new(CAMPUS_ORIGIN)
    }
}

impl CoordinateTransform {
    pub fn new(origin: Coordinate) -> Self {
        Self { origin }
    }

    #[inline]
    pub fn to_planar(&self, lat: f64, lng: f64) -> (f64, f64) {
        let x = (lng - self.origin.lng) * METERS_PER_DEGREE;
        let y = (self.origin.lat - lat) * METERS_PER_DEGREE;
        (x, y)
    }

    #[inline]
    pub fn to_geo(&self, x: f64, y: f64) -> (f64, f64) {
        let lat = self.origin.lat - y / METERS_PER_DEGREE;
        let lng = self.origin.lng + x / METERS_PER_DEGREE;
        (lat, lng)
    }

    /// Planar point for a GPS coordinate
    pub fn project(&self, coord: Coordinate) -> Point<f64> {
        let (x, y) = self.to_planar(coord.lat, coord.lng);
        Point::new(x, y)
    }

    /// GPS coordinate for a planar point
    pub fn unproject(&self, point: Point<f64>) -> Coordinate {
        let (lat, lng) = self.to_geo(point.x(), point.y());
        Coordinate { lat, lng }
    }
}
