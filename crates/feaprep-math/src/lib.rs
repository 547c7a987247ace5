#![warn(missing_docs)]

//! Math types for feaprep assembly contact detection.
//!
//! Thin wrappers around nalgebra providing domain-specific types for
//! 3D assembly geometry, plus the tolerance configuration that governs
//! every numeric comparison in the contact pipeline.

use nalgebra::{Unit, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// A point in 3D space (conventionally millimeters).
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A point in a face's 2D (u, v) parameter space.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

/// Tolerance configuration for contact detection.
///
/// Geometry positions are floating-point results of upstream modeling
/// operations, so nothing in the pipeline compares coordinates exactly;
/// every gate goes through one of these thresholds. All three values are
/// configuration, not constants — callers tune them per document units
/// and modeling precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Linear distance tolerance in mm. Two planes closer than this along
    /// their shared normal are considered coincident.
    pub linear: f64,
    /// Angular tolerance in radians for the anti-parallel normal check.
    pub angular: f64,
    /// Minimum overlap area in mm² for a face contact. Overlaps below
    /// this are numerical slivers, not area contacts.
    pub min_area: f64,
}

impl Tolerance {
    /// Default detection tolerances: 0.05 mm linear, ~0.5° angular,
    /// 1e-4 mm² minimum contact area.
    pub const DEFAULT: Self = Self {
        linear: 0.05,
        angular: 8.7e-3,
        min_area: 1e-4,
    };

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }

    /// Check if two points are coincident within the linear tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if two unit directions are anti-parallel within the angular
    /// tolerance (they point toward each other).
    pub fn dirs_antiparallel(&self, a: &Dir3, b: &Dir3) -> bool {
        // angle between a and -b must be at most `angular`
        -a.dot(b) >= self.angular.cos()
    }

    /// Check if two unit directions are parallel (same sense) within the
    /// angular tolerance.
    pub fn dirs_parallel(&self, a: &Dir3, b: &Dir3) -> bool {
        a.dot(b) >= self.angular.cos()
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
