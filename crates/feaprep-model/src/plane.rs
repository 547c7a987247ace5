//! The planar face frame: a point on the plane plus an orthonormal
//! (u, v, normal) triad.

use feaprep_math::{Dir3, Point2, Point3, Vec3};

/// A plane defined by an origin point and an orthonormal coordinate frame.
///
/// Parameterization: `P(u, v) = origin + u * x_dir + v * y_dir`.
/// The normal is `x_dir × y_dir` and, for faces of a solid, points
/// outward from material.
#[derive(Debug, Clone)]
pub struct Plane {
    /// Origin point on the plane.
    pub origin: Point3,
    /// Unit vector along the u direction.
    pub x_dir: Dir3,
    /// Unit vector along the v direction.
    pub y_dir: Dir3,
    /// Unit normal (x_dir × y_dir).
    pub normal: Dir3,
}

impl Plane {
    /// Create a plane from origin and two direction vectors (normalized
    /// internally). The normal follows the right-hand rule.
    pub fn new(origin: Point3, x_dir: Vec3, y_dir: Vec3) -> Self {
        let x = Dir3::new_normalize(x_dir);
        let y = Dir3::new_normalize(y_dir);
        let n = Dir3::new_normalize(x_dir.cross(&y_dir));
        Self {
            origin,
            x_dir: x,
            y_dir: y,
            normal: n,
        }
    }

    /// Create a plane from origin and normal. The u/v directions are
    /// chosen arbitrarily, perpendicular to the normal.
    pub fn from_normal(origin: Point3, normal: Vec3) -> Self {
        let n = Dir3::new_normalize(normal);
        let arbitrary = if n.as_ref().x.abs() < 0.9 {
            Vec3::x()
        } else {
            Vec3::y()
        };
        let x = Dir3::new_normalize(arbitrary.cross(n.as_ref()));
        let y = Dir3::new_normalize(n.as_ref().cross(x.as_ref()));
        Self {
            origin,
            x_dir: x,
            y_dir: y,
            normal: n,
        }
    }

    /// Project a 3D point into this plane's (u, v) frame.
    pub fn project(&self, p: &Point3) -> Point2 {
        let d = p - self.origin;
        Point2::new(d.dot(self.x_dir.as_ref()), d.dot(self.y_dir.as_ref()))
    }

    /// Evaluate a (u, v) frame point back into 3D.
    pub fn point_at(&self, uv: &Point2) -> Point3 {
        self.origin + uv.x * self.x_dir.as_ref() + uv.y * self.y_dir.as_ref()
    }

    /// Signed perpendicular distance from a point to this plane
    /// (positive on the normal side).
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        (p - self.origin).dot(self.normal.as_ref())
    }

    /// Signed perpendicular offset of the plane from the world origin.
    pub fn offset(&self) -> f64 {
        self.origin.coords.dot(self.normal.as_ref())
    }

    /// True if the frame survived construction: all axes finite, unit
    /// length, with the normal perpendicular to both in-plane directions.
    /// Degenerate input (zero-length direction vectors) produces NaN axes
    /// which this reports as invalid.
    pub fn is_valid(&self) -> bool {
        let unit = |d: &Dir3| {
            let v = d.as_ref();
            v.x.is_finite() && v.y.is_finite() && v.z.is_finite() && (v.norm() - 1.0).abs() < 1e-9
        };
        unit(&self.x_dir)
            && unit(&self.y_dir)
            && unit(&self.normal)
            && self.normal.dot(&self.x_dir).abs() < 1e-9
            && self.normal.dot(&self.y_dir).abs() < 1e-9
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_point_at_roundtrip() {
        let plane = Plane::new(
            Point3::new(1.0, 2.0, 3.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        );
        let uv = Point2::new(4.0, -2.5);
        let p = plane.point_at(&uv);
        let back = plane.project(&p);
        assert!((back.x - uv.x).abs() < 1e-12);
        assert!((back.y - uv.y).abs() < 1e-12);
    }

    #[test]
    fn test_signed_distance() {
        let plane = Plane::new(Point3::origin(), Vec3::x(), Vec3::y());
        assert!((plane.signed_distance(&Point3::new(7.0, -3.0, 2.0)) - 2.0).abs() < 1e-12);
        assert!((plane.signed_distance(&Point3::new(0.0, 0.0, -1.5)) + 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_offset() {
        let plane = Plane::new(Point3::new(0.0, 0.0, 10.0), Vec3::x(), Vec3::y());
        assert!((plane.offset() - 10.0).abs() < 1e-12);
        // flipped frame: same plane, opposite offset sign
        let flipped = Plane::new(Point3::new(0.0, 0.0, 10.0), Vec3::y(), Vec3::x());
        assert!((flipped.offset() + 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_normal_frame() {
        let plane = Plane::from_normal(Point3::origin(), Vec3::new(0.0, 0.0, 2.0));
        assert!(plane.is_valid());
        assert!((plane.normal.as_ref().z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_plane_invalid() {
        let plane = Plane::new(Point3::origin(), Vec3::zeros(), Vec3::y());
        assert!(!plane.is_valid());
        // parallel directions give a zero-length normal
        let folded = Plane::new(Point3::origin(), Vec3::x(), Vec3::x());
        assert!(!folded.is_valid());
    }
}
