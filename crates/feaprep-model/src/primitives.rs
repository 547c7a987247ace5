//! Box body construction.
//!
//! Builds the planar-face/line-edge view of an axis-aligned box, the
//! shape every synthetic fixture and test assembly in this workspace is
//! made of. Real assemblies come from the host kernel; this constructor
//! exists so the pipeline can be exercised without one.

use feaprep_math::{Point2, Point3, Vec3};

use crate::{Body, Edge, Face, Plane};

/// Build a box body with its minimum corner at `origin` and dimensions
/// `(size.x, size.y, size.z)`.
///
/// The box has 6 planar faces with outward normals and 12 line edges.
/// Vertex layout (corner-aligned at `origin`):
/// ```text
///     v4----v5
///    /|    /|
///   v7----v6|    z
///   | v0--|-v1   | y
///   |/    |/     |/
///   v3----v2     +---x
/// ```
/// Face order: bottom, top, front (y min), back (y max), left (x min),
/// right (x max). Each face's plane origin sits at the face's minimum
/// corner and its boundary is the CCW rectangle `[0, su] × [0, sv]` in
/// the plane frame.
pub fn make_box(name: impl Into<String>, origin: Point3, size: Vec3) -> Body {
    let (sx, sy, sz) = (size.x, size.y, size.z);
    let o = origin;

    // For each face: plane origin, x_dir, y_dir, extent along x_dir,
    // extent along y_dir. Normal = x_dir × y_dir, chosen outward.
    let face_defs: [(Point3, Vec3, Vec3, f64, f64); 6] = [
        // Bottom (z = o.z): normal -Z = (0,1,0) × (1,0,0)
        (o, Vec3::y(), Vec3::x(), sy, sx),
        // Top (z = o.z + sz): normal +Z = (1,0,0) × (0,1,0)
        (
            Point3::new(o.x, o.y, o.z + sz),
            Vec3::x(),
            Vec3::y(),
            sx,
            sy,
        ),
        // Front (y = o.y): normal -Y = (1,0,0) × (0,0,1)
        (o, Vec3::x(), Vec3::z(), sx, sz),
        // Back (y = o.y + sy): normal +Y = (0,0,1) × (1,0,0)
        (
            Point3::new(o.x, o.y + sy, o.z),
            Vec3::z(),
            Vec3::x(),
            sz,
            sx,
        ),
        // Left (x = o.x): normal -X = (0,0,1) × (0,1,0)
        (o, Vec3::z(), Vec3::y(), sz, sy),
        // Right (x = o.x + sx): normal +X = (0,1,0) × (0,0,1)
        (
            Point3::new(o.x + sx, o.y, o.z),
            Vec3::y(),
            Vec3::z(),
            sy,
            sz,
        ),
    ];

    let faces = face_defs
        .iter()
        .map(|&(plane_origin, x_dir, y_dir, su, sv)| {
            let plane = Plane::new(plane_origin, x_dir, y_dir);
            let boundary = vec![
                Point2::new(0.0, 0.0),
                Point2::new(su, 0.0),
                Point2::new(su, sv),
                Point2::new(0.0, sv),
            ];
            Face::planar(plane, boundary)
        })
        .collect();

    // 8 corners
    let v = [
        Point3::new(o.x, o.y, o.z),
        Point3::new(o.x + sx, o.y, o.z),
        Point3::new(o.x + sx, o.y + sy, o.z),
        Point3::new(o.x, o.y + sy, o.z),
        Point3::new(o.x, o.y, o.z + sz),
        Point3::new(o.x + sx, o.y, o.z + sz),
        Point3::new(o.x + sx, o.y + sy, o.z + sz),
        Point3::new(o.x, o.y + sy, o.z + sz),
    ];

    // 12 edges: bottom ring, top ring, verticals
    let edge_pairs: [(usize, usize); 12] = [
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 0),
        (4, 5),
        (5, 6),
        (6, 7),
        (7, 4),
        (0, 4),
        (1, 5),
        (2, 6),
        (3, 7),
    ];
    let edges = edge_pairs
        .iter()
        .map(|&(a, b)| Edge::line(v[a], v[b]))
        .collect();

    Body {
        name: Some(name.into()),
        faces,
        edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feaprep_math::Tolerance;

    #[test]
    fn test_box_counts() {
        let body = make_box("b", Point3::origin(), Vec3::new(10.0, 10.0, 10.0));
        assert_eq!(body.faces.len(), 6);
        assert_eq!(body.edges.len(), 12);
    }

    #[test]
    fn test_box_normals_outward() {
        let body = make_box("b", Point3::origin(), Vec3::new(10.0, 20.0, 30.0));
        let center = Point3::new(5.0, 10.0, 15.0);
        for (_, face) in body.faces() {
            let (plane, _) = face.as_planar().unwrap();
            assert!(plane.is_valid());
            // center of the box is behind every outward face plane
            assert!(
                plane.signed_distance(&center) < 0.0,
                "inward-pointing normal on {:?}",
                plane
            );
        }
    }

    #[test]
    fn test_box_boundary_corners_on_box() {
        let tol = Tolerance::DEFAULT;
        let origin = Point3::new(1.0, 2.0, 3.0);
        let body = make_box("b", origin, Vec3::new(4.0, 5.0, 6.0));
        for (_, face) in body.faces() {
            let (plane, boundary) = face.as_planar().unwrap();
            assert_eq!(boundary.len(), 4);
            for uv in boundary {
                let p = plane.point_at(uv);
                // every boundary corner is a box corner coordinate
                for (c, lo, hi) in [
                    (p.x, 1.0, 5.0),
                    (p.y, 2.0, 7.0),
                    (p.z, 3.0, 9.0),
                ] {
                    assert!(
                        tol.is_zero(c - lo) || tol.is_zero(c - hi) || (c > lo && c < hi),
                        "corner coordinate {c} out of box range [{lo}, {hi}]"
                    );
                }
            }
        }
    }

    #[test]
    fn test_box_top_face_geometry() {
        let body = make_box("b", Point3::origin(), Vec3::new(10.0, 10.0, 10.0));
        let (plane, boundary) = body.faces[1].as_planar().unwrap();
        assert!((plane.normal.as_ref().z - 1.0).abs() < 1e-12);
        assert!((plane.origin.z - 10.0).abs() < 1e-12);
        // CCW rectangle, 10 × 10
        assert!((boundary[2].x - 10.0).abs() < 1e-12);
        assert!((boundary[2].y - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_box_edges_have_box_length() {
        let body = make_box("b", Point3::origin(), Vec3::new(10.0, 20.0, 30.0));
        for (_, edge) in body.edges() {
            let (start, end) = edge.as_line().unwrap();
            let len = (end - start).norm();
            assert!(
                (len - 10.0).abs() < 1e-12 || (len - 20.0).abs() < 1e-12 || (len - 30.0).abs() < 1e-12,
                "unexpected edge length {len}"
            );
        }
    }
}
