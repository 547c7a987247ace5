#![warn(missing_docs)]

//! Read-only assembly data model for feaprep contact detection.
//!
//! Represents what the host CAD kernel exposes to the detection pipeline:
//! an ordered collection of bodies, each with planar/curved faces and
//! line/curve edges. Geometry kinds are tagged variants — the matcher
//! pattern-matches on the tag and skips unsupported kinds explicitly
//! instead of inspecting live kernel objects.
//!
//! All cross-references are arena-style integer handles
//! ([`BodyIndex`], [`FaceIndex`], [`EdgeIndex`]) into caller-owned
//! tables, so detection results carry no lifetime coupling to the host's
//! object graph.

use serde::{Deserialize, Serialize};

mod plane;
mod primitives;

pub use plane::Plane;
pub use primitives::make_box;

pub use feaprep_math::{Point2, Point3, Vec3};

/// Handle of a body within an [`Assembly`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyIndex(pub u32);

/// Handle of a face within its owning [`Body`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FaceIndex(pub u32);

/// Handle of an edge within its owning [`Body`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeIndex(pub u32);

/// Geometry of a face, tagged by kind.
///
/// Only planar faces participate in contact matching; curved faces are
/// skipped with a diagnostic entry (documented non-goal, not a silent
/// omission).
#[derive(Debug, Clone)]
pub enum FaceGeometry {
    /// A bounded planar face.
    Planar {
        /// The supporting plane with its (u, v) frame. The normal is unit
        /// length and points outward from solid material.
        plane: Plane,
        /// Closed boundary polygon in the plane's (u, v) frame,
        /// counter-clockwise as seen from the outward normal side.
        boundary: Vec<Point2>,
    },
    /// A non-planar face (cylinder, sphere, blend…). Excluded from
    /// matching.
    Curved,
}

/// A face of a body.
#[derive(Debug, Clone)]
pub struct Face {
    /// The face geometry.
    pub geometry: FaceGeometry,
}

impl Face {
    /// Create a planar face from a plane and its boundary polygon.
    pub fn planar(plane: Plane, boundary: Vec<Point2>) -> Self {
        Self {
            geometry: FaceGeometry::Planar { plane, boundary },
        }
    }

    /// The plane and boundary if this face is planar.
    pub fn as_planar(&self) -> Option<(&Plane, &[Point2])> {
        match &self.geometry {
            FaceGeometry::Planar { plane, boundary } => Some((plane, boundary)),
            FaceGeometry::Curved => None,
        }
    }
}

/// Geometry of an edge, tagged by kind.
#[derive(Debug, Clone)]
pub enum EdgeGeometry {
    /// A straight bounded line segment.
    Line {
        /// First endpoint.
        start: Point3,
        /// Second endpoint.
        end: Point3,
    },
    /// A curved edge (arc, spline…). Excluded from matching.
    Curve,
}

/// An edge of a body.
#[derive(Debug, Clone)]
pub struct Edge {
    /// The edge geometry.
    pub geometry: EdgeGeometry,
}

impl Edge {
    /// Create a straight line edge from two endpoints.
    pub fn line(start: Point3, end: Point3) -> Self {
        Self {
            geometry: EdgeGeometry::Line { start, end },
        }
    }

    /// The endpoints if this edge is a line segment.
    pub fn as_line(&self) -> Option<(Point3, Point3)> {
        match self.geometry {
            EdgeGeometry::Line { start, end } => Some((start, end)),
            EdgeGeometry::Curve => None,
        }
    }
}

/// A solid body: an identity, an optional display name, and its faces
/// and edges.
#[derive(Debug, Clone, Default)]
pub struct Body {
    /// Display name from the host document, if any.
    pub name: Option<String>,
    /// Faces in host order.
    pub faces: Vec<Face>,
    /// Edges in host order.
    pub edges: Vec<Edge>,
}

impl Body {
    /// Face lookup by handle.
    pub fn face(&self, index: FaceIndex) -> &Face {
        &self.faces[index.0 as usize]
    }

    /// Edge lookup by handle.
    pub fn edge(&self, index: EdgeIndex) -> &Edge {
        &self.edges[index.0 as usize]
    }

    /// Iterate faces with their handles.
    pub fn faces(&self) -> impl Iterator<Item = (FaceIndex, &Face)> {
        self.faces
            .iter()
            .enumerate()
            .map(|(i, f)| (FaceIndex(i as u32), f))
    }

    /// Iterate edges with their handles.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeIndex, &Edge)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeIndex(i as u32), e))
    }
}

/// An ordered collection of bodies under consideration for one detection
/// run. Owned by the caller; detection only reads it.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    /// Bodies in host order.
    pub bodies: Vec<Body>,
}

impl Assembly {
    /// Create an empty assembly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body and return its handle.
    pub fn push_body(&mut self, body: Body) -> BodyIndex {
        let index = BodyIndex(self.bodies.len() as u32);
        self.bodies.push(body);
        index
    }

    /// Body lookup by handle.
    pub fn body(&self, index: BodyIndex) -> &Body {
        &self.bodies[index.0 as usize]
    }

    /// Iterate bodies with their handles.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyIndex, &Body)> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(i, b)| (BodyIndex(i as u32), b))
    }

    /// Number of bodies.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// True if the assembly has no bodies.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feaprep_math::Vec3;

    #[test]
    fn test_push_and_lookup() {
        let mut assembly = Assembly::new();
        let a = assembly.push_body(make_box("a", Point3::origin(), Vec3::new(1.0, 1.0, 1.0)));
        let b = assembly.push_body(make_box("b", Point3::origin(), Vec3::new(2.0, 2.0, 2.0)));
        assert_eq!(a, BodyIndex(0));
        assert_eq!(b, BodyIndex(1));
        assert_eq!(assembly.len(), 2);
        assert_eq!(assembly.body(a).name.as_deref(), Some("a"));
    }

    #[test]
    fn test_face_tagged_access() {
        let body = make_box("box", Point3::origin(), Vec3::new(10.0, 10.0, 10.0));
        for (_, face) in body.faces() {
            assert!(face.as_planar().is_some());
        }
        let curved = Face {
            geometry: FaceGeometry::Curved,
        };
        assert!(curved.as_planar().is_none());
    }

    #[test]
    fn test_edge_tagged_access() {
        let edge = Edge::line(Point3::origin(), Point3::new(1.0, 0.0, 0.0));
        let (start, end) = edge.as_line().unwrap();
        assert!((start - Point3::origin()).norm() < 1e-12);
        assert!((end.x - 1.0).abs() < 1e-12);
        let curve = Edge {
            geometry: EdgeGeometry::Curve,
        };
        assert!(curve.as_line().is_none());
    }
}
