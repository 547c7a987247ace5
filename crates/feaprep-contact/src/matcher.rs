//! Pairwise contact predicate.
//!
//! Decides whether one candidate (face–face, or body-edge–face) is a
//! contact and classifies it: a full-area **face** contact or a
//! reduced-dimension **edge** contact. Rejections carry their reason so
//! the detection loop can trace every candidate it evaluated.

use std::fmt;

use feaprep_math::{Point3, Tolerance};
use feaprep_model::{Body, Edge, Face, Plane, Point2};

use crate::area::{
    clip_segment_convex, oriented_ccw, overlap_region, point_segment_distance, polygon_area,
    segment_line_overlap, self_intersects,
};

/// Why a candidate was rejected. Every variant is written to the
/// diagnostic log so a missing contact can be audited.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// One side is not planar geometry (curved face or curved edge).
    Unsupported,
    /// Normals are not anti-parallel within the angular tolerance —
    /// contacting faces must point toward each other.
    NormalsNotOpposed,
    /// The planes are further apart than the linear tolerance.
    PlanesApart(f64),
    /// Coplanar, but the bounded regions neither overlap nor touch.
    NoOverlap,
    /// The regions touch, but along less than the linear tolerance —
    /// a point touch or a numerical sliver, not a contact.
    TouchTooShort,
    /// An edge endpoint is off the face plane by the given distance.
    EdgeOffPlane(f64),
    /// The edge does not bound any face of its own body that is
    /// coincident and anti-parallel with the target face, so the bodies
    /// do not face each other along it.
    EdgeUnbacked,
    /// The edge lies on the face plane but outside the face's boundary.
    EdgeOutsideFace,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Unsupported => write!(f, "unsupported geometry kind"),
            Rejection::NormalsNotOpposed => write!(f, "normals not anti-parallel"),
            Rejection::PlanesApart(gap) => write!(f, "planes {gap:.4} apart"),
            Rejection::NoOverlap => write!(f, "bounded regions do not overlap"),
            Rejection::TouchTooShort => write!(f, "touch shorter than linear tolerance"),
            Rejection::EdgeOffPlane(d) => write!(f, "edge endpoint {d:.4} off plane"),
            Rejection::EdgeUnbacked => write!(f, "edge not backed by an opposed coincident face"),
            Rejection::EdgeOutsideFace => write!(f, "edge outside face boundary"),
        }
    }
}

/// A successful match, before classification and naming.
#[derive(Debug, Clone)]
pub enum FaceMatch {
    /// Area contact: the overlap region (in the reference face's plane
    /// frame) and its area.
    Area {
        /// Overlap polygon, counter-clockwise in the reference face's
        /// (u, v) space.
        region: Vec<Point2>,
        /// Overlap area (strictly positive).
        area: f64,
    },
    /// Line contact: the 1-D touch segment in 3D.
    Line {
        /// Segment start.
        start: Point3,
        /// Segment end.
        end: Point3,
    },
}

/// Degeneracy check for a face. Returns a description for the log when
/// the face must be skipped; `None` for usable faces. Curved faces are
/// not degenerate — they are excluded separately as unsupported kinds.
pub fn face_degeneracy(face: &Face) -> Option<&'static str> {
    let Some((plane, boundary)) = face.as_planar() else {
        return None;
    };
    if !plane.is_valid() {
        return Some("zero-length or non-unit face normal");
    }
    if boundary.len() < 3 {
        return Some("boundary has fewer than 3 vertices");
    }
    if self_intersects(boundary) {
        return Some("self-intersecting boundary loop");
    }
    None
}

/// Evaluate one face–face candidate.
///
/// Stages, cheapest first: orientation gate (normals anti-parallel),
/// plane-gap gate, then 2-D overlap of the bounded regions in face A's
/// plane frame. A non-negligible overlap area is a face contact; a
/// touch along a 1-D locus longer than the linear tolerance is an edge
/// contact; anything else is no contact.
pub fn match_face_pair(
    face_a: &Face,
    face_b: &Face,
    tol: &Tolerance,
) -> Result<FaceMatch, Rejection> {
    let (plane_a, boundary_a) = face_a.as_planar().ok_or(Rejection::Unsupported)?;
    let (plane_b, boundary_b) = face_b.as_planar().ok_or(Rejection::Unsupported)?;

    if !tol.dirs_antiparallel(&plane_a.normal, &plane_b.normal) {
        return Err(Rejection::NormalsNotOpposed);
    }

    let gap = plane_a.signed_distance(&plane_b.origin).abs();
    if gap > tol.linear {
        return Err(Rejection::PlanesApart(gap));
    }

    // project B's boundary into A's plane frame (drops the normal
    // component, which the gap gate already bounded)
    let projected_b: Vec<Point2> = boundary_b
        .iter()
        .map(|uv| plane_a.project(&plane_b.point_at(uv)))
        .collect();

    let region = overlap_region(boundary_a, &projected_b, tol.linear);
    let overlap = polygon_area(&region).abs();
    if overlap > tol.min_area {
        return Ok(FaceMatch::Area {
            region: oriented_ccw(&region),
            area: overlap,
        });
    }

    // no enclosed area: look for the longest 1-D touch between the two
    // boundary polylines
    let clip_a = oriented_ccw(boundary_a);
    let subj_b = oriented_ccw(&projected_b);
    let mut best: Option<(Point2, Point2, f64)> = None;
    let mut touched = false;
    for i in 0..clip_a.len() {
        let a0 = clip_a[i];
        let a1 = clip_a[(i + 1) % clip_a.len()];
        for j in 0..subj_b.len() {
            let b0 = subj_b[j];
            let b1 = subj_b[(j + 1) % subj_b.len()];
            if let Some((q0, q1)) = segment_line_overlap(&a0, &a1, &b0, &b1, tol.linear) {
                touched = true;
                let len = (q1 - q0).norm();
                if best.as_ref().map_or(true, |&(_, _, l)| len > l) {
                    best = Some((q0, q1, len));
                }
            }
        }
    }
    if let Some((q0, q1, _)) = best {
        return Ok(FaceMatch::Line {
            start: plane_a.point_at(&q0),
            end: plane_a.point_at(&q1),
        });
    }
    if touched || overlap > 0.0 {
        Err(Rejection::TouchTooShort)
    } else {
        Err(Rejection::NoOverlap)
    }
}

/// Evaluate one edge–face candidate: a line edge of `owner` against a
/// planar face of another body. A successful match is always a 1-D
/// contact, returned as the in-region segment endpoints.
///
/// The edge must lie on the face plane, must bound a face of its own
/// body that is coincident with and anti-parallel to the target face
/// (the same "contacting surfaces face each other" policy the
/// orientation gate applies to face pairs), and its in-region portion
/// must be longer than the linear tolerance.
pub fn match_edge_face(
    edge: &Edge,
    owner: &Body,
    face: &Face,
    tol: &Tolerance,
) -> Result<(Point3, Point3), Rejection> {
    let (plane, boundary) = face.as_planar().ok_or(Rejection::Unsupported)?;
    let (start, end) = edge.as_line().ok_or(Rejection::Unsupported)?;

    let d0 = plane.signed_distance(&start).abs();
    let d1 = plane.signed_distance(&end).abs();
    if d0 > tol.linear || d1 > tol.linear {
        return Err(Rejection::EdgeOffPlane(d0.max(d1)));
    }

    if !edge_backed_by_opposed_face(owner, &start, &end, plane, tol) {
        return Err(Rejection::EdgeUnbacked);
    }

    let p0 = plane.project(&start);
    let p1 = plane.project(&end);
    let clip = oriented_ccw(boundary);
    match clip_segment_convex(&p0, &p1, &clip, tol.linear) {
        Some((q0, q1)) if (q1 - q0).norm() > tol.linear => {
            Ok((plane.point_at(&q0), plane.point_at(&q1)))
        }
        Some(_) => Err(Rejection::TouchTooShort),
        None => Err(Rejection::EdgeOutsideFace),
    }
}

/// True if some planar face of `owner` is coincident with and
/// anti-parallel to `target`, with the segment lying on that face's
/// boundary polyline — i.e. the edge belongs to a surface of its body
/// that actually faces the target plane.
fn edge_backed_by_opposed_face(
    owner: &Body,
    start: &Point3,
    end: &Point3,
    target: &Plane,
    tol: &Tolerance,
) -> bool {
    for (_, candidate) in owner.faces() {
        let Some((plane, boundary)) = candidate.as_planar() else {
            continue;
        };
        if !plane.is_valid() || boundary.len() < 3 {
            continue;
        }
        if !tol.dirs_antiparallel(&plane.normal, &target.normal) {
            continue;
        }
        if target.signed_distance(&plane.origin).abs() > tol.linear {
            continue;
        }
        let on_boundary = |p: &Point3| {
            let uv = plane.project(p);
            (0..boundary.len()).any(|i| {
                let a = boundary[i];
                let b = boundary[(i + 1) % boundary.len()];
                point_segment_distance(&uv, &a, &b) <= tol.linear
            })
        };
        if on_boundary(start) && on_boundary(end) {
            return true;
        }
    }
    false
}
