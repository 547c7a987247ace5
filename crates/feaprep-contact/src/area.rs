//! Overlap-area estimation between coplanar bounded regions.
//!
//! All computation happens in the shared plane's 2-D (u, v) frame.
//! The overlap region is produced by Sutherland–Hodgman clipping, which
//! requires the clip polygon to be convex; face boundaries in this
//! domain (test-specimen solids built from boxes, prisms and pads) are
//! convex, and the matcher always clips against the reference face.
//! Every predicate takes a tolerance — geometry positions are
//! floating-point results of upstream modeling, never compared exactly.

use feaprep_math::{Point2, Vec2};

/// Signed polygon area via the shoelace formula. Positive for
/// counter-clockwise winding.
pub fn polygon_area(poly: &[Point2]) -> f64 {
    if poly.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..poly.len() {
        let a = poly[i];
        let b = poly[(i + 1) % poly.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Return a copy of the polygon wound counter-clockwise.
pub fn oriented_ccw(poly: &[Point2]) -> Vec<Point2> {
    if polygon_area(poly) < 0.0 {
        poly.iter().rev().copied().collect()
    } else {
        poly.to_vec()
    }
}

fn cross(a: Vec2, b: Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Sutherland–Hodgman clip of `subject` against the convex,
/// counter-clockwise `clip` polygon, with `tol` of slack so boundaries
/// shared within tolerance survive as degenerate (zero-area) output.
pub fn clip_convex(subject: &[Point2], clip: &[Point2], tol: f64) -> Vec<Point2> {
    let mut output = subject.to_vec();
    for i in 0..clip.len() {
        let c0 = clip[i];
        let c1 = clip[(i + 1) % clip.len()];
        let edge = c1 - c0;
        let edge_len = edge.norm();
        if edge_len < tol {
            continue; // repeated clip vertex
        }
        let limit = -tol * edge_len;
        let input = std::mem::take(&mut output);
        if input.is_empty() {
            return output;
        }
        for j in 0..input.len() {
            let prev = input[(j + input.len() - 1) % input.len()];
            let cur = input[j];
            let side_prev = cross(edge, prev - c0);
            let side_cur = cross(edge, cur - c0);
            let prev_in = side_prev >= limit;
            let cur_in = side_cur >= limit;
            if cur_in {
                if !prev_in {
                    output.push(line_crossing(prev, cur, side_prev, side_cur));
                }
                output.push(cur);
            } else if prev_in {
                output.push(line_crossing(prev, cur, side_prev, side_cur));
            }
        }
    }
    output
}

/// Point where segment `p0→p1` crosses the clip line, given the signed
/// side values of its endpoints.
fn line_crossing(p0: Point2, p1: Point2, side0: f64, side1: f64) -> Point2 {
    let denom = side0 - side1;
    if denom.abs() < f64::EPSILON {
        return p1; // segment runs along the clip line
    }
    let t = side0 / denom;
    p0 + t * (p1 - p0)
}

/// Overlap region between two coplanar bounded polygons, expressed in
/// their shared frame. Windings are normalized internally; the first
/// polygon is the (convex) clip region. The result is convex and may be
/// degenerate (zero area) when the regions are merely tangent.
pub fn overlap_region(clip: &[Point2], subject: &[Point2], tol: f64) -> Vec<Point2> {
    let clip_ccw = oriented_ccw(clip);
    let subject_ccw = oriented_ccw(subject);
    clip_convex(&subject_ccw, &clip_ccw, tol)
}

/// True if `p` lies inside (or within `tol` of) the convex
/// counter-clockwise polygon.
pub fn convex_contains(poly: &[Point2], p: &Point2, tol: f64) -> bool {
    if poly.len() < 3 {
        return false;
    }
    for i in 0..poly.len() {
        let c0 = poly[i];
        let c1 = poly[(i + 1) % poly.len()];
        let edge = c1 - c0;
        let edge_len = edge.norm();
        if edge_len < tol {
            continue;
        }
        if cross(edge, p - c0) < -tol * edge_len {
            return false;
        }
    }
    true
}

/// Clip segment `p0→p1` to a convex counter-clockwise polygon (expanded
/// by `tol`), returning the retained sub-segment endpoints if any.
pub fn clip_segment_convex(
    p0: &Point2,
    p1: &Point2,
    poly: &[Point2],
    tol: f64,
) -> Option<(Point2, Point2)> {
    if poly.len() < 3 {
        return None;
    }
    let d = p1 - p0;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for i in 0..poly.len() {
        let c0 = poly[i];
        let c1 = poly[(i + 1) % poly.len()];
        let edge = c1 - c0;
        let edge_len = edge.norm();
        if edge_len < tol {
            continue;
        }
        let limit = -tol * edge_len;
        let a = cross(edge, p0 - c0);
        let b = cross(edge, p1 - c0);
        let slope = b - a;
        if slope.abs() < f64::EPSILON {
            // parallel to this clip edge: wholly in or wholly out
            if a < limit {
                return None;
            }
            continue;
        }
        let t = (limit - a) / slope;
        if slope < 0.0 {
            // leaving the half-plane
            t1 = t1.min(t);
        } else {
            // entering the half-plane
            t0 = t0.max(t);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((p0 + t0 * d, p0 + t1 * d))
}

/// Collinear overlap between two segments, if they lie on the same line
/// within `tol` and their extents overlap by more than `tol`.
/// Returns the shared sub-segment.
pub fn segment_line_overlap(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
    tol: f64,
) -> Option<(Point2, Point2)> {
    let da = a1 - a0;
    let len_a = da.norm();
    if len_a < tol {
        return None;
    }
    let u = da / len_a;
    let off_line = |p: &Point2| {
        let d = p - a0;
        (d.x * u.y - d.y * u.x).abs()
    };
    if off_line(b0) > tol || off_line(b1) > tol {
        return None;
    }
    let s0 = (b0 - a0).dot(&u);
    let s1 = (b1 - a0).dot(&u);
    let (blo, bhi) = if s0 <= s1 { (s0, s1) } else { (s1, s0) };
    let lo = blo.max(0.0);
    let hi = bhi.min(len_a);
    if hi - lo <= tol {
        return None;
    }
    Some((a0 + lo * u, a0 + hi * u))
}

/// Distance from a point to a bounded segment.
pub fn point_segment_distance(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 < f64::EPSILON {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (p - (a + t * ab)).norm()
}

/// True if the closed polygon's non-adjacent segments properly cross
/// each other (self-intersecting boundary loop).
pub fn self_intersects(poly: &[Point2]) -> bool {
    let n = poly.len();
    if n < 4 {
        return false;
    }
    for i in 0..n {
        for j in (i + 1)..n {
            // skip segments sharing a vertex
            if j == i + 1 || (i == 0 && j == n - 1) {
                continue;
            }
            let (a0, a1) = (poly[i], poly[(i + 1) % n]);
            let (b0, b1) = (poly[j], poly[(j + 1) % n]);
            let d1 = cross(b1 - b0, a0 - b0);
            let d2 = cross(b1 - b0, a1 - b0);
            let d3 = cross(a1 - a0, b0 - a0);
            let d4 = cross(a1 - a0, b1 - a0);
            if d1 * d2 < 0.0 && d3 * d4 < 0.0 {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point2> {
        vec![
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ]
    }

    #[test]
    fn test_polygon_area_signs() {
        let ccw = rect(0.0, 0.0, 10.0, 10.0);
        assert_relative_eq!(polygon_area(&ccw), 100.0, epsilon = 1e-12);
        let cw: Vec<Point2> = ccw.iter().rev().copied().collect();
        assert_relative_eq!(polygon_area(&cw), -100.0, epsilon = 1e-12);
    }

    #[test]
    fn test_oriented_ccw_flips_cw() {
        let cw: Vec<Point2> = rect(0.0, 0.0, 2.0, 2.0).iter().rev().copied().collect();
        let fixed = oriented_ccw(&cw);
        assert!(polygon_area(&fixed) > 0.0);
    }

    #[test]
    fn test_full_overlap() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let region = overlap_region(&a, &a, 1e-9);
        assert_relative_eq!(polygon_area(&region).abs(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_partial_overlap() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(5.0, 5.0, 15.0, 15.0);
        let region = overlap_region(&a, &b, 1e-9);
        assert_relative_eq!(polygon_area(&region).abs(), 25.0, epsilon = 1e-9);
    }

    #[test]
    fn test_disjoint_overlap_empty() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(20.0, 20.0, 30.0, 30.0);
        let region = overlap_region(&a, &b, 1e-9);
        assert!(polygon_area(&region).abs() < 1e-9);
    }

    #[test]
    fn test_tangent_overlap_degenerate() {
        // share only the x = 10 edge: region exists but has no area
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(10.0, 0.0, 20.0, 10.0);
        let region = overlap_region(&a, &b, 1e-6);
        assert!(polygon_area(&region).abs() < 1e-6);
    }

    #[test]
    fn test_convex_contains() {
        let poly = rect(0.0, 0.0, 10.0, 10.0);
        assert!(convex_contains(&poly, &Point2::new(5.0, 5.0), 1e-6));
        // boundary point counts as inside within tolerance
        assert!(convex_contains(&poly, &Point2::new(10.0, 5.0), 1e-6));
        assert!(!convex_contains(&poly, &Point2::new(10.1, 5.0), 1e-6));
    }

    #[test]
    fn test_clip_segment_inside() {
        let poly = rect(0.0, 0.0, 10.0, 10.0);
        let (q0, q1) = clip_segment_convex(
            &Point2::new(-5.0, 5.0),
            &Point2::new(15.0, 5.0),
            &poly,
            1e-6,
        )
        .unwrap();
        assert_relative_eq!(q0.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(q1.x, 10.0, epsilon = 1e-6);
    }

    #[test]
    fn test_clip_segment_along_boundary() {
        let poly = rect(0.0, 0.0, 10.0, 10.0);
        let (q0, q1) = clip_segment_convex(
            &Point2::new(0.0, 10.0),
            &Point2::new(10.0, 10.0),
            &poly,
            1e-6,
        )
        .unwrap();
        assert_relative_eq!((q1 - q0).norm(), 10.0, epsilon = 1e-6);
    }

    #[test]
    fn test_clip_segment_outside() {
        let poly = rect(0.0, 0.0, 10.0, 10.0);
        assert!(clip_segment_convex(
            &Point2::new(-5.0, 20.0),
            &Point2::new(15.0, 20.0),
            &poly,
            1e-6
        )
        .is_none());
    }

    #[test]
    fn test_segment_line_overlap() {
        let got = segment_line_overlap(
            &Point2::new(0.0, 0.0),
            &Point2::new(10.0, 0.0),
            &Point2::new(4.0, 0.0),
            &Point2::new(20.0, 0.0),
            1e-6,
        )
        .unwrap();
        assert_relative_eq!(got.0.x, 4.0, epsilon = 1e-9);
        assert_relative_eq!(got.1.x, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_segment_line_overlap_rejects_offset_and_point_touch() {
        // parallel but 1 apart
        assert!(segment_line_overlap(
            &Point2::new(0.0, 0.0),
            &Point2::new(10.0, 0.0),
            &Point2::new(0.0, 1.0),
            &Point2::new(10.0, 1.0),
            1e-3,
        )
        .is_none());
        // touching only at one point
        assert!(segment_line_overlap(
            &Point2::new(0.0, 0.0),
            &Point2::new(10.0, 0.0),
            &Point2::new(10.0, 0.0),
            &Point2::new(20.0, 0.0),
            1e-3,
        )
        .is_none());
    }

    #[test]
    fn test_point_segment_distance() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);
        assert_relative_eq!(
            point_segment_distance(&Point2::new(5.0, 3.0), &a, &b),
            3.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            point_segment_distance(&Point2::new(-4.0, 0.0), &a, &b),
            4.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_self_intersects() {
        let bowtie = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 10.0),
        ];
        assert!(self_intersects(&bowtie));
        assert!(!self_intersects(&rect(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_sliver_overlap_area() {
        // 10 × 1e-3 sliver: tiny but genuine area
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(0.0, 9.999, 10.0, 20.0);
        let region = overlap_region(&a, &b, 1e-9);
        assert_relative_eq!(polygon_area(&region).abs(), 0.01, epsilon = 1e-6);
    }
}
