#![warn(missing_docs)]

//! Contact interface detection between assembly bodies.
//!
//! Given an assembly of solid bodies, finds every pair of touching
//! surfaces across distinct bodies, classifies each pair as a face
//! (area) contact or an edge (line) contact, computes the contacted
//! area, and assigns stable, keyword-aware labels — the inputs an FEA
//! pre-processor needs to mark tied (bonded) constraints.
//!
//! Pipeline: [`SpatialFaceIndex`] groups geometrically-plausible
//! candidates → the matcher ([`match_face_pair`], [`match_edge_face`])
//! evaluates each candidate with tolerance semantics → the area
//! estimator scores face matches → [`classify`] deduplicates, orders
//! and names the results. Every decision is traced in the returned
//! [`DiagnosticLog`].
//!
//! Detection is a synchronous one-shot batch operation: it reads the
//! assembly, never mutates it, and returns an explicit `(pairs, log)`
//! value with no shared state, so it may be called from concurrent
//! tests freely.

pub mod area;
mod classify;
mod diag;
mod index;
mod matcher;
mod selftest;

pub use classify::{classify, ContactKind, ContactPair, EntityRef, MatchGeometry, RawMatch};
pub use diag::DiagnosticLog;
pub use index::SpatialFaceIndex;
pub use matcher::{face_degeneracy, match_edge_face, match_face_pair, FaceMatch, Rejection};
pub use selftest::run_self_test;

pub use feaprep_math::Tolerance;

use feaprep_model::{Assembly, BodyIndex, EdgeGeometry, FaceGeometry};

/// Options for one detection run.
#[derive(Debug, Clone, Default)]
pub struct DetectionOptions {
    /// Numeric tolerances for every comparison in the pipeline.
    pub tolerance: Tolerance,
    /// Optional keyword for label-prefix substitution. Empty or absent
    /// disables substitution.
    pub keyword: Option<String>,
}

/// Result of one detection run: the reported pairs and the full
/// decision trace.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Contact pairs, deduplicated and deterministically ordered.
    pub pairs: Vec<ContactPair>,
    /// Trace of every candidate considered, rejected or suppressed.
    pub log: DiagnosticLog,
}

/// Detect every contact interface between distinct bodies of the
/// assembly.
///
/// Never fails: degenerate geometry is skipped with a log entry, and an
/// empty assembly (or one with no touching bodies) yields an empty pair
/// list plus a log explaining why.
pub fn detect_contacts(assembly: &Assembly, options: &DetectionOptions) -> Detection {
    let tol = &options.tolerance;
    let mut log = DiagnosticLog::new();
    log.push(format!(
        "contact detection over {} bodies (linear {} mm, angular {} rad, min area {} mm²)",
        assembly.len(),
        tol.linear,
        tol.angular,
        tol.min_area
    ));

    let usable = scan_geometry(assembly, &mut log);
    let index = SpatialFaceIndex::build(assembly, &usable, tol);
    log.push(format!(
        "indexed {} planar faces into {} buckets",
        index.face_count(),
        index.bucket_count()
    ));

    let mut matches: Vec<RawMatch> = Vec::new();
    let body_count = assembly.len() as u32;
    for i in 0..body_count {
        for j in (i + 1)..body_count {
            let body_a = BodyIndex(i);
            let body_b = BodyIndex(j);
            collect_face_matches(assembly, &index, body_a, body_b, tol, &mut matches, &mut log);
            collect_edge_matches(assembly, &usable, body_a, body_b, tol, &mut matches, &mut log);
        }
    }

    let pairs = classify(
        assembly,
        matches,
        options.keyword.as_deref(),
        tol,
        &mut log,
    );
    log.push(format!("{} contact pair(s) reported", pairs.len()));
    Detection { pairs, log }
}

/// Flag usable planar faces, logging everything that is skipped and
/// why. Unsupported kinds (curved faces, curved edges) are counted in
/// one summary line; degenerate faces get individual entries.
fn scan_geometry(assembly: &Assembly, log: &mut DiagnosticLog) -> Vec<Vec<bool>> {
    let mut usable = Vec::with_capacity(assembly.len());
    let mut curved_faces = 0usize;
    let mut curved_edges = 0usize;
    for (body_index, body) in assembly.bodies() {
        let mut flags = vec![false; body.faces.len()];
        for (face_index, face) in body.faces() {
            match &face.geometry {
                FaceGeometry::Curved => curved_faces += 1,
                FaceGeometry::Planar { .. } => {
                    if let Some(reason) = face_degeneracy(face) {
                        log.push(format!(
                            "skipped body {} face {}: {}",
                            body_index.0, face_index.0, reason
                        ));
                    } else {
                        flags[face_index.0 as usize] = true;
                    }
                }
            }
        }
        curved_edges += body
            .edges
            .iter()
            .filter(|e| matches!(e.geometry, EdgeGeometry::Curve))
            .count();
        usable.push(flags);
    }
    if curved_faces > 0 || curved_edges > 0 {
        log.push(format!(
            "skipped {curved_faces} non-planar face(s) and {curved_edges} curved edge(s) (unsupported kinds)"
        ));
    }
    usable
}

fn collect_face_matches(
    assembly: &Assembly,
    index: &SpatialFaceIndex,
    body_a: BodyIndex,
    body_b: BodyIndex,
    tol: &Tolerance,
    matches: &mut Vec<RawMatch>,
    log: &mut DiagnosticLog,
) {
    let a = assembly.body(body_a);
    let b = assembly.body(body_b);
    for (fa, fb) in index.candidates(body_a, body_b) {
        let face_a = a.face(fa);
        let face_b = b.face(fb);
        let label = format!(
            "candidate body {} face {} ~ body {} face {}",
            body_a.0, fa.0, body_b.0, fb.0
        );
        match matcher::match_face_pair(face_a, face_b, tol) {
            Ok(FaceMatch::Area { region, area }) => {
                log.push(format!("{label}: face contact, area {area:.3}"));
                let Some((plane, _)) = face_a.as_planar() else {
                    continue; // matched faces are always planar
                };
                matches.push(RawMatch {
                    body_a,
                    entity_a: EntityRef::Face(fa),
                    body_b,
                    entity_b: EntityRef::Face(fb),
                    geometry: MatchGeometry::Area {
                        frame: plane.clone(),
                        region,
                        area,
                    },
                });
            }
            Ok(FaceMatch::Line { start, end }) => {
                log.push(format!(
                    "{label}: edge contact along {:.3} mm",
                    (end - start).norm()
                ));
                matches.push(RawMatch {
                    body_a,
                    entity_a: EntityRef::Face(fa),
                    body_b,
                    entity_b: EntityRef::Face(fb),
                    geometry: MatchGeometry::Line { start, end },
                });
            }
            Err(reason) => log.push(format!("{label}: rejected, {reason}")),
        }
    }
}

/// Evaluate line edges of either body against usable planar faces of
/// the other. Candidacy is a cheap both-endpoints-near-plane test; only
/// candidates that pass it are evaluated and traced.
fn collect_edge_matches(
    assembly: &Assembly,
    usable: &[Vec<bool>],
    body_a: BodyIndex,
    body_b: BodyIndex,
    tol: &Tolerance,
    matches: &mut Vec<RawMatch>,
    log: &mut DiagnosticLog,
) {
    // (face owner, edge owner): edges of b against faces of a, then
    // edges of a against faces of b
    for &(face_body, edge_body) in &[(body_a, body_b), (body_b, body_a)] {
        let face_owner = assembly.body(face_body);
        let edge_owner = assembly.body(edge_body);
        for (fi, face) in face_owner.faces() {
            if !usable[face_body.0 as usize][fi.0 as usize] {
                continue;
            }
            let Some((plane, _)) = face.as_planar() else {
                continue;
            };
            for (ei, edge) in edge_owner.edges() {
                let Some((start, end)) = edge.as_line() else {
                    continue;
                };
                // candidacy prefilter: both endpoints near the plane
                if plane.signed_distance(&start).abs() > tol.linear
                    || plane.signed_distance(&end).abs() > tol.linear
                {
                    continue;
                }
                let label = format!(
                    "candidate body {} edge {} ~ body {} face {}",
                    edge_body.0, ei.0, face_body.0, fi.0
                );
                match matcher::match_edge_face(edge, edge_owner, face, tol) {
                    Ok((start, end)) => {
                        log.push(format!(
                            "{label}: edge contact along {:.3} mm",
                            (end - start).norm()
                        ));
                        // normalize sides: lower body index is side A
                        let (ea, eb) = if face_body < edge_body {
                            (EntityRef::Face(fi), EntityRef::Edge(ei))
                        } else {
                            (EntityRef::Edge(ei), EntityRef::Face(fi))
                        };
                        matches.push(RawMatch {
                            body_a: face_body.min(edge_body),
                            entity_a: ea,
                            body_b: face_body.max(edge_body),
                            entity_b: eb,
                            geometry: MatchGeometry::Line { start, end },
                        });
                    }
                    Err(reason) => log.push(format!("{label}: rejected, {reason}")),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feaprep_math::{Point3, Vec3};
    use feaprep_model::{make_box, Body};

    fn cube_at(name: &str, x: f64, y: f64, z: f64) -> Body {
        make_box(name, Point3::new(x, y, z), Vec3::new(10.0, 10.0, 10.0))
    }

    fn assembly_of(bodies: Vec<Body>) -> Assembly {
        let mut assembly = Assembly::new();
        for body in bodies {
            assembly.push_body(body);
        }
        assembly
    }

    #[test]
    fn test_face_to_face_cubes() {
        let assembly = assembly_of(vec![
            cube_at("lower", 0.0, 0.0, 0.0),
            cube_at("upper", 0.0, 0.0, 10.0),
        ]);
        let got = detect_contacts(&assembly, &DetectionOptions::default());
        assert_eq!(got.pairs.len(), 1);
        let pair = &got.pairs[0];
        assert_eq!(pair.kind, ContactKind::Face);
        assert!((pair.area - 100.0).abs() < 1e-6);
        assert_eq!(pair.body_a, BodyIndex(0));
        assert_eq!(pair.body_b, BodyIndex(1));
    }

    #[test]
    fn test_edge_touch_cubes() {
        let assembly = assembly_of(vec![
            cube_at("lower", 0.0, 0.0, 0.0),
            cube_at("upper", 10.0, 0.0, 10.0),
        ]);
        let got = detect_contacts(&assembly, &DetectionOptions::default());
        assert_eq!(got.pairs.len(), 1);
        let pair = &got.pairs[0];
        assert_eq!(pair.kind, ContactKind::Edge);
        assert!(pair.area.abs() < 1e-12);
    }

    #[test]
    fn test_separated_cubes_no_contact_with_explanation() {
        let assembly = assembly_of(vec![
            cube_at("lower", 0.0, 0.0, 0.0),
            cube_at("upper", 0.0, 0.0, 10.1),
        ]);
        let got = detect_contacts(&assembly, &DetectionOptions::default());
        assert!(got.pairs.is_empty());
        // the near-miss is traceable in the log
        assert!(got
            .log
            .entries()
            .iter()
            .any(|e| e.contains("rejected") && e.contains("apart")));
    }

    #[test]
    fn test_no_self_pairs() {
        let assembly = assembly_of(vec![
            cube_at("a", 0.0, 0.0, 0.0),
            cube_at("b", 0.0, 0.0, 10.0),
            cube_at("c", 0.0, 0.0, 20.0),
        ]);
        let got = detect_contacts(&assembly, &DetectionOptions::default());
        assert_eq!(got.pairs.len(), 2);
        for pair in &got.pairs {
            assert_ne!(pair.body_a, pair.body_b);
            assert!(pair.body_a < pair.body_b);
        }
    }

    #[test]
    fn test_idempotent_runs() {
        let assembly = assembly_of(vec![
            cube_at("lower", 0.0, 0.0, 0.0),
            cube_at("upper", 5.0, 0.0, 10.0),
        ]);
        let options = DetectionOptions::default();
        let first = detect_contacts(&assembly, &options);
        let second = detect_contacts(&assembly, &options);
        assert_eq!(first.pairs.len(), second.pairs.len());
        for (x, y) in first.pairs.iter().zip(second.pairs.iter()) {
            assert_eq!(x.kind, y.kind);
            assert_eq!((x.body_a, x.body_b), (y.body_a, y.body_b));
            assert_eq!((x.entity_a, x.entity_b), (y.entity_a, y.entity_b));
            assert_eq!((&x.name_a, &x.name_b), (&y.name_a, &y.name_b));
            assert!((x.area - y.area).abs() < 1e-12);
        }
    }

    #[test]
    fn test_symmetry_under_body_order_swap() {
        let forward = assembly_of(vec![
            cube_at("lower", 0.0, 0.0, 0.0),
            cube_at("upper", 5.0, 0.0, 10.0),
        ]);
        let swapped = assembly_of(vec![
            cube_at("upper", 5.0, 0.0, 10.0),
            cube_at("lower", 0.0, 0.0, 0.0),
        ]);
        let options = DetectionOptions::default();
        let a = detect_contacts(&forward, &options);
        let b = detect_contacts(&swapped, &options);
        assert_eq!(a.pairs.len(), b.pairs.len());
        for (x, y) in a.pairs.iter().zip(b.pairs.iter()) {
            assert_eq!(x.kind, y.kind);
            assert!((x.area - y.area).abs() < 1e-9);
            // sides swap with the body order; the geometry does not
            let x_names = (x.name_a.as_str(), x.name_b.as_str());
            let y_names = (y.name_b.as_str(), y.name_a.as_str());
            assert_eq!(
                x_names.0.split('_').next(),
                y_names.0.split('_').next()
            );
            assert_eq!(
                x_names.1.split('_').next(),
                y_names.1.split('_').next()
            );
        }
    }

    #[test]
    fn test_tolerance_boundary_detection() {
        let tol = Tolerance::DEFAULT;
        let near = assembly_of(vec![
            cube_at("a", 0.0, 0.0, 0.0),
            cube_at("b", 0.0, 0.0, 10.0 + tol.linear - 1e-3),
        ]);
        let far = assembly_of(vec![
            cube_at("a", 0.0, 0.0, 0.0),
            cube_at("b", 0.0, 0.0, 10.0 + tol.linear + 1e-3),
        ]);
        let options = DetectionOptions::default();
        assert_eq!(detect_contacts(&near, &options).pairs.len(), 1);
        assert!(detect_contacts(&far, &options).pairs.is_empty());
    }

    #[test]
    fn test_keyword_prefixes_all_labels() {
        let assembly = assembly_of(vec![
            cube_at("Jig Base", 0.0, 0.0, 0.0),
            cube_at("Jig Top", 0.0, 0.0, 10.0),
        ]);
        let got = detect_contacts(
            &assembly,
            &DetectionOptions {
                keyword: Some("jig".into()),
                ..Default::default()
            },
        );
        assert!(!got.pairs.is_empty());
        for pair in &got.pairs {
            assert!(pair.name_a.starts_with("jig_"), "{}", pair.name_a);
            assert!(pair.name_b.starts_with("jig_"), "{}", pair.name_b);
        }
    }

    #[test]
    fn test_empty_assembly_reports_cleanly() {
        let got = detect_contacts(&Assembly::new(), &DetectionOptions::default());
        assert!(got.pairs.is_empty());
        assert!(!got.log.is_empty());
    }

    #[test]
    fn test_degenerate_face_skipped_not_fatal() {
        use feaprep_model::{Face, Plane, Point2};
        let mut lower = cube_at("lower", 0.0, 0.0, 0.0);
        // corrupt an uninvolved face: zero-length normal
        lower.faces[2] = Face::planar(
            Plane::new(Point3::origin(), Vec3::zeros(), Vec3::x()),
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
            ],
        );
        let assembly = assembly_of(vec![lower, cube_at("upper", 0.0, 0.0, 10.0)]);
        let got = detect_contacts(&assembly, &DetectionOptions::default());
        // the run completes and still reports the real contact
        assert_eq!(got.pairs.len(), 1);
        assert!(got.log.entries().iter().any(|e| e.contains("skipped")));
    }

    #[test]
    fn test_contact_pair_serializes() {
        let assembly = assembly_of(vec![
            cube_at("lower", 0.0, 0.0, 0.0),
            cube_at("upper", 0.0, 0.0, 10.0),
        ]);
        let got = detect_contacts(&assembly, &DetectionOptions::default());
        let json = serde_json::to_string(&got.pairs).unwrap();
        assert!(json.contains("\"kind\""));
        assert!(json.contains("\"area\""));
    }
}
