//! Built-in acceptance battery for the detection pipeline.
//!
//! Runs the full pipeline against synthetic two-body configurations
//! with geometrically known outcomes and reports expected-vs-actual per
//! fixture. This is the acceptance gate for any change to tolerance
//! constants or matching logic: an unmodified implementation reads
//! all-PASS. Failures are reported, never thrown — the harness always
//! completes the whole battery, and it touches no host document.

use feaprep_math::{Point3, Vec3};
use feaprep_model::{Assembly, Face, Plane, Point2};

use crate::{detect_contacts, ContactKind, DetectionOptions};

struct Fixture {
    name: &'static str,
    assembly: Assembly,
    expect_face: usize,
    expect_edge: usize,
    /// Expected face-contact area, checked within tolerance.
    expect_area: Option<f64>,
}

fn cube_at(name: &str, x: f64, y: f64, z: f64) -> feaprep_model::Body {
    feaprep_model::make_box(name, Point3::new(x, y, z), Vec3::new(10.0, 10.0, 10.0))
}

fn fixtures() -> Vec<Fixture> {
    let mut battery = Vec::new();

    // 1. two 10 mm cubes face-to-face with no gap: one face contact of
    //    exactly 100 mm², and the touching rim produces no extra edge
    //    contacts
    {
        let mut assembly = Assembly::new();
        assembly.push_body(cube_at("lower", 0.0, 0.0, 0.0));
        assembly.push_body(cube_at("upper", 0.0, 0.0, 10.0));
        battery.push(Fixture {
            name: "full face contact",
            assembly,
            expect_face: 1,
            expect_edge: 0,
            expect_area: Some(100.0),
        });
    }

    // 2. cubes offset by a full width: the bodies touch along exactly
    //    one 10 mm line
    {
        let mut assembly = Assembly::new();
        assembly.push_body(cube_at("lower", 0.0, 0.0, 0.0));
        assembly.push_body(cube_at("upper", 10.0, 0.0, 10.0));
        battery.push(Fixture {
            name: "single edge contact",
            assembly,
            expect_face: 0,
            expect_edge: 1,
            expect_area: None,
        });
    }

    // 3. cubes separated by 0.1 mm at the default 0.05 mm tolerance:
    //    nothing touches
    {
        let mut assembly = Assembly::new();
        assembly.push_body(cube_at("lower", 0.0, 0.0, 0.0));
        assembly.push_body(cube_at("upper", 0.0, 0.0, 10.1));
        battery.push(Fixture {
            name: "separated beyond tolerance",
            assembly,
            expect_face: 0,
            expect_edge: 0,
            expect_area: None,
        });
    }

    // 4. coincident faces whose normals point the same direction:
    //    validates the orientation gate — contacting faces must face
    //    each other
    {
        let mut assembly = Assembly::new();
        assembly.push_body(cube_at("lower", 0.0, 0.0, 0.0));
        let mut upper = cube_at("upper", 0.0, 0.0, 10.0);
        // flip the bottom face normal from -Z to +Z
        upper.faces[0] = Face::planar(
            Plane::new(Point3::new(0.0, 0.0, 10.0), Vec3::x(), Vec3::y()),
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
                Point2::new(0.0, 10.0),
            ],
        );
        assembly.push_body(upper);
        battery.push(Fixture {
            name: "same-facing normals",
            assembly,
            expect_face: 0,
            expect_edge: 0,
            expect_area: None,
        });
    }

    battery
}

/// Run the fixed self-test battery and return one report line per
/// fixture plus a summary line. No side effects on any document.
pub fn run_self_test() -> Vec<String> {
    let options = DetectionOptions::default();
    let area_tol = 1e-6;
    let mut report = Vec::new();
    let mut failures = 0usize;

    let battery = fixtures();
    let total = battery.len();
    for fixture in battery {
        let detection = detect_contacts(&fixture.assembly, &options);
        let faces = detection
            .pairs
            .iter()
            .filter(|p| p.kind == ContactKind::Face)
            .count();
        let edges = detection
            .pairs
            .iter()
            .filter(|p| p.kind == ContactKind::Edge)
            .count();
        let got_area = detection
            .pairs
            .iter()
            .find(|p| p.kind == ContactKind::Face)
            .map(|p| p.area);

        let mut ok = faces == fixture.expect_face && edges == fixture.expect_edge;
        if let Some(expected) = fixture.expect_area {
            ok &= got_area.is_some_and(|a| (a - expected).abs() <= area_tol);
        }

        let expected_area = fixture
            .expect_area
            .map_or(String::new(), |a| format!(", area {a:.3}"));
        let actual_area = got_area.map_or(String::new(), |a| format!(", area {a:.3}"));
        let verdict = if ok {
            "PASS"
        } else {
            failures += 1;
            "FAIL"
        };
        report.push(format!(
            "{verdict} {}: expected {} face / {} edge{expected_area}; got {faces} face / {edges} edge{actual_area}",
            fixture.name, fixture.expect_face, fixture.expect_edge
        ));
    }

    if failures == 0 {
        report.push(format!("self-test: {total}/{total} fixtures passed"));
    } else {
        report.push(format!(
            "self-test: {}/{total} fixtures passed, {failures} failure(s)",
            total - failures
        ));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_test_all_pass() {
        let report = run_self_test();
        // four fixtures + summary
        assert_eq!(report.len(), 5);
        for line in &report[..4] {
            assert!(line.starts_with("PASS"), "unexpected report line: {line}");
        }
        assert!(report[4].contains("4/4"));
    }

    #[test]
    fn test_report_carries_expected_vs_actual() {
        let report = run_self_test();
        assert!(report[0].contains("expected 1 face / 0 edge, area 100.000"));
        assert!(report[0].contains("got 1 face / 0 edge, area 100.000"));
    }
}
