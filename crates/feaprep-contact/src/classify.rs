//! Contact classification, deduplication, ordering and naming.
//!
//! Turns the matcher's raw results into the reported [`ContactPair`]
//! list: one report per geometric interface, sides normalized so the
//! lower body index is always side A, pairs in a reproducible order,
//! and each contact side given a stable, collision-free label suitable
//! for a named selection.

use std::collections::HashMap;

use serde::Serialize;

use feaprep_math::{Point3, Tolerance};
use feaprep_model::{Assembly, Body, BodyIndex, EdgeIndex, FaceIndex, Plane, Point2};

use crate::area::convex_contains;
use crate::diag::DiagnosticLog;

/// Kind of a reported contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ContactKind {
    /// The touching region has area.
    Face,
    /// The touching region is effectively one-dimensional.
    Edge,
}

/// A contact side's geometric entity within its owning body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EntityRef {
    /// A face handle.
    Face(FaceIndex),
    /// An edge handle.
    Edge(EdgeIndex),
}

/// A detected contact between two bodies. Immutable once created;
/// holds only index handles into the caller-owned assembly.
///
/// Invariant: `body_a < body_b` — a body is never in contact with
/// itself, and side order is normalized for reproducibility.
#[derive(Debug, Clone, Serialize)]
pub struct ContactPair {
    /// Face (area) or edge (line) contact.
    pub kind: ContactKind,
    /// Lower-index body.
    pub body_a: BodyIndex,
    /// Higher-index body.
    pub body_b: BodyIndex,
    /// Contacting entity on side A.
    pub entity_a: EntityRef,
    /// Contacting entity on side B.
    pub entity_b: EntityRef,
    /// Generated label for side A.
    pub name_a: String,
    /// Generated label for side B.
    pub name_b: String,
    /// Contacted area in mm²; zero for edge contacts.
    pub area: f64,
}

/// Raw geometry of a match, before deduplication.
#[derive(Debug, Clone)]
pub enum MatchGeometry {
    /// Area overlap: region polygon in `frame`'s (u, v) space.
    Area {
        /// The plane frame the region is expressed in.
        frame: Plane,
        /// Convex overlap polygon, counter-clockwise.
        region: Vec<Point2>,
        /// Overlap area.
        area: f64,
    },
    /// 1-D touch segment in 3D.
    Line {
        /// Segment start.
        start: Point3,
        /// Segment end.
        end: Point3,
    },
}

/// One raw match from the detection loop. Sides already normalized:
/// `body_a < body_b`.
#[derive(Debug, Clone)]
pub struct RawMatch {
    /// Lower-index body.
    pub body_a: BodyIndex,
    /// Entity on side A.
    pub entity_a: EntityRef,
    /// Higher-index body.
    pub body_b: BodyIndex,
    /// Entity on side B.
    pub entity_b: EntityRef,
    /// Match geometry.
    pub geometry: MatchGeometry,
}

/// Deduplicate, order and name raw matches into the reported pair list.
pub fn classify(
    assembly: &Assembly,
    matches: Vec<RawMatch>,
    keyword: Option<&str>,
    tol: &Tolerance,
    log: &mut DiagnosticLog,
) -> Vec<ContactPair> {
    let (mut areas, mut lines): (Vec<RawMatch>, Vec<RawMatch>) = matches
        .into_iter()
        .partition(|m| matches!(m.geometry, MatchGeometry::Area { .. }));

    let sort_key = |m: &RawMatch| (m.body_a, m.body_b, m.entity_a, m.entity_b);
    areas.sort_by_key(sort_key);
    // longest segments first so a locus is kept once and its fragments
    // and duplicates collapse onto it
    lines.sort_by(|x, y| {
        line_length(y)
            .total_cmp(&line_length(x))
            .then_with(|| sort_key(x).cmp(&sort_key(y)))
    });

    let mut kept_lines: Vec<RawMatch> = Vec::new();
    for line in lines {
        let (start, end) = match &line.geometry {
            MatchGeometry::Line { start, end } => (*start, *end),
            MatchGeometry::Area { .. } => continue,
        };
        if let Some(covering) = covering_area(&areas, &line, &start, &end, tol) {
            log.push(format!(
                "suppressed edge contact {} (inside face contact {})",
                describe_sides(assembly, &line),
                describe_sides(assembly, covering),
            ));
            continue;
        }
        if let Some(covering) = covering_line(&kept_lines, &line, &start, &end, tol) {
            log.push(format!(
                "suppressed edge contact {} (duplicate of {})",
                describe_sides(assembly, &line),
                describe_sides(assembly, covering),
            ));
            continue;
        }
        kept_lines.push(line);
    }

    let mut all = areas;
    all.append(&mut kept_lines);
    all.sort_by_key(|m| {
        (
            m.body_a,
            m.body_b,
            match m.geometry {
                MatchGeometry::Area { .. } => ContactKind::Face,
                MatchGeometry::Line { .. } => ContactKind::Edge,
            },
            m.entity_a,
            m.entity_b,
        )
    });

    let mut namer = Namer::new(keyword);
    all.into_iter()
        .map(|m| {
            let (kind, area) = match &m.geometry {
                MatchGeometry::Area { area, .. } => (ContactKind::Face, *area),
                MatchGeometry::Line { .. } => (ContactKind::Edge, 0.0),
            };
            let name_a = namer.side_label(m.body_a, assembly.body(m.body_a));
            let name_b = namer.side_label(m.body_b, assembly.body(m.body_b));
            ContactPair {
                kind,
                body_a: m.body_a,
                body_b: m.body_b,
                entity_a: m.entity_a,
                entity_b: m.entity_b,
                name_a,
                name_b,
                area,
            }
        })
        .collect()
}

fn line_length(m: &RawMatch) -> f64 {
    match &m.geometry {
        MatchGeometry::Line { start, end } => (end - start).norm(),
        MatchGeometry::Area { .. } => 0.0,
    }
}

/// The face contact of the same body pair whose overlap region contains
/// the whole segment, if any.
fn covering_area<'a>(
    areas: &'a [RawMatch],
    line: &RawMatch,
    start: &Point3,
    end: &Point3,
    tol: &Tolerance,
) -> Option<&'a RawMatch> {
    let mid = Point3::from((start.coords + end.coords) / 2.0);
    areas.iter().find(|a| {
        if (a.body_a, a.body_b) != (line.body_a, line.body_b) {
            return false;
        }
        let MatchGeometry::Area { frame, region, .. } = &a.geometry else {
            return false;
        };
        [start, end, &mid].iter().all(|p| {
            frame.signed_distance(p).abs() <= tol.linear
                && convex_contains(region, &frame.project(p), tol.linear)
        })
    })
}

/// The already-kept edge contact of the same body pair whose segment
/// contains this one, if any.
fn covering_line<'a>(
    kept: &'a [RawMatch],
    line: &RawMatch,
    start: &Point3,
    end: &Point3,
    tol: &Tolerance,
) -> Option<&'a RawMatch> {
    kept.iter().find(|k| {
        if (k.body_a, k.body_b) != (line.body_a, line.body_b) {
            return false;
        }
        let MatchGeometry::Line {
            start: ks,
            end: ke,
        } = &k.geometry
        else {
            return false;
        };
        point_on_segment(start, ks, ke, tol.linear) && point_on_segment(end, ks, ke, tol.linear)
    })
}

fn point_on_segment(p: &Point3, a: &Point3, b: &Point3, tol: f64) -> bool {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 < f64::EPSILON {
        return (p - a).norm() <= tol;
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (p - (a + t * ab)).norm() <= tol
}

fn describe_sides(assembly: &Assembly, m: &RawMatch) -> String {
    let side = |body: BodyIndex, entity: EntityRef| {
        let name = assembly
            .body(body)
            .name
            .clone()
            .unwrap_or_else(|| format!("body{}", body.0));
        match entity {
            EntityRef::Face(f) => format!("{name}/face{}", f.0),
            EntityRef::Edge(e) => format!("{name}/edge{}", e.0),
        }
    };
    format!(
        "{} ~ {}",
        side(m.body_a, m.entity_a),
        side(m.body_b, m.entity_b)
    )
}

/// Stable, collision-free label generation for contact sides.
///
/// Labels have the form `<prefix><sequence>`. The prefix derives from
/// the owning body's display name; a non-empty detection keyword that
/// case-insensitively matches a substring of the body name overrides
/// the prefix with `<keyword>_`, letting a user force one naming scheme
/// across a sub-assembly. A per-prefix counter keeps labels unique.
struct Namer<'a> {
    keyword: Option<&'a str>,
    counters: HashMap<String, u32>,
}

impl<'a> Namer<'a> {
    fn new(keyword: Option<&'a str>) -> Self {
        Self {
            keyword: keyword.filter(|k| !k.is_empty()),
            counters: HashMap::new(),
        }
    }

    fn side_label(&mut self, index: BodyIndex, body: &Body) -> String {
        let prefix = self.prefix_for(index, body);
        let counter = self.counters.entry(prefix.clone()).or_insert(0);
        *counter += 1;
        format!("{prefix}{counter}")
    }

    fn prefix_for(&self, index: BodyIndex, body: &Body) -> String {
        if let (Some(keyword), Some(name)) = (self.keyword, body.name.as_deref()) {
            if name.to_lowercase().contains(&keyword.to_lowercase()) {
                return format!("{keyword}_");
            }
        }
        match body.name.as_deref().filter(|n| !n.is_empty()) {
            Some(name) => {
                let sanitized: String = name
                    .chars()
                    .map(|c| if c.is_alphanumeric() { c } else { '_' })
                    .collect();
                format!("{sanitized}_")
            }
            None => format!("body{}_", index.0),
        }
    }
}
