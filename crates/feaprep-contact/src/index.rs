//! Spatial face index: quantized broadphase over planar faces.
//!
//! Comparing every face of every body against every face of every other
//! body is O(n²) polygon work. Contacting faces must lie on (nearly)
//! the same plane with normals pointing toward each other, so faces are
//! bucketed by a quantized key of (unit normal, signed plane offset from
//! the origin). Candidate lookup probes the face's own bucket
//! neighborhood and the antiparallel `(-n, -d)` neighborhood; bucket
//! widths are at least twice the matching tolerances and the probe
//! covers ±1 in every key component, so a true contact can never be
//! lost to bucket-boundary rounding. False positives are expected and
//! cheap — the matcher rejects them.

use std::collections::{BTreeSet, HashMap};

use feaprep_math::{Tolerance, Vec3};
use feaprep_model::{Assembly, BodyIndex, FaceIndex};

/// Quantized (normal, offset) bucket key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct BucketKey {
    n: [i64; 3],
    d: i64,
}

/// An indexed planar face: handle plus the exact values its key was
/// quantized from.
#[derive(Debug, Clone, Copy)]
struct IndexedFace {
    face: FaceIndex,
    normal: Vec3,
    offset: f64,
}

/// Broadphase index over the planar faces of every body in an assembly.
#[derive(Debug)]
pub struct SpatialFaceIndex {
    step_normal: f64,
    step_offset: f64,
    /// Per body: bucket map and the flat list of indexed faces.
    buckets: Vec<HashMap<BucketKey, Vec<FaceIndex>>>,
    faces: Vec<Vec<IndexedFace>>,
}

impl SpatialFaceIndex {
    /// Index every usable planar face of the assembly.
    ///
    /// `usable` carries one flag per face per body (in handle order);
    /// degenerate and non-planar faces are left out entirely.
    pub fn build(assembly: &Assembly, usable: &[Vec<bool>], tol: &Tolerance) -> Self {
        // bucket width >= 2x the matching tolerance in each dimension
        let step_normal = (2.0 * tol.angular).max(1e-3);
        let step_offset = (2.0 * tol.linear).max(1e-9);

        let mut buckets = Vec::with_capacity(assembly.len());
        let mut faces = Vec::with_capacity(assembly.len());
        for (body_index, body) in assembly.bodies() {
            let mut map: HashMap<BucketKey, Vec<FaceIndex>> = HashMap::new();
            let mut list = Vec::new();
            for (face_index, face) in body.faces() {
                if !usable[body_index.0 as usize][face_index.0 as usize] {
                    continue;
                }
                let Some((plane, _)) = face.as_planar() else {
                    continue;
                };
                let normal = *plane.normal.as_ref();
                let offset = plane.offset();
                let entry = IndexedFace {
                    face: face_index,
                    normal,
                    offset,
                };
                map.entry(quantize(&normal, offset, step_normal, step_offset))
                    .or_default()
                    .push(face_index);
                list.push(entry);
            }
            buckets.push(map);
            faces.push(list);
        }
        Self {
            step_normal,
            step_offset,
            buckets,
            faces,
        }
    }

    /// Number of indexed planar faces across all bodies.
    pub fn face_count(&self) -> usize {
        self.faces.iter().map(Vec::len).sum()
    }

    /// Number of occupied buckets across all bodies.
    pub fn bucket_count(&self) -> usize {
        self.buckets.iter().map(HashMap::len).sum()
    }

    /// Candidate face pairs between two distinct bodies, sorted by
    /// (face of `a`, face of `b`) for reproducible downstream order.
    ///
    /// For each face of `a`, probes both the same-orientation bucket
    /// neighborhood (coincident, same-facing planes — the matcher's
    /// orientation gate rejects these with a trace entry) and the
    /// antiparallel neighborhood (planes facing each other, the true
    /// contact configuration).
    pub fn candidates(&self, a: BodyIndex, b: BodyIndex) -> Vec<(FaceIndex, FaceIndex)> {
        let mut pairs: BTreeSet<(FaceIndex, FaceIndex)> = BTreeSet::new();
        let map_b = &self.buckets[b.0 as usize];
        for entry in &self.faces[a.0 as usize] {
            for (normal, offset) in [
                (entry.normal, entry.offset),
                (-entry.normal, -entry.offset),
            ] {
                let base = quantize(&normal, offset, self.step_normal, self.step_offset);
                for key in neighborhood(base) {
                    if let Some(matches) = map_b.get(&key) {
                        for &fb in matches {
                            pairs.insert((entry.face, fb));
                        }
                    }
                }
            }
        }
        pairs.into_iter().collect()
    }
}

fn quantize(normal: &Vec3, offset: f64, step_normal: f64, step_offset: f64) -> BucketKey {
    BucketKey {
        n: [
            (normal.x / step_normal).floor() as i64,
            (normal.y / step_normal).floor() as i64,
            (normal.z / step_normal).floor() as i64,
        ],
        d: (offset / step_offset).floor() as i64,
    }
}

/// The 3^4 keys within ±1 of `base` in every component.
fn neighborhood(base: BucketKey) -> impl Iterator<Item = BucketKey> {
    (-1i64..=1).flat_map(move |dx| {
        (-1i64..=1).flat_map(move |dy| {
            (-1i64..=1).flat_map(move |dz| {
                (-1i64..=1).map(move |dd| BucketKey {
                    n: [base.n[0] + dx, base.n[1] + dy, base.n[2] + dz],
                    d: base.d + dd,
                })
            })
        })
    })
}
