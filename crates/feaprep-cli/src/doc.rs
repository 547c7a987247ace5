//! JSON assembly document: a list of named axis-aligned boxes.
//!
//! ```json
//! {
//!   "bodies": [
//!     { "name": "lower jig", "origin": [0.0, 0.0, 0.0], "size": [10.0, 10.0, 10.0] },
//!     { "name": "upper jig", "origin": [0.0, 0.0, 10.0], "size": [10.0, 10.0, 10.0] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use feaprep::model::{make_box, Assembly, Point3, Vec3};

/// A named box body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxDoc {
    /// Body display name.
    pub name: String,
    /// Minimum corner, mm.
    pub origin: [f64; 3],
    /// Extents along x, y, z, mm.
    pub size: [f64; 3],
}

/// The document root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyDoc {
    /// Bodies in document order.
    pub bodies: Vec<BoxDoc>,
}

impl AssemblyDoc {
    /// Build the model assembly this document describes.
    pub fn to_assembly(&self) -> Assembly {
        let mut assembly = Assembly::new();
        for body in &self.bodies {
            assembly.push_body(make_box(
                body.name.clone(),
                Point3::new(body.origin[0], body.origin[1], body.origin[2]),
                Vec3::new(body.size[0], body.size[1], body.size[2]),
            ));
        }
        assembly
    }
}
