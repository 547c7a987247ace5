#![warn(missing_docs)]

//! High-level facade for feaprep — contact interface detection and
//! named-selection emission for FEA tie constraints.
//!
//! # Example
//!
//! ```
//! use feaprep::{detect_and_create_selections, DetectionOptions};
//! use feaprep::model::{make_box, Assembly, Point3, Vec3};
//! use feaprep::select::InMemorySelectionStore;
//!
//! let mut assembly = Assembly::new();
//! assembly.push_body(make_box("lower", Point3::origin(), Vec3::new(10.0, 10.0, 10.0)));
//! assembly.push_body(make_box("upper", Point3::new(0.0, 0.0, 10.0), Vec3::new(10.0, 10.0, 10.0)));
//!
//! let mut store = InMemorySelectionStore::new();
//! let detection =
//!     detect_and_create_selections(&assembly, &DetectionOptions::default(), &mut store).unwrap();
//!
//! assert_eq!(detection.pairs.len(), 1);
//! assert!((detection.pairs[0].area - 100.0).abs() < 1e-6);
//! assert!(store.selection("lower_1").is_some());
//! ```

pub use feaprep_contact as contact;
pub use feaprep_math as math;
pub use feaprep_model as model;
pub use feaprep_select as select;

pub use feaprep_contact::{
    detect_contacts, run_self_test, ContactKind, ContactPair, Detection, DetectionOptions,
    DiagnosticLog, EntityRef, Tolerance,
};
pub use feaprep_select::{stage, SelectionError, SelectionStore, StagedSelections};

use feaprep_model::Assembly;

/// Detect every contact interface in the assembly and persist one named
/// selection per contact side.
///
/// Detection itself never fails; emission is all-or-nothing. The caller
/// supplies the transactional scope around the store — if the commit
/// fails, the error propagates and the store is left as it was found,
/// with no partial selections from this run.
pub fn detect_and_create_selections(
    assembly: &Assembly,
    options: &DetectionOptions,
    store: &mut dyn SelectionStore,
) -> Result<Detection, SelectionError> {
    let detection = detect_contacts(assembly, options);
    // commit only after the full pair list is finalized, never per pair
    stage(&detection.pairs).commit(store)?;
    Ok(detection)
}
