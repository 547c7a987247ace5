#![warn(missing_docs)]

//! Named-selection emission for detected contacts.
//!
//! The host document persists each contact side as a retrievable named
//! group so the FEA pre-processor can bind tied constraints to it.
//! [`SelectionStore`] is the seam to that external document; the
//! in-memory implementation backs tests and the CLI.
//!
//! Emission is two-phase: [`stage`] is pure and builds the group list,
//! [`StagedSelections::commit`] applies it all-or-nothing inside the
//! caller's transactional scope, [`StagedSelections::discard`] drops it
//! without touching the store. A staged value is consumed by exactly
//! one of the two, so the uncommitted/committed/discarded tri-state is
//! enforced by ownership instead of flags. If any group fails to
//! persist, groups already created in the same commit are removed
//! again — an aborted run leaves no partial selections behind.

use std::collections::BTreeMap;

use thiserror::Error;

use feaprep_contact::{ContactPair, EntityRef};
use feaprep_model::BodyIndex;

/// Errors from the named-selection store.
#[derive(Error, Debug)]
pub enum SelectionError {
    /// A group with this name already exists in the store.
    #[error("named selection '{0}' already exists")]
    NameCollision(String),
    /// The host persistence layer failed.
    #[error("selection store failure: {0}")]
    Backend(String),
}

/// One contact side to be persisted: the entity and its owning body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionEntity {
    /// Owning body.
    pub body: BodyIndex,
    /// The contacting face or edge.
    pub entity: EntityRef,
}

/// The host document's named-selection table (external collaborator).
pub trait SelectionStore {
    /// Persist one named group. Fails on name collision or backend
    /// error; must not partially apply.
    fn create_selection(&mut self, name: &str, entity: &SelectionEntity)
        -> Result<(), SelectionError>;

    /// Remove a previously created group. Used for commit rollback.
    fn remove_selection(&mut self, name: &str) -> Result<(), SelectionError>;
}

/// In-memory selection store for tests and the CLI.
#[derive(Debug, Clone, Default)]
pub struct InMemorySelectionStore {
    groups: BTreeMap<String, SelectionEntity>,
}

impl InMemorySelectionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve a group by name.
    pub fn selection(&self, name: &str) -> Option<&SelectionEntity> {
        self.groups.get(name)
    }

    /// Iterate group names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True if no groups exist.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl SelectionStore for InMemorySelectionStore {
    fn create_selection(
        &mut self,
        name: &str,
        entity: &SelectionEntity,
    ) -> Result<(), SelectionError> {
        if self.groups.contains_key(name) {
            return Err(SelectionError::NameCollision(name.to_string()));
        }
        self.groups.insert(name.to_string(), *entity);
        Ok(())
    }

    fn remove_selection(&mut self, name: &str) -> Result<(), SelectionError> {
        self.groups.remove(name);
        Ok(())
    }
}

/// Selections staged for commit: one named group per contact side, in
/// pair order. Not yet visible to any store.
#[derive(Debug, Clone)]
pub struct StagedSelections {
    groups: Vec<(String, SelectionEntity)>,
}

/// Stage the named groups for a finalized pair list. Pure: nothing is
/// written until [`StagedSelections::commit`].
pub fn stage(pairs: &[ContactPair]) -> StagedSelections {
    let mut groups = Vec::with_capacity(pairs.len() * 2);
    for pair in pairs {
        groups.push((
            pair.name_a.clone(),
            SelectionEntity {
                body: pair.body_a,
                entity: pair.entity_a,
            },
        ));
        groups.push((
            pair.name_b.clone(),
            SelectionEntity {
                body: pair.body_b,
                entity: pair.entity_b,
            },
        ));
    }
    StagedSelections { groups }
}

impl StagedSelections {
    /// The staged groups, in emission order.
    pub fn groups(&self) -> &[(String, SelectionEntity)] {
        &self.groups
    }

    /// Commit every staged group to the store, all-or-nothing.
    ///
    /// On the first failure, groups created earlier in this commit are
    /// removed again and the error is returned — the store is left as
    /// it was found. Returns the created names on success.
    pub fn commit(self, store: &mut dyn SelectionStore) -> Result<Vec<String>, SelectionError> {
        let mut created: Vec<String> = Vec::with_capacity(self.groups.len());
        for (name, entity) in &self.groups {
            if let Err(err) = store.create_selection(name, entity) {
                for done in created.iter().rev() {
                    // best-effort rollback; the original error wins
                    let _ = store.remove_selection(done);
                }
                return Err(err);
            }
            created.push(name.clone());
        }
        Ok(created)
    }

    /// Drop the staged groups without writing anything.
    pub fn discard(self) {}
}
