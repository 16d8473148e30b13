//! Single-entity selection with toggle semantics.
//!
//! The state is an enum rather than a set, so a two-element selection cannot
//! be represented. Every transition reports a [`SelectionChange`] that tells
//! the engine whether to center the camera and what to tell UI panels.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use serde::Serialize;

use crate::graph::{EntityId, GraphStore};

/// Current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "id", rename_all = "lowercase")]
pub enum SelectionState {
    #[default]
    Unselected,
    Selected(EntityId),
}

/// A transition that actually changed the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionChange {
    /// Nothing was selected; now `id` is.
    Selected { id: EntityId },
    /// `previous` was replaced by `id`.
    Replaced { previous: EntityId, id: EntityId },
    /// `id` was deselected (toggle-off, clear, or removal).
    Deselected { id: EntityId },
}

impl SelectionChange {
    /// Whether the camera should center on the newly selected entity.
    #[must_use]
    pub fn centers_on(&self) -> Option<EntityId> {
        match *self {
            Self::Selected { id } | Self::Replaced { id, .. } => Some(id),
            Self::Deselected { .. } => None,
        }
    }
}

/// Tracks which single entity, if any, is selected.
///
/// Always starts `Unselected`; persisted selections are never fed back in.
#[derive(Debug, Clone, Default)]
pub struct SelectionMachine {
    state: SelectionState,
}

impl SelectionMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> SelectionState {
        self.state
    }

    #[must_use]
    pub fn current(&self) -> Option<EntityId> {
        match self.state {
            SelectionState::Unselected => None,
            SelectionState::Selected(id) => Some(id),
        }
    }

    #[must_use]
    pub fn is_selected(&self, id: &EntityId) -> bool {
        self.current().as_ref() == Some(id)
    }

    /// Select `id`, or toggle it off if it is already selected.
    ///
    /// Returns `None` when nothing changed: `id` names no live node or edge.
    pub fn select(&mut self, id: EntityId, graph: &GraphStore) -> Option<SelectionChange> {
        let change = match self.state {
            SelectionState::Selected(current) if current == id => SelectionChange::Deselected { id },
            _ if !graph.contains_entity(&id) => {
                tracing::debug!(%id, "ignoring selection of unknown entity");
                return None;
            }
            SelectionState::Unselected => SelectionChange::Selected { id },
            SelectionState::Selected(previous) => SelectionChange::Replaced { previous, id },
        };
        self.apply(change);
        Some(change)
    }

    /// Return to `Unselected`. `None` if nothing was selected.
    pub fn clear(&mut self) -> Option<SelectionChange> {
        let id = self.current()?;
        let change = SelectionChange::Deselected { id };
        self.apply(change);
        Some(change)
    }

    /// Drop the selection if it names an entity that just left the graph.
    pub fn on_entity_removed(&mut self, id: &EntityId) -> Option<SelectionChange> {
        if self.is_selected(id) { self.clear() } else { None }
    }

    /// Drop the selection if its entity is no longer in `graph`.
    pub fn retain_live(&mut self, graph: &GraphStore) -> Option<SelectionChange> {
        match self.current() {
            Some(id) if !graph.contains_entity(&id) => self.clear(),
            _ => None,
        }
    }

    fn apply(&mut self, change: SelectionChange) {
        self.state = match change.centers_on() {
            Some(id) => SelectionState::Selected(id),
            None => SelectionState::Unselected,
        };
    }
}
