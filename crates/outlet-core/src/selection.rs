//! Selection state: which outlet is focused and which outlets are near it.
//!
//! [`SelectionState`] is a plain value; transitions return a new value and never
//! patch the old one. [`SelectionController`] pairs it with the snapshot and
//! radius it is computed against.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::entity::{EntityId, Outlet};
use crate::proximity::{find_neighbors, neighbors_with_distance, radius_meters, Neighbor};
use crate::snapshot::OutletSnapshot;

static NO_NEIGHBORS: BTreeSet<EntityId> = BTreeSet::new();

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("outlet not found: {0}")]
    EntityNotFound(String),
}

/// How an outlet should be drawn given the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerRole {
    Selected,
    Neighbor,
    Default,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SelectionState {
    #[default]
    Idle,
    Focused {
        selected: Outlet,
        neighbors: BTreeSet<EntityId>,
    },
}

impl SelectionState {
    /// Focuses the outlet whose id matches `key`, recomputing its neighbors.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::EntityNotFound`] if `key` is not in `snapshot`.
    /// `self` is untouched either way.
    pub fn select(
        &self,
        key: &str,
        snapshot: &OutletSnapshot,
        radius_km: f64,
    ) -> Result<Self, SelectionError> {
        let selected = snapshot
            .get(key)
            .ok_or_else(|| SelectionError::EntityNotFound(key.to_string()))?;
        let neighbors = find_neighbors(selected, snapshot.outlets(), radius_km);
        Ok(Self::Focused {
            selected: selected.clone(),
            neighbors,
        })
    }

    #[must_use]
    pub fn clear(&self) -> Self {
        Self::Idle
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Outlet> {
        match self {
            Self::Idle => None,
            Self::Focused { selected, .. } => Some(selected),
        }
    }

    /// Neighbor ids of the focused outlet; empty when idle.
    #[must_use]
    pub fn neighbors(&self) -> &BTreeSet<EntityId> {
        match self {
            Self::Idle => &NO_NEIGHBORS,
            Self::Focused { neighbors, .. } => neighbors,
        }
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        matches!(self, Self::Focused { .. })
    }

    #[must_use]
    pub fn marker_role(&self, id: &EntityId) -> MarkerRole {
        match self {
            Self::Focused { selected, .. } if &selected.id == id => MarkerRole::Selected,
            Self::Focused { neighbors, .. } if neighbors.contains(id) => MarkerRole::Neighbor,
            _ => MarkerRole::Default,
        }
    }
}

/// Owns the current [`SelectionState`] for one outlet snapshot.
#[derive(Debug, Clone)]
pub struct SelectionController {
    snapshot: OutletSnapshot,
    radius_km: f64,
    state: SelectionState,
}

impl SelectionController {
    #[must_use]
    pub fn new(snapshot: OutletSnapshot, radius_km: f64) -> Self {
        Self {
            snapshot,
            radius_km,
            state: SelectionState::Idle,
        }
    }

    /// Focuses an outlet by id.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::EntityNotFound`] and keeps the previous state
    /// when the id is not in the snapshot.
    pub fn select_entity(&mut self, key: &str) -> Result<&SelectionState, SelectionError> {
        let next = self
            .state
            .select(key, &self.snapshot, self.radius_km)
            .inspect_err(|_| tracing::debug!(outlet_id = key, "selection ignored: unknown outlet"))?;
        tracing::debug!(
            outlet_id = key,
            neighbors = next.neighbors().len(),
            radius_km = self.radius_km,
            "outlet selected"
        );
        self.state = next;
        Ok(&self.state)
    }

    pub fn clear_selection(&mut self) -> &SelectionState {
        self.state = self.state.clear();
        &self.state
    }

    #[must_use]
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    #[must_use]
    pub fn snapshot(&self) -> &OutletSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Radius of the highlight circle around the focused outlet.
    #[must_use]
    pub fn radius_meters(&self) -> f64 {
        radius_meters(self.radius_km)
    }

    /// Neighbors of the focused outlet with distances, nearest first.
    #[must_use]
    pub fn nearest(&self) -> Vec<Neighbor> {
        self.state.selected().map_or_else(Vec::new, |selected| {
            neighbors_with_distance(selected, self.snapshot.outlets(), self.radius_km)
        })
    }
}

#[cfg(test)]
#[path = "selection_test.rs"]
mod tests;
