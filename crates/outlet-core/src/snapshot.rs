//! Immutable outlet collection loaded once per session.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::entity::Outlet;
use crate::CoreError;

/// Read-only outlet collection with id lookup.
///
/// Ids are unique within a snapshot: when the source repeats an id, the first
/// record wins. Cloning is cheap.
#[derive(Debug, Clone, Default)]
pub struct OutletSnapshot {
    outlets: Arc<[Outlet]>,
    by_key: Arc<HashMap<String, usize>>,
    skipped: usize,
}

impl OutletSnapshot {
    #[must_use]
    pub fn from_outlets(outlets: impl IntoIterator<Item = Outlet>) -> Self {
        let mut kept = Vec::new();
        let mut by_key = HashMap::new();
        let mut skipped = 0;

        for outlet in outlets {
            let key = outlet.id.lookup_key();
            if by_key.contains_key(&key) {
                tracing::warn!(outlet_id = %key, "duplicate outlet id in snapshot; keeping first");
                skipped += 1;
                continue;
            }
            by_key.insert(key, kept.len());
            kept.push(outlet);
        }

        Self {
            outlets: kept.into(),
            by_key: Arc::new(by_key),
            skipped,
        }
    }

    /// Builds a snapshot from the upstream `/outlets` JSON payload.
    ///
    /// Records that do not decode as an outlet are skipped and counted.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotAnArray`] if the payload is not a JSON array.
    pub fn from_json(payload: Value) -> Result<Self, CoreError> {
        let Value::Array(items) = payload else {
            return Err(CoreError::NotAnArray);
        };

        let total = items.len();
        let decoded: Vec<Outlet> = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<Outlet>(item) {
                Ok(outlet) => Some(outlet),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping undecodable outlet record");
                    None
                }
            })
            .collect();
        let undecodable = total - decoded.len();

        let mut snapshot = Self::from_outlets(decoded);
        snapshot.skipped += undecodable;
        Ok(snapshot)
    }

    #[must_use]
    pub fn outlets(&self) -> &[Outlet] {
        &self.outlets
    }

    /// Looks up an outlet by the string form of its id.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Outlet> {
        self.by_key.get(key).map(|&idx| &self.outlets[idx])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outlets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outlets.is_empty()
    }

    /// Number of source records dropped (undecodable or duplicate id).
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Number of kept outlets without a usable coordinate.
    #[must_use]
    pub fn unlocated(&self) -> usize {
        self.outlets
            .iter()
            .filter(|o| o.coordinate().is_none())
            .count()
    }
}
