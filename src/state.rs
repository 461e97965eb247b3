// STD Dependencies -----------------------------------------------------------
use std::collections::{BTreeMap, HashMap};

// External Dependencies ------------------------------------------------------
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key under which the expansion state is stored inside a
/// [`StateBundle`](struct.StateBundle.html).
pub const EXPANDED_STATE_MAP_KEY: &str = "expandable_list.expanded_state_map";

/// Expansion state of every parent, keyed by parent ordinal.
#[derive(Serialize, Deserialize, Default, Clone, Debug, Eq, PartialEq)]
pub struct ExpansionSnapshot {
    expanded: BTreeMap<usize, bool>,
}

impl ExpansionSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the expansion state of the parent at `ordinal`.
    pub fn insert(&mut self, ordinal: usize, expanded: bool) {
        self.expanded.insert(ordinal, expanded);
    }

    /// The recorded state of the parent at `ordinal`, if any.
    pub fn get(&self, ordinal: usize) -> Option<bool> {
        self.expanded.get(&ordinal).cloned()
    }

    /// Number of recorded parents.
    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    /// Returns `true` if no parent was recorded.
    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    /// Ordinals of all parents recorded as expanded, in ascending order.
    pub fn expanded_ordinals(&self) -> Vec<usize> {
        self.expanded
            .iter()
            .filter(|&(_, expanded)| *expanded)
            .map(|(ordinal, _)| *ordinal)
            .collect()
    }
}

/// A transient key/value container for view state, e.g. to carry state
/// across a re-creation of the host view.
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
pub struct StateBundle {
    entries: HashMap<String, Value>,
}

impl StateBundle {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn put<K: Into<String>>(&mut self, key: K, value: Value) {
        self.entries.insert(key.into(), value);
    }

    /// The entry stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Removes and returns the entry stored under `key`.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Returns `true` if an entry is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}
