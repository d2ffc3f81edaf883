//! Cache snapshot and the actions that evolve it

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

/// Immutable snapshot of every cached response
///
/// Cloning is cheap; each update produces a fresh snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheState {
    entries: Arc<HashMap<String, Value>>,
}

impl CacheState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for a key
    ///
    /// A key stored as `null` (e.g. an extractor that found nothing) reads as
    /// absent, so callers treat it as not yet fetched.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).filter(|value| !value.is_null())
    }

    /// Whether the key was written by any merge, including `null` results
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Shallow-merges a batch of results into a new snapshot
    pub fn merged(&self, payload: HashMap<String, Value>) -> Self {
        let mut entries = HashMap::clone(&self.entries);
        entries.extend(payload);

        Self {
            entries: Arc::new(entries),
        }
    }

    /// Renders the snapshot as a JSON object
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Value::Object(map)
    }
}

/// The two updates the store accepts
#[derive(Debug, Clone, PartialEq)]
pub enum StoreAction {
    /// Merge a key -> value mapping
    Store(HashMap<String, Value>),
    /// Reset to empty
    Clear,
}

/// Applies an action to a snapshot
pub fn reduce(state: &CacheState, action: StoreAction) -> CacheState {
    match action {
        StoreAction::Store(payload) => state.merged(payload),
        StoreAction::Clear => CacheState::new(),
    }
}
