//! Pending requests and combined query construction

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::Serialize;

use super::alias::{forward_alias, is_global_alias, reverse_alias};
use super::extractor::Extractor;

/// A query waiting for the next batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingRequest {
    pub key: String,
    pub query: String,
    pub extractor: Option<Extractor>,
}

impl PendingRequest {
    pub fn new(key: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            query: query.into(),
            extractor: None,
        }
    }

    pub fn with_extractor(mut self, extractor: impl Into<Extractor>) -> Self {
        self.extractor = Some(extractor.into());
        self
    }

    pub fn alias(&self) -> String {
        forward_alias(&self.key)
    }
}

/// Pending requests keyed by cache key
///
/// Keys are unique; a later request for the same key replaces the earlier one.
/// Iteration is ordered by key so the combined query is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PendingQueue {
    requests: BTreeMap<String, PendingRequest>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the request for its key
    pub fn insert(&mut self, request: PendingRequest) -> Option<PendingRequest> {
        self.requests.insert(request.key.clone(), request)
    }

    pub fn get(&self, key: &str) -> Option<&PendingRequest> {
        self.requests.get(key)
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.requests.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Values<'_, String, PendingRequest> {
        self.requests.values()
    }

    /// Builds the `{alias:query,...}` document sent to the endpoint
    pub fn combined_query(&self) -> String {
        let fields: Vec<String> = self
            .iter()
            .map(|request| format!("{}:{}", request.alias(), request.query))
            .collect();

        format!("{{{}}}", fields.join(","))
    }

    /// Maps a response alias back to the cache key and the request it answers
    ///
    /// `global` aliases are taken verbatim. Other aliases produced by this queue
    /// resolve to their exact key, and anything else falls back to the textual
    /// reverse mapping.
    pub fn resolve_alias(&self, alias: &str) -> (String, Option<&PendingRequest>) {
        if is_global_alias(alias) {
            return (alias.to_string(), self.requests.get(alias));
        }

        if let Some(request) = self.iter().find(|request| request.alias() == alias) {
            return (request.key.clone(), Some(request));
        }

        let key = reverse_alias(alias);
        let request = self.requests.get(&key);
        (key, request)
    }
}

impl<'a> IntoIterator for &'a PendingQueue {
    type Item = &'a PendingRequest;
    type IntoIter = btree_map::Values<'a, String, PendingRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
