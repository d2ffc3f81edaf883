//! Caller-facing request descriptions

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::extractor::Extractor;
use super::request::PendingRequest;

/// What a caller asks for: a query fragment, optionally under an explicit key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extractor: Option<Extractor>,
}

impl FetchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            key: None,
            extractor: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_extractor(mut self, extractor: impl Into<Extractor>) -> Self {
        self.extractor = Some(extractor.into());
        self
    }

    /// Cache key for this request: the explicit key, else the caller's context
    /// (typically the current navigation path)
    pub fn cache_key(&self, context: &str) -> String {
        self.key.clone().unwrap_or_else(|| context.to_string())
    }

    pub fn into_pending(self, context: &str) -> PendingRequest {
        PendingRequest {
            key: self.cache_key(context),
            query: self.query,
            extractor: self.extractor,
        }
    }
}

/// Result of asking for a key
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    /// Value already in the cache
    Cached(Value),
    /// Queued for the next batch; re-read after the store notifies
    Pending,
}

impl FetchState {
    pub fn is_cached(&self) -> bool {
        matches!(self, Self::Cached(_))
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Cached(value) => Some(value),
            Self::Pending => None,
        }
    }
}
