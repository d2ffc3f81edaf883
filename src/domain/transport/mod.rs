//! Transport domain - The combined-query request port

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Response body keyed by alias
pub type AliasedResponse = Map<String, Value>;

/// Sends one combined query and returns its aliased fields
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs the request against `endpoint`
    ///
    /// Fails with a transport error on network, protocol or parse failures.
    async fn send(&self, endpoint: &str, query: &str) -> Result<AliasedResponse, DomainError>;
}
