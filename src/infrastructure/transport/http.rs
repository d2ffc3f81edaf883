use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::transport::{AliasedResponse, Transport};
use crate::domain::DomainError;

/// GraphQL response envelope
#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

/// GraphQL-over-HTTP transport using reqwest
#[derive(Debug, Clone)]
pub struct GraphqlHttpTransport {
    client: reqwest::Client,
    headers: Vec<(String, String)>,
}

impl GraphqlHttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            headers: Vec::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            headers: Vec::new(),
        })
    }

    /// Adds a header sent with every request (e.g. authorization)
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

impl Default for GraphqlHttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for GraphqlHttpTransport {
    async fn send(&self, endpoint: &str, query: &str) -> Result<AliasedResponse, DomainError> {
        let mut request = self.client.post(endpoint);

        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .json(&json!({ "query": query }))
            .send()
            .await
            .map_err(|e| DomainError::transport(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(DomainError::transport(format!(
                "HTTP {}: {}",
                status, error_body
            )));
        }

        let body: GraphqlResponse = response
            .json()
            .await
            .map_err(|e| DomainError::transport(format!("Failed to parse response: {}", e)))?;

        if !body.errors.is_empty() {
            let messages: Vec<&str> = body.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(DomainError::transport(format!(
                "GraphQL errors: {}",
                messages.join("; ")
            )));
        }

        match body.data {
            Some(Value::Object(data)) => Ok(data),
            Some(other) => Err(DomainError::transport(format!(
                "Expected an object in response data, got {}",
                other
            ))),
            None => Err(DomainError::transport("Response contained no data")),
        }
    }
}
