//! Flush outcome reported to subscribers

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::DomainError;

/// Summary of one flushed batch
#[derive(Debug, Clone)]
pub struct FlushOutcome {
    pub batch_id: Uuid,
    /// Keys that were pending when the batch was claimed
    pub keys: Vec<String>,
    /// Keys written to the cache store
    pub stored: Vec<String>,
    pub error: Option<DomainError>,
    pub finished_at: DateTime<Utc>,
}

impl FlushOutcome {
    pub(crate) fn succeeded(batch_id: Uuid, keys: Vec<String>, stored: Vec<String>) -> Self {
        Self {
            batch_id,
            keys,
            stored,
            error: None,
            finished_at: Utc::now(),
        }
    }

    pub(crate) fn failed(batch_id: Uuid, keys: Vec<String>, error: DomainError) -> Self {
        Self {
            batch_id,
            keys,
            stored: Vec::new(),
            error: Some(error),
            finished_at: Utc::now(),
        }
    }

    /// Outcome for a flush that found nothing to send
    pub(crate) fn empty() -> Self {
        Self::succeeded(Uuid::new_v4(), Vec::new(), Vec::new())
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// Converts into a `Result`, surfacing the flush failure
    pub fn into_result(mut self) -> Result<Self, DomainError> {
        match self.error.take() {
            Some(error) => Err(error),
            None => Ok(self),
        }
    }
}
