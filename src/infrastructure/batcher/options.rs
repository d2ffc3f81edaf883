//! Runtime settings for the batch fetcher

use std::time::Duration;

/// Quiet period used when none is configured
pub const DEFAULT_DELAY: Duration = Duration::from_millis(50);

/// Settings read by the fetcher each time it schedules or sends a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetcherOptions {
    /// GraphQL endpoint receiving combined queries
    pub endpoint: String,
    /// Quiet period after the last enqueue before a batch is sent
    pub delay: Duration,
    /// Log queue contents, combined queries and stored results
    pub debug: bool,
}

impl Default for FetcherOptions {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            delay: DEFAULT_DELAY,
            debug: false,
        }
    }
}

impl FetcherOptions {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
