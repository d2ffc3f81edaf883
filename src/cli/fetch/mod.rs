//! Fetch command - enqueue keyed queries and print the cache once they land

use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use futures::future::join_all;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{DomainError, Extractor, FetchRequest};
use crate::infrastructure::batcher::{BatchFetcher, FetcherOptions};
use crate::infrastructure::logging::{self, LoggingConfig};

#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// GraphQL endpoint (defaults to APP_BATCHER__ENDPOINT)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Query to batch, as KEY=QUERY (repeatable)
    #[arg(long = "query", short = 'q', required = true)]
    pub queries: Vec<KeyedArg>,

    /// Extractor for a key, as KEY=PATH with a dot-separated path (repeatable)
    #[arg(long = "extract", short = 'x')]
    pub extractors: Vec<KeyedArg>,

    /// Quiet period before the batch is sent
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Log queue contents, the combined query and stored results
    #[arg(long)]
    pub debug: bool,

    /// Give up waiting for the batch after this long
    #[arg(long, default_value_t = 10_000)]
    pub timeout_ms: u64,
}

/// `KEY=VALUE` command line argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedArg {
    pub key: String,
    pub value: String,
}

impl FromStr for KeyedArg {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| DomainError::validation(format!("Expected KEY=VALUE, got '{}'", s)))?;

        if key.is_empty() {
            return Err(DomainError::validation(format!("Missing key in '{}'", s)));
        }

        Ok(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

impl FetchArgs {
    /// Applies command line overrides on top of the loaded configuration
    fn options(&self, config: &AppConfig) -> FetcherOptions {
        let mut options = config.batcher.to_options();

        if let Some(endpoint) = &self.endpoint {
            options.endpoint = endpoint.clone();
        }

        if let Some(delay_ms) = self.delay_ms {
            options.delay = Duration::from_millis(delay_ms);
        }

        options.debug |= self.debug;
        options
    }

    fn requests(&self) -> Vec<FetchRequest> {
        self.queries
            .iter()
            .map(|query| {
                let request = FetchRequest::new(query.value.clone()).with_key(query.key.clone());

                match self.extractors.iter().rev().find(|e| e.key == query.key) {
                    Some(extractor) => request.with_extractor(Extractor::parse(&extractor.value)),
                    None => request,
                }
            })
            .collect()
    }
}

/// Run the fetch command
pub async fn run(args: FetchArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&LoggingConfig::from(&config.logging));

    let options = args.options(&config);
    anyhow::ensure!(
        !options.endpoint.is_empty(),
        "No endpoint given; pass --endpoint or set APP_BATCHER__ENDPOINT"
    );

    info!("Batching {} queries against {}", args.queries.len(), options.endpoint);

    let fetcher = BatchFetcher::http(options);
    let requests = args.requests();

    let pending = requests
        .into_iter()
        .map(|request| {
            let fetcher = fetcher.clone();
            async move { fetcher.fetch(request, "").await }
        });

    let results = tokio::time::timeout(Duration::from_millis(args.timeout_ms), join_all(pending))
        .await
        .context("Timed out waiting for the batched request")?;

    for result in results {
        result?;
    }

    let state = fetcher.current_state().to_json();
    println!("{}", serde_json::to_string_pretty(&state)?);

    Ok(())
}
