//! GraphQL Batcher
//!
//! Coalesces data requests issued within a short quiet period into one
//! combined GraphQL request, then fans the response back out into a shared
//! cache keyed by each caller's key:
//! - Debounced batching with a substitutable scheduler
//! - Alias rewriting so path-like keys survive the round trip
//! - Extractor paths to narrow each key's response slice
//! - A snapshot cache store with change notification

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{
    CacheState, CacheStore, DomainError, Extractor, FetchRequest, FetchState, FlushOutcome,
    PendingRequest, ScheduledTask, Scheduler, StoreAction, Transport,
};
pub use infrastructure::batcher::{BatchFetcher, FetcherOptions};
pub use infrastructure::cache::InMemoryCacheStore;
pub use infrastructure::scheduler::TokioScheduler;
pub use infrastructure::transport::GraphqlHttpTransport;
