//! Batcher infrastructure - The debounced request batching engine

mod engine;
mod options;

pub use engine::BatchFetcher;
pub use options::{FetcherOptions, DEFAULT_DELAY};
