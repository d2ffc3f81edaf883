//! Infrastructure layer - Engine and collaborator implementations

pub mod batcher;
pub mod cache;
pub mod logging;
pub mod metrics;
pub mod scheduler;
pub mod transport;
