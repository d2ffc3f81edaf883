//! Domain layer - Batching vocabulary and collaborator ports

pub mod batch;
pub mod cache;
pub mod error;
pub mod scheduler;
pub mod transport;

pub use batch::{
    forward_alias, is_global_alias, reverse_alias, Extractor, FetchRequest, FetchState,
    FlushOutcome, PendingQueue, PendingRequest,
};
pub use cache::{CacheState, CacheStore, StoreAction};
pub use error::DomainError;
pub use scheduler::{ScheduledFuture, ScheduledTask, Scheduler};
pub use transport::{AliasedResponse, Transport};
