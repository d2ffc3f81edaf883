//! Cache domain - Shared response cache contract

mod repository;
mod state;

pub use repository::CacheStore;
pub use state::{reduce, CacheState, StoreAction};

#[cfg(test)]
pub use repository::mock::RecordingCacheStore;
