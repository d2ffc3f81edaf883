//! In-memory cache store backed by a watch channel

use tokio::sync::watch;

use crate::domain::cache::{reduce, CacheState, CacheStore, StoreAction};

/// Process-wide response cache
///
/// Snapshots are immutable; each dispatch swaps in a new one and wakes every
/// subscriber once. Entries never expire; only `Clear` removes them.
#[derive(Debug)]
pub struct InMemoryCacheStore {
    state: watch::Sender<CacheState>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(CacheState::new());
        Self { state }
    }

    /// Number of live subscribers
    pub fn receiver_count(&self) -> usize {
        self.state.receiver_count()
    }
}

impl Default for InMemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore for InMemoryCacheStore {
    fn current_state(&self) -> CacheState {
        self.state.borrow().clone()
    }

    fn dispatch(&self, action: StoreAction) {
        self.state.send_modify(|state| {
            *state = reduce(state, action);
        });
    }

    fn subscribe(&self) -> watch::Receiver<CacheState> {
        self.state.subscribe()
    }
}
