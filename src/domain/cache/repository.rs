//! Cache store trait definition

use std::collections::HashMap;
use std::fmt::Debug;

use serde_json::Value;
use tokio::sync::watch;

use super::state::{CacheState, StoreAction};

/// Shared response cache with change notification
///
/// Every `dispatch` replaces the current snapshot and notifies subscribers
/// exactly once, regardless of how many keys the action touches.
pub trait CacheStore: Send + Sync + Debug {
    /// Returns the present snapshot
    fn current_state(&self) -> CacheState;

    /// Applies a store or clear action
    fn dispatch(&self, action: StoreAction);

    /// Returns a receiver that observes every new snapshot
    fn subscribe(&self) -> watch::Receiver<CacheState>;

    /// Reads one key from the present snapshot
    fn lookup(&self, key: &str) -> Option<Value> {
        self.current_state().get(key).cloned()
    }

    /// Merges a batch of results in a single update
    fn merge_batch(&self, payload: HashMap<String, Value>) {
        self.dispatch(StoreAction::Store(payload));
    }

    /// Drops every cached entry
    fn clear_all(&self) {
        self.dispatch(StoreAction::Clear);
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    use crate::domain::cache::reduce;

    /// Cache store that records every dispatched action
    #[derive(Debug)]
    pub struct RecordingCacheStore {
        sender: watch::Sender<CacheState>,
        actions: Mutex<Vec<StoreAction>>,
    }

    impl Default for RecordingCacheStore {
        fn default() -> Self {
            Self::new()
        }
    }

    impl RecordingCacheStore {
        pub fn new() -> Self {
            let (sender, _) = watch::channel(CacheState::new());

            Self {
                sender,
                actions: Mutex::new(Vec::new()),
            }
        }

        pub fn actions(&self) -> Vec<StoreAction> {
            self.actions.lock().unwrap().clone()
        }
    }

    impl CacheStore for RecordingCacheStore {
        fn current_state(&self) -> CacheState {
            self.sender.borrow().clone()
        }

        fn dispatch(&self, action: StoreAction) {
            self.actions.lock().unwrap().push(action.clone());
            let next = reduce(&self.sender.borrow(), action);
            self.sender.send_replace(next);
        }

        fn subscribe(&self) -> watch::Receiver<CacheState> {
            self.sender.subscribe()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use serde_json::json;

        #[test]
        fn test_recording_store_tracks_actions() {
            let store = RecordingCacheStore::new();

            store.merge_batch(HashMap::from([("a".to_string(), json!(1))]));
            store.clear_all();

            assert_eq!(store.actions().len(), 2);
            assert_eq!(store.actions()[1], StoreAction::Clear);
            assert_eq!(store.lookup("a"), None);
        }
    }
}
