//! Debounced batch fetcher
//!
//! Requests enqueued within one quiet period are merged into a single aliased
//! GraphQL document. The response is split back per key, narrowed by each
//! request's extractor, and merged into the cache store in one update.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use std::time::Instant;

use serde_json::Value;
use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::batch::{
    Extractor, FetchRequest, FetchState, FlushOutcome, PendingQueue, PendingRequest,
};
use crate::domain::cache::{CacheState, CacheStore};
use crate::domain::scheduler::{ScheduledTask, Scheduler};
use crate::domain::transport::{AliasedResponse, Transport};
use crate::domain::DomainError;
use crate::infrastructure::cache::InMemoryCacheStore;
use crate::infrastructure::metrics::{self, FlushMetricParams};
use crate::infrastructure::scheduler::TokioScheduler;
use crate::infrastructure::transport::GraphqlHttpTransport;

use super::options::FetcherOptions;

const OUTCOME_CHANNEL_CAPACITY: usize = 64;

/// Queue state guarded by a single lock
#[derive(Debug, Default)]
struct QueueState {
    pending: PendingQueue,
    timer: Option<ScheduledTask>,
    /// Bumped on every enqueue and claim; a timer only flushes its own generation
    generation: u64,
    /// Keys of claimed batches whose outcome has not been broadcast yet
    in_flight: HashMap<String, usize>,
}

impl QueueState {
    /// Whether a batch carrying `key` is still queued or on the wire
    fn is_outstanding(&self, key: &str) -> bool {
        self.pending.get(key).is_some() || self.in_flight.contains_key(key)
    }
}

struct Inner {
    store: Arc<dyn CacheStore>,
    transport: Arc<dyn Transport>,
    scheduler: Arc<dyn Scheduler>,
    options: RwLock<FetcherOptions>,
    queue: Mutex<QueueState>,
    outcomes: broadcast::Sender<FlushOutcome>,
}

impl Inner {
    fn lock_queue(&self) -> MutexGuard<'_, QueueState> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Marks a claimed batch's keys as in flight until dropped
struct InFlight<'a> {
    inner: &'a Inner,
    keys: Vec<String>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut queue = self.inner.lock_queue();

        for key in &self.keys {
            if let Some(count) = queue.in_flight.get_mut(key) {
                *count -= 1;

                if *count == 0 {
                    queue.in_flight.remove(key);
                }
            }
        }
    }
}

/// Coalesces concurrent data requests into one combined request per quiet period
///
/// Cheap to clone; clones share the queue, the options and the cache store.
#[derive(Clone)]
pub struct BatchFetcher {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for BatchFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchFetcher")
            .field("options", &self.options())
            .field("pending", &self.pending_len())
            .finish()
    }
}

impl BatchFetcher {
    /// Creates a fetcher from explicit collaborators
    pub fn new(
        store: Arc<dyn CacheStore>,
        transport: Arc<dyn Transport>,
        scheduler: Arc<dyn Scheduler>,
        options: FetcherOptions,
    ) -> Self {
        let (outcomes, _) = broadcast::channel(OUTCOME_CHANNEL_CAPACITY);

        Self {
            inner: Arc::new(Inner {
                store,
                transport,
                scheduler,
                options: RwLock::new(options),
                queue: Mutex::new(QueueState::default()),
                outcomes,
            }),
        }
    }

    /// Creates a fetcher that talks GraphQL over HTTP, keeps results in memory
    /// and debounces on the Tokio timer
    pub fn http(options: FetcherOptions) -> Self {
        Self::new(
            Arc::new(InMemoryCacheStore::new()),
            Arc::new(GraphqlHttpTransport::new()),
            Arc::new(TokioScheduler::new()),
            options,
        )
    }

    /// Returns a copy of the current options
    pub fn options(&self) -> FetcherOptions {
        self.inner
            .options
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the options; a timer already running keeps its delay
    pub fn configure(&self, options: FetcherOptions) {
        *self
            .inner
            .options
            .write()
            .unwrap_or_else(PoisonError::into_inner) = options;
    }

    /// Edits the options in place
    pub fn update_options(&self, update: impl FnOnce(&mut FetcherOptions)) {
        let mut options = self
            .inner
            .options
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        update(&mut options);
    }

    /// The cache store results are written to
    pub fn store(&self) -> Arc<dyn CacheStore> {
        self.inner.store.clone()
    }

    /// Reads a cached value
    pub fn lookup(&self, key: &str) -> Option<Value> {
        self.inner.store.lookup(key)
    }

    /// Present cache snapshot
    pub fn current_state(&self) -> CacheState {
        self.inner.store.current_state()
    }

    /// Observes cache snapshots
    pub fn subscribe(&self) -> watch::Receiver<CacheState> {
        self.inner.store.subscribe()
    }

    /// Observes the outcome of every flushed batch
    pub fn subscribe_flushes(&self) -> broadcast::Receiver<FlushOutcome> {
        self.inner.outcomes.subscribe()
    }

    /// Drops every cached entry
    pub fn clear(&self) {
        self.inner.store.clear_all();
    }

    /// Number of requests waiting for the next batch
    pub fn pending_len(&self) -> usize {
        self.inner.lock_queue().pending.len()
    }

    /// Queues `query` under `key` and restarts the quiet period
    pub fn enqueue(
        &self,
        key: impl Into<String>,
        query: impl Into<String>,
        extractor: Option<Extractor>,
    ) {
        let mut request = PendingRequest::new(key, query);
        request.extractor = extractor;
        self.enqueue_request(request);
    }

    /// Queues a prepared request and restarts the quiet period
    pub fn enqueue_request(&self, request: PendingRequest) {
        let delay = self.options().delay;
        let mut queue = self.inner.lock_queue();

        if let Some(timer) = queue.timer.take() {
            timer.cancel();
        }

        queue.pending.insert(request);
        queue.generation += 1;

        let generation = queue.generation;
        let weak = Arc::downgrade(&self.inner);

        queue.timer = Some(self.inner.scheduler.schedule_after(
            delay,
            Box::pin(async move {
                if let Some(fetcher) = Self::upgrade(&weak) {
                    fetcher.flush_scheduled(generation).await;
                }
            }),
        ));

        metrics::record_enqueue();
    }

    /// Returns the cached value, or queues the request and reports it pending
    pub fn request(&self, request: &FetchRequest, context: &str) -> FetchState {
        let key = request.cache_key(context);

        if let Some(value) = self.lookup(&key) {
            if self.options().debug {
                info!("Cache hit for {}", key);
            }

            metrics::record_cache_hit();
            return FetchState::Cached(value);
        }

        self.enqueue_request(request.clone().into_pending(context));
        FetchState::Pending
    }

    /// Requests a key and waits for the batch that carries it
    ///
    /// Returns `Ok(None)` when the batch succeeded but produced no value for
    /// the key, and the batch's error when it failed.
    pub async fn fetch(
        &self,
        request: FetchRequest,
        context: &str,
    ) -> Result<Option<Value>, DomainError> {
        let key = request.cache_key(context);

        if let Some(value) = self.lookup(&key) {
            if self.options().debug {
                info!("Cache hit for {}", key);
            }

            metrics::record_cache_hit();
            return Ok(Some(value));
        }

        let mut outcomes = self.subscribe_flushes();
        self.enqueue_request(request.into_pending(context));

        loop {
            match outcomes.recv().await {
                Ok(outcome) if outcome.contains_key(&key) => {
                    outcome.into_result()?;
                    return Ok(self.lookup(&key));
                }
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Flush subscriber lagged, skipped {} outcomes", skipped);

                    // The batch for this key finished among the skipped outcomes.
                    if !self.inner.lock_queue().is_outstanding(&key) {
                        return Ok(self.lookup(&key));
                    }
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(DomainError::internal("Flush outcome channel closed"));
                }
            }
        }
    }

    /// Sends everything pending right away, cancelling the running timer
    pub async fn flush_now(&self) -> Result<FlushOutcome, DomainError> {
        match self.claim(None) {
            Some((pending, in_flight)) => self.flush(pending, in_flight).await.into_result(),
            None => Ok(FlushOutcome::empty()),
        }
    }

    fn upgrade(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    async fn flush_scheduled(&self, generation: u64) {
        let Some((pending, in_flight)) = self.claim(Some(generation)) else {
            debug!("Skipping superseded batch timer (generation {})", generation);
            return;
        };

        let outcome = self.flush(pending, in_flight).await;

        if let Some(error) = &outcome.error {
            error!(
                batch_id = %outcome.batch_id,
                keys = ?outcome.keys,
                "Batched request failed: {}",
                error
            );
        }
    }

    /// Takes the whole pending queue
    ///
    /// With `Some(generation)` the claim only succeeds for the timer that
    /// belongs to the latest enqueue. With `None` the running timer is
    /// cancelled instead. The claimed keys stay in flight until the returned
    /// guard is dropped.
    fn claim(&self, generation: Option<u64>) -> Option<(PendingQueue, InFlight<'_>)> {
        let mut queue = self.inner.lock_queue();

        match generation {
            Some(expected) if queue.generation != expected => return None,
            Some(_) => {
                // The timer is the caller; cancelling it would abort this flush.
                queue.timer = None;
            }
            None => {
                if let Some(timer) = queue.timer.take() {
                    timer.cancel();
                }
            }
        }

        if queue.pending.is_empty() {
            return None;
        }

        queue.generation += 1;
        let pending = std::mem::take(&mut queue.pending);
        let keys: Vec<String> = pending.keys().map(str::to_string).collect();

        for key in &keys {
            *queue.in_flight.entry(key.clone()).or_insert(0) += 1;
        }

        let in_flight = InFlight {
            inner: &self.inner,
            keys,
        };

        Some((pending, in_flight))
    }

    /// Sends a claimed queue and stores the results
    ///
    /// The queue has already been detached, so a failed batch is not retried.
    async fn flush(&self, pending: PendingQueue, in_flight: InFlight<'_>) -> FlushOutcome {
        let options = self.options();
        let batch_id = Uuid::new_v4();
        let keys: Vec<String> = pending.keys().map(str::to_string).collect();
        let started = Instant::now();

        if options.debug {
            info!(batch_id = %batch_id, "Starting batched request: {:?}", pending);
        }

        let outcome = match self.execute(&pending, &options).await {
            Ok(stored) => FlushOutcome::succeeded(batch_id, keys, stored),
            Err(error) => FlushOutcome::failed(batch_id, keys, error),
        };

        metrics::record_flush(FlushMetricParams {
            batch_size: pending.len(),
            stored: outcome.stored.len(),
            duration: started.elapsed(),
            success: outcome.is_success(),
        });

        drop(in_flight);

        // No subscribers is fine.
        let _ = self.inner.outcomes.send(outcome.clone());

        outcome
    }

    async fn execute(
        &self,
        pending: &PendingQueue,
        options: &FetcherOptions,
    ) -> Result<Vec<String>, DomainError> {
        if options.endpoint.is_empty() {
            return Err(DomainError::configuration("GraphQL endpoint is not configured"));
        }

        let query = pending.combined_query();

        if options.debug {
            info!("Combined query: {}", query);
        }

        let response = self.inner.transport.send(&options.endpoint, &query).await?;
        let results = split_response(pending, response);

        if options.debug {
            info!("Storing batched results: {:?}", results);
        }

        let mut stored: Vec<String> = results.keys().cloned().collect();
        stored.sort();

        self.inner.store.merge_batch(results);

        Ok(stored)
    }
}

/// Maps each aliased response field back to its cache key and applies the
/// request's extractor
fn split_response(pending: &PendingQueue, response: AliasedResponse) -> HashMap<String, Value> {
    let mut results = HashMap::with_capacity(response.len());

    for (alias, value) in response {
        let (key, request) = pending.resolve_alias(&alias);

        let value = match request {
            Some(request) => match &request.extractor {
                Some(extractor) => extractor.extract(&value).unwrap_or(Value::Null),
                None => value,
            },
            None => {
                warn!("Response field '{}' matches no pending request, storing as '{}'", alias, key);
                value
            }
        };

        results.insert(key, value);
    }

    for key in pending.keys() {
        if !results.contains_key(key) {
            warn!("Response carried no field for pending key '{}'", key);
        }
    }

    results
}
