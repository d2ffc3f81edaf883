//! Batching metrics
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! host application installs a recorder.

use std::time::Duration;

use metrics::{counter, histogram};

/// Record a request entering the pending queue
pub fn record_enqueue() {
    counter!("batcher_enqueued_total").increment(1);
}

/// Record a request answered from the cache
pub fn record_cache_hit() {
    counter!("batcher_cache_hits_total").increment(1);
}

/// Record a completed flush
pub fn record_flush(params: FlushMetricParams) {
    let labels = [(
        "status",
        if params.success { "success" } else { "error" }.to_string(),
    )];

    counter!("batcher_flushes_total", &labels).increment(1);
    histogram!("batcher_flush_duration_seconds", &labels).record(params.duration.as_secs_f64());
    histogram!("batcher_batch_size").record(params.batch_size as f64);

    if params.success {
        counter!("batcher_stored_keys_total").increment(params.stored as u64);
    } else {
        counter!("batcher_flush_errors_total").increment(1);
    }
}

/// Parameters for flush metrics
pub struct FlushMetricParams {
    pub batch_size: usize,
    pub stored: usize,
    pub duration: Duration,
    pub success: bool,
}
