use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::debug;
use url::Url;

use crate::error::{AppError, AppResult, HttpError};
use crate::http::{RequestOutcome, Transport};
use crate::shutdown::{ShutdownReceiver, is_shutdown_requested, wait_for_shutdown};

use super::collector::{BatchTally, ErrorCollector};
use super::types::{BatchMeasurement, BatchResult};

/// Parsed batch URLs handed out once each to the worker pool.
#[derive(Debug)]
struct UrlQueue {
    urls: Vec<Url>,
    cursor: AtomicUsize,
}

impl UrlQueue {
    const fn new(urls: Vec<Url>) -> Self {
        Self {
            urls,
            cursor: AtomicUsize::new(0),
        }
    }

    fn next(&self) -> Option<&Url> {
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.urls.get(idx)
    }
}

/// Shared state of one batch. Lives exactly as long as the batch.
struct BatchContext {
    queue: UrlQueue,
    tally: BatchTally,
    collector: ErrorCollector,
    transport: Arc<dyn Transport>,
}

/// Runs one batch of GET requests with bounded concurrency.
#[derive(Clone)]
pub struct BatchLoadRunner {
    transport: Arc<dyn Transport>,
    shutdown_rx: ShutdownReceiver,
}

impl BatchLoadRunner {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, shutdown_rx: ShutdownReceiver) -> Self {
        Self {
            transport,
            shutdown_rx,
        }
    }

    /// Issues `batch_size` requests, slot `i` targeting `url_at(i)`, with at
    /// most `concurrency` in flight.
    ///
    /// Per-request failures are counted, never returned. Requests dropped or
    /// skipped by a shutdown request count as errors, so
    /// `success_count + error_count == batch_size` always holds.
    ///
    /// # Errors
    ///
    /// Returns an error when `url_at` fails or yields an unparsable URL. No
    /// request is sent in that case.
    pub async fn run_batch<F>(
        &self,
        url_at: F,
        concurrency: usize,
        batch_size: usize,
    ) -> AppResult<BatchResult>
    where
        F: Fn(usize) -> AppResult<String>,
    {
        let urls = materialize_urls(&url_at, batch_size)?;
        let context = Arc::new(BatchContext {
            queue: UrlQueue::new(urls),
            tally: BatchTally::default(),
            collector: ErrorCollector::new(),
            transport: Arc::clone(&self.transport),
        });

        let workers = concurrency.min(batch_size).max(1);
        let start = Instant::now();
        let mut handles = JoinSet::new();
        for _ in 0..workers {
            handles.spawn(drain_queue(Arc::clone(&context), self.shutdown_rx.clone()));
        }
        while let Some(joined) = handles.join_next().await {
            joined?;
        }
        let elapsed = start.elapsed();

        let tally = context.tally.snapshot();
        Ok(BatchResult::from_measurement(BatchMeasurement {
            concurrency,
            batch_size,
            success_count: tally.success,
            error_count: tally.errors,
            total_bytes: tally.bytes,
            elapsed,
            errors: context.collector.drain(),
        }))
    }
}

fn materialize_urls<F>(url_at: &F, batch_size: usize) -> AppResult<Vec<Url>>
where
    F: Fn(usize) -> AppResult<String>,
{
    (0..batch_size)
        .map(|index| {
            let raw = url_at(index)?;
            Url::parse(&raw).map_err(|source| {
                AppError::http(HttpError::InvalidUrl {
                    url: raw,
                    index,
                    source,
                })
            })
        })
        .collect()
}

async fn drain_queue(context: Arc<BatchContext>, mut shutdown_rx: ShutdownReceiver) {
    while let Some(url) = context.queue.next() {
        let outcome = if is_shutdown_requested(&shutdown_rx) {
            RequestOutcome::cancelled()
        } else {
            tokio::select! {
                biased;
                () = wait_for_shutdown(&mut shutdown_rx) => RequestOutcome::cancelled(),
                outcome = context.transport.get(url) => outcome,
            }
        };
        if let RequestOutcome::Transport { message, .. } = &outcome {
            debug!("GET {} failed: {}", url, message);
        }
        context.tally.record(outcome, &context.collector);
    }
}
