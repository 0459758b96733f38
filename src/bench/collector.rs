use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::http::RequestOutcome;

/// Key under which non-2xx status reasons are recorded. Every HTTP error in
/// a batch writes the same key, so only the last reason survives. The value
/// is the standard phrase for the status code, not the phrase the server
/// sent, so a custom reason phrase is lost as well.
pub(crate) const STATUS_REASON_KEY: &str = "Reason";

/// Per-batch map from error signature to detail. Last write wins.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    entries: Mutex<BTreeMap<String, String>>,
}

impl ErrorCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, key: impl Into<String>, detail: impl Into<String>) {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.into(), detail.into());
    }

    /// Takes the collected entries, leaving the collector empty.
    #[must_use]
    pub fn drain(&self) -> BTreeMap<String, String> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *entries)
    }
}

/// Counters shared by the workers of one batch.
#[derive(Debug, Default)]
pub(crate) struct BatchTally {
    success: AtomicUsize,
    errors: AtomicUsize,
    bytes: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TallySnapshot {
    pub success: usize,
    pub errors: usize,
    pub bytes: u64,
}

impl BatchTally {
    pub(crate) fn record(&self, outcome: RequestOutcome, collector: &ErrorCollector) {
        match outcome {
            RequestOutcome::Success { bytes } => {
                self.bytes.fetch_add(bytes, Ordering::Relaxed);
                self.success.fetch_add(1, Ordering::Relaxed);
            }
            RequestOutcome::HttpStatus {
                status,
                reason,
                bytes,
            } => {
                debug!("Request returned HTTP {}: {}", status, reason);
                self.bytes.fetch_add(bytes, Ordering::Relaxed);
                self.errors.fetch_add(1, Ordering::Relaxed);
                // Known information loss: one shared key, canonical phrase only.
                collector.record(STATUS_REASON_KEY, reason);
            }
            RequestOutcome::Transport { message, detail } => {
                self.errors.fetch_add(1, Ordering::Relaxed);
                collector.record(message, detail);
            }
        }
    }

    pub(crate) fn snapshot(&self) -> TallySnapshot {
        TallySnapshot {
            success: self.success.load(Ordering::Acquire),
            errors: self.errors.load(Ordering::Acquire),
            bytes: self.bytes.load(Ordering::Acquire),
        }
    }
}
