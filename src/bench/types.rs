use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use super::aggregate::ThroughputStats;

const BYTES_PER_KB: f64 = 1024.0;
const BYTES_PER_MB: f64 = 1_048_576.0;
pub(crate) const MIN_ELAPSED: Duration = Duration::from_micros(1);

/// Measurement of one batch. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    pub throughput_rps: f64,
    pub concurrency: usize,
    pub batch_size: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub total_bytes: u64,
    pub avg_response_kb: f64,
    pub avg_latency_ms: u64,
    pub total_elapsed_ms: u64,
    pub errors: BTreeMap<String, String>,
}

/// Raw counters of a finished batch.
#[derive(Debug, Clone)]
pub(crate) struct BatchMeasurement {
    pub concurrency: usize,
    pub batch_size: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub total_bytes: u64,
    pub elapsed: Duration,
    pub errors: BTreeMap<String, String>,
}

impl BatchResult {
    pub(crate) fn from_measurement(measurement: BatchMeasurement) -> Self {
        let elapsed = measurement.elapsed.max(MIN_ELAPSED);
        let batch_size = measurement.batch_size.max(1);
        let batch_size_u64 = u64::try_from(batch_size).unwrap_or(u64::MAX);
        let batch_size_f64 = batch_size_u64 as f64;

        let total_elapsed_ms = u64::try_from(measurement.elapsed.as_millis()).unwrap_or(u64::MAX);
        let avg_bytes = measurement
            .total_bytes
            .checked_div(batch_size_u64)
            .unwrap_or(0);

        Self {
            throughput_rps: batch_size_f64 / elapsed.as_secs_f64(),
            concurrency: measurement.concurrency,
            batch_size: measurement.batch_size,
            success_count: measurement.success_count,
            error_count: measurement.error_count,
            total_bytes: measurement.total_bytes,
            avg_response_kb: avg_bytes as f64 / BYTES_PER_KB,
            avg_latency_ms: total_elapsed_ms.checked_div(batch_size_u64).unwrap_or(0),
            total_elapsed_ms,
            errors: measurement.errors,
        }
    }

    #[must_use]
    pub fn total_mb(&self) -> f64 {
        self.total_bytes as f64 / BYTES_PER_MB
    }

    #[must_use]
    pub const fn has_success(&self) -> bool {
        self.success_count > 0
    }
}

/// Retained samples plus throughput statistics for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    /// Retained samples in run order.
    pub samples: Vec<BatchResult>,
    /// Trimmed samples in removal order.
    pub discarded: Vec<BatchResult>,
    pub stats: ThroughputStats,
}

impl AggregateResult {
    /// True when at least one retained sample had a successful request.
    #[must_use]
    pub fn has_signal(&self) -> bool {
        self.samples.iter().any(BatchResult::has_success)
    }
}
