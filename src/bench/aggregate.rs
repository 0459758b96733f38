use std::future::Future;

use serde::Serialize;
use tracing::info;

use crate::error::AppResult;

use super::types::{AggregateResult, BatchResult};

/// Mean and sample standard deviation of retained throughput values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThroughputStats {
    pub mean_rps: f64,
    /// `None` when fewer than two samples were retained.
    pub std_dev_rps: Option<f64>,
}

impl ThroughputStats {
    #[must_use]
    pub fn from_values(values: &[f64]) -> Self {
        let count = values.len();
        if count == 0 {
            return Self {
                mean_rps: 0.0,
                std_dev_rps: None,
            };
        }
        let count_f64 = count as f64;
        let mean = values.iter().sum::<f64>() / count_f64;
        let std_dev_rps = (count > 1).then(|| {
            let squares: f64 = values
                .iter()
                .map(|value| {
                    let delta = value - mean;
                    delta * delta
                })
                .sum();
            (squares / (count_f64 - 1.0)).sqrt()
        });
        Self {
            mean_rps: mean,
            std_dev_rps,
        }
    }
}

/// Removes the `trim_count` lowest-throughput samples, one at a time. On a
/// tie the earliest sample goes first. Returns the removed samples in
/// removal order; `samples` keeps its run order.
pub fn trim_slowest(samples: &mut Vec<BatchResult>, trim_count: usize) -> Vec<BatchResult> {
    let mut removed = Vec::with_capacity(trim_count.min(samples.len()));
    for _ in 0..trim_count {
        let slowest = samples
            .iter()
            .enumerate()
            .min_by(|(_, left), (_, right)| left.throughput_rps.total_cmp(&right.throughput_rps))
            .map(|(idx, _)| idx);
        let Some(idx) = slowest else {
            break;
        };
        removed.push(samples.remove(idx));
    }
    removed
}

impl AggregateResult {
    #[must_use]
    pub fn from_samples(mut samples: Vec<BatchResult>, trim_count: usize) -> Self {
        let discarded = trim_slowest(&mut samples, trim_count);
        let values: Vec<f64> = samples.iter().map(|sample| sample.throughput_rps).collect();
        let stats = ThroughputStats::from_values(&values);
        Self {
            samples,
            discarded,
            stats,
        }
    }
}

/// Runs batches sequentially and aggregates their throughput.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleAggregator {
    sample_count: usize,
    trim_count: usize,
}

impl SampleAggregator {
    /// Callers guarantee `trim_count < sample_count`.
    #[must_use]
    pub const fn new(sample_count: usize, trim_count: usize) -> Self {
        Self {
            sample_count,
            trim_count,
        }
    }

    /// Awaits `batch_fn(index)` once per sample, then trims and computes
    /// statistics.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `batch_fn`; remaining samples are
    /// not run.
    pub async fn run<F, Fut>(&self, mut batch_fn: F) -> AppResult<AggregateResult>
    where
        F: FnMut(usize) -> Fut,
        Fut: Future<Output = AppResult<BatchResult>>,
    {
        let mut samples = Vec::with_capacity(self.sample_count);
        for index in 0..self.sample_count {
            samples.push(batch_fn(index).await?);
        }
        let result = AggregateResult::from_samples(samples, self.trim_count);
        info!(
            "Retained {} samples, discarded {}",
            result.samples.len(),
            result.discarded.len()
        );
        Ok(result)
    }
}
