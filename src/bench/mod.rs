//! Load generation and sample statistics.
//!
//! A run is `sample_count` sequential batches. Each batch issues
//! `batch_size` GET requests with at most `concurrency` in flight and yields
//! one [`BatchResult`]. The slowest `trim_count` samples are dropped before
//! the mean and sample standard deviation of throughput are computed.
mod aggregate;
mod batch;
mod collector;
mod orchestrator;
mod params;
mod source;
mod types;

#[cfg(test)]
mod tests;

pub use aggregate::{SampleAggregator, ThroughputStats, trim_slowest};
pub use batch::BatchLoadRunner;
pub use collector::ErrorCollector;
pub use orchestrator::{LoadTestOrchestrator, check_run_signal};
pub use params::{RunParameters, RunSettings, UrlSourceSpec};
pub use source::UrlSource;
pub use types::{AggregateResult, BatchResult};
