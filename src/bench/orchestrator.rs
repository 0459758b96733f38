use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::{AppError, AppResult, RunError};
use crate::http::Transport;
use crate::shutdown::{ShutdownReceiver, is_shutdown_requested, wait_for_shutdown};

use super::aggregate::SampleAggregator;
use super::batch::BatchLoadRunner;
use super::params::{RunParameters, RunSettings};
use super::source::UrlSource;
use super::types::AggregateResult;

/// Drives a full run: source resolution, settle pause, sequential samples.
pub struct LoadTestOrchestrator {
    params: RunParameters,
    transport: Arc<dyn Transport>,
    shutdown_rx: ShutdownReceiver,
    settle: Duration,
}

impl LoadTestOrchestrator {
    #[must_use]
    pub fn new(
        params: RunParameters,
        transport: Arc<dyn Transport>,
        shutdown_rx: ShutdownReceiver,
    ) -> Self {
        Self {
            params,
            transport,
            shutdown_rx,
            settle: Duration::ZERO,
        }
    }

    /// Validates `settings` and builds an orchestrator from the result.
    ///
    /// # Errors
    ///
    /// Returns the first validation rule the settings violate.
    pub fn from_settings(
        settings: &RunSettings,
        transport: Arc<dyn Transport>,
        shutdown_rx: ShutdownReceiver,
    ) -> AppResult<Self> {
        let params = settings.validate()?;
        Ok(Self::new(params, transport, shutdown_rx))
    }

    /// Idle time before the first sample.
    #[must_use]
    pub const fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Runs every sample and returns the trimmed aggregate.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL source can't be resolved, a batch URL is
    /// invalid, or shutdown is requested before the run completes.
    pub async fn run(&self) -> AppResult<AggregateResult> {
        let source = UrlSource::resolve(self.params.source(), self.params.batch_size()).await?;
        self.settle_pause().await?;

        let runner = BatchLoadRunner::new(Arc::clone(&self.transport), self.shutdown_rx.clone());
        let aggregator =
            SampleAggregator::new(self.params.sample_count(), self.params.trim_count());
        let concurrency = self.params.concurrency();
        let batch_size = self.params.batch_size();
        let sample_count = self.params.sample_count();

        let runner = &runner;
        let source = &source;
        let shutdown_rx = &self.shutdown_rx;
        aggregator
            .run(move |index| async move {
                if is_shutdown_requested(shutdown_rx) {
                    return Err(AppError::run(RunError::Cancelled));
                }
                let result = runner
                    .run_batch(
                        |slot| source.url_at(slot).map(str::to_owned),
                        concurrency,
                        batch_size,
                    )
                    .await?;
                if is_shutdown_requested(shutdown_rx) {
                    warn!("Shutdown requested during sample {}", index.saturating_add(1));
                    return Err(AppError::run(RunError::Cancelled));
                }
                info!(
                    "Sample {}/{}: {:.2} RPS, {} OK, {} errors, {} ms",
                    index.saturating_add(1),
                    sample_count,
                    result.throughput_rps,
                    result.success_count,
                    result.error_count,
                    result.total_elapsed_ms
                );
                Ok(result)
            })
            .await
    }

    async fn settle_pause(&self) -> AppResult<()> {
        if self.settle.is_zero() {
            return Ok(());
        }
        let mut shutdown_rx = self.shutdown_rx.clone();
        tokio::select! {
            biased;
            () = wait_for_shutdown(&mut shutdown_rx) => Err(AppError::run(RunError::Cancelled)),
            () = tokio::time::sleep(self.settle) => Ok(()),
        }
    }
}

/// Fails a run in which no retained sample had a single success.
///
/// # Errors
///
/// Returns [`RunError::AllRequestsFailed`] when the result carries no signal.
pub fn check_run_signal(result: &AggregateResult) -> AppResult<()> {
    if result.has_signal() {
        return Ok(());
    }
    Err(AppError::run(RunError::AllRequestsFailed {
        samples: result.samples.len(),
    }))
}
