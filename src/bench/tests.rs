use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use url::Url;

use super::*;
use crate::error::{AppError, AppResult, HttpError, RunError};
use crate::http::{RequestOutcome, Transport};
use crate::shutdown::{request_shutdown, shutdown_channel};

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

/// Answers by URL path: `/ok` succeeds, `/missing` is a 404, `/boom` a 500,
/// `/slow` times out, `/nxdomain` fails name resolution, anything else is a
/// refused connection.
struct RoutedTransport {
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl RoutedTransport {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for RoutedTransport {
    async fn get(&self, url: &Url) -> RequestOutcome {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match url.path() {
            "/ok" => RequestOutcome::Success { bytes: 2048 },
            "/missing" => RequestOutcome::HttpStatus {
                status: 404,
                reason: "Not Found".to_owned(),
                bytes: 9,
            },
            "/boom" => RequestOutcome::HttpStatus {
                status: 500,
                reason: "Internal Server Error".to_owned(),
                bytes: 5,
            },
            "/slow" => RequestOutcome::Transport {
                message: "operation timed out".to_owned(),
                detail: "timeout after 10s".to_owned(),
            },
            "/nxdomain" => RequestOutcome::Transport {
                message: "dns error".to_owned(),
                detail: "failed to lookup address information".to_owned(),
            },
            path => RequestOutcome::Transport {
                message: "connection refused".to_owned(),
                detail: format!("refused {}", path),
            },
        }
    }
}

/// Never answers within a test's lifetime.
struct StalledTransport;

#[async_trait]
impl Transport for StalledTransport {
    async fn get(&self, _url: &Url) -> RequestOutcome {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        RequestOutcome::Success { bytes: 0 }
    }
}

fn static_url(path: &'static str) -> impl Fn(usize) -> AppResult<String> {
    move |_| Ok(format!("http://bench.test{}", path))
}

fn runner_with(transport: Arc<dyn Transport>) -> BatchLoadRunner {
    let (_shutdown_tx, shutdown_rx) = shutdown_channel();
    BatchLoadRunner::new(transport, shutdown_rx)
}

#[test]
fn batch_counts_cover_every_request() -> Result<(), String> {
    run_async_test(async {
        let runner = runner_with(Arc::new(RoutedTransport::new(Duration::ZERO)));
        let paths = ["/ok", "/missing", "/ok", "/refused", "/ok"];
        let result = runner
            .run_batch(
                |idx| {
                    let path = paths.get(idx % paths.len()).copied().unwrap_or("/ok");
                    Ok(format!("http://bench.test{}", path))
                },
                3,
                25,
            )
            .await
            .map_err(|err| err.to_string())?;

        if result.success_count.saturating_add(result.error_count) != 25 {
            return Err(format!(
                "Counts don't add up: {} + {}",
                result.success_count, result.error_count
            ));
        }
        if result.success_count != 15 || result.error_count != 10 {
            return Err(format!("Unexpected split: {:?}", result));
        }
        // 15 successes * 2048 + 5 not-found bodies * 9.
        if result.total_bytes != 15 * 2048 + 5 * 9 {
            return Err(format!("Unexpected bytes: {}", result.total_bytes));
        }
        if result.concurrency != 3 || result.batch_size != 25 {
            return Err(format!("Unexpected shape: {:?}", result));
        }
        Ok(())
    })
}

#[test]
fn in_flight_requests_never_exceed_concurrency() -> Result<(), String> {
    run_async_test(async {
        let transport = Arc::new(RoutedTransport::new(Duration::from_millis(5)));
        let runner = runner_with(transport.clone());
        runner
            .run_batch(static_url("/ok"), 4, 30)
            .await
            .map_err(|err| err.to_string())?;

        let peak = transport.peak();
        if peak == 0 || peak > 4 {
            return Err(format!("Unexpected peak in-flight count: {}", peak));
        }
        Ok(())
    })
}

#[test]
fn concurrency_above_batch_size_is_capped() -> Result<(), String> {
    run_async_test(async {
        let transport = Arc::new(RoutedTransport::new(Duration::from_millis(5)));
        let runner = runner_with(transport.clone());
        let result = runner
            .run_batch(static_url("/ok"), 50, 3)
            .await
            .map_err(|err| err.to_string())?;
        if transport.peak() > 3 || result.success_count != 3 {
            return Err(format!(
                "Unexpected peak {} or result {:?}",
                transport.peak(),
                result
            ));
        }
        Ok(())
    })
}

#[test]
fn all_transport_failures_flag_the_run() -> Result<(), String> {
    run_async_test(async {
        let runner = runner_with(Arc::new(RoutedTransport::new(Duration::ZERO)));
        let result = runner
            .run_batch(static_url("/refused"), 2, 8)
            .await
            .map_err(|err| err.to_string())?;
        if result.success_count != 0 || result.error_count != 8 || result.total_bytes != 0 {
            return Err(format!("Unexpected result: {:?}", result));
        }
        if !result.errors.contains_key("connection refused") {
            return Err(format!("Missing transport signature: {:?}", result.errors));
        }

        let aggregate = AggregateResult::from_samples(vec![result.clone(), result], 1);
        match check_run_signal(&aggregate) {
            Err(AppError::Run(RunError::AllRequestsFailed { samples: 1 })) => Ok(()),
            other => Err(format!("Expected AllRequestsFailed, got {:?}", other)),
        }
    })
}

#[test]
fn status_reasons_collapse_under_one_key() -> Result<(), String> {
    run_async_test(async {
        let runner = runner_with(Arc::new(RoutedTransport::new(Duration::ZERO)));
        // One worker keeps the order deterministic: the 500 is recorded last.
        let result = runner
            .run_batch(
                |idx| {
                    let path = if idx == 0 { "/missing" } else { "/boom" };
                    Ok(format!("http://bench.test{}", path))
                },
                1,
                2,
            )
            .await
            .map_err(|err| err.to_string())?;
        if result.errors.len() != 1 {
            return Err(format!("Expected a single entry: {:?}", result.errors));
        }
        match result.errors.get("Reason") {
            Some(reason) if reason == "Internal Server Error" => Ok(()),
            other => Err(format!("Unexpected reason: {:?}", other)),
        }
    })
}

#[test]
fn transport_messages_keep_one_entry_each() -> Result<(), String> {
    run_async_test(async {
        let runner = runner_with(Arc::new(RoutedTransport::new(Duration::ZERO)));
        let paths = ["/refused", "/slow", "/nxdomain", "/missing", "/slow", "/refused", "/boom"];
        let result = runner
            .run_batch(
                |idx| {
                    let path = paths.get(idx).copied().unwrap_or("/ok");
                    Ok(format!("http://bench.test{}", path))
                },
                3,
                paths.len(),
            )
            .await
            .map_err(|err| err.to_string())?;

        if result.error_count != paths.len() || result.success_count != 0 {
            return Err(format!("Unexpected counts: {:?}", result));
        }
        let keys: Vec<&str> = result.errors.keys().map(String::as_str).collect();
        if keys != ["Reason", "connection refused", "dns error", "operation timed out"] {
            return Err(format!("Unexpected error keys: {:?}", keys));
        }
        if result.errors.get("operation timed out").map(String::as_str) != Some("timeout after 10s") {
            return Err(format!("Unexpected timeout detail: {:?}", result.errors));
        }
        Ok(())
    })
}

#[test]
fn invalid_url_aborts_before_any_request() -> Result<(), String> {
    run_async_test(async {
        let transport = Arc::new(RoutedTransport::new(Duration::ZERO));
        let runner = runner_with(transport.clone());
        let outcome = runner
            .run_batch(
                |idx| {
                    if idx == 2 {
                        Ok("not a url".to_owned())
                    } else {
                        Ok("http://bench.test/ok".to_owned())
                    }
                },
                2,
                4,
            )
            .await;
        match outcome {
            Err(AppError::Http(HttpError::InvalidUrl { index: 2, .. })) => {}
            other => return Err(format!("Expected InvalidUrl, got {:?}", other)),
        }
        if transport.peak() != 0 {
            return Err("No request should have been sent".to_owned());
        }
        Ok(())
    })
}

#[test]
fn shutdown_cancels_in_flight_and_pending_requests() -> Result<(), String> {
    run_async_test(async {
        let (shutdown_tx, shutdown_rx) = shutdown_channel();
        let runner = BatchLoadRunner::new(Arc::new(StalledTransport), shutdown_rx);
        let trigger = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            request_shutdown(&shutdown_tx);
        });

        let result = runner
            .run_batch(static_url("/ok"), 2, 6)
            .await
            .map_err(|err| err.to_string())?;
        trigger.await.map_err(|err| err.to_string())?;

        if result.success_count != 0 || result.error_count != 6 {
            return Err(format!("Unexpected counts: {:?}", result));
        }
        if !result.errors.contains_key("Request cancelled") {
            return Err(format!("Missing cancellation signature: {:?}", result.errors));
        }
        Ok(())
    })
}

fn static_settings(path: &str, samples: i64, trim: i64) -> RunSettings {
    RunSettings {
        use_static_source: Some(true),
        static_url: Some(format!("http://bench.test{}", path)),
        url_list_path: None,
        sample_count: samples,
        trim_count: trim,
        concurrency: 2,
        batch_size: 6,
    }
}

#[test]
fn orchestrator_runs_and_trims_samples() -> Result<(), String> {
    run_async_test(async {
        let (_shutdown_tx, shutdown_rx) = shutdown_channel();
        let orchestrator = LoadTestOrchestrator::from_settings(
            &static_settings("/ok", 4, 1),
            Arc::new(RoutedTransport::new(Duration::ZERO)),
            shutdown_rx,
        )
        .map_err(|err| err.to_string())?;

        let result = orchestrator.run().await.map_err(|err| err.to_string())?;
        if result.samples.len() != 3 || result.discarded.len() != 1 {
            return Err(format!(
                "Unexpected sample split: {} / {}",
                result.samples.len(),
                result.discarded.len()
            ));
        }
        if !result.has_signal() {
            return Err("Expected successful samples".to_owned());
        }
        check_run_signal(&result).map_err(|err| err.to_string())?;
        Ok(())
    })
}

#[test]
fn orchestrator_reads_url_list() -> Result<(), String> {
    run_async_test(async {
        let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
        for _ in 0..3 {
            writeln!(file, "http://bench.test/ok").map_err(|err| err.to_string())?;
            writeln!(file, "  http://bench.test/missing  ").map_err(|err| err.to_string())?;
        }
        let settings = RunSettings {
            use_static_source: Some(false),
            static_url: None,
            url_list_path: Some(file.path().to_string_lossy().into_owned()),
            ..static_settings("/ok", 2, 0)
        };

        let (_shutdown_tx, shutdown_rx) = shutdown_channel();
        let orchestrator = LoadTestOrchestrator::from_settings(
            &settings,
            Arc::new(RoutedTransport::new(Duration::ZERO)),
            shutdown_rx,
        )
        .map_err(|err| err.to_string())?;
        let result = orchestrator.run().await.map_err(|err| err.to_string())?;

        for sample in &result.samples {
            if sample.success_count != 3 || sample.error_count != 3 {
                return Err(format!("Unexpected sample: {:?}", sample));
            }
        }
        Ok(())
    })
}

#[test]
fn blank_list_line_fails_at_its_own_slot() -> Result<(), String> {
    run_async_test(async {
        let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
        write!(file, "http://bench.test/ok\n\nhttp://bench.test/missing\n")
            .map_err(|err| err.to_string())?;
        let settings = RunSettings {
            use_static_source: Some(false),
            url_list_path: Some(file.path().to_string_lossy().into_owned()),
            batch_size: 2,
            ..static_settings("/ok", 2, 0)
        };

        let (_shutdown_tx, shutdown_rx) = shutdown_channel();
        let transport = Arc::new(RoutedTransport::new(Duration::ZERO));
        let orchestrator =
            LoadTestOrchestrator::from_settings(&settings, transport.clone(), shutdown_rx)
                .map_err(|err| err.to_string())?;
        match orchestrator.run().await {
            Err(AppError::Http(HttpError::InvalidUrl { index: 1, .. })) => {}
            other => return Err(format!("Expected InvalidUrl at slot 1, got {:?}", other)),
        }
        if transport.peak() != 0 {
            return Err("No request should have been sent".to_owned());
        }
        Ok(())
    })
}

#[test]
fn orchestrator_rejects_short_url_list() -> Result<(), String> {
    run_async_test(async {
        let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
        writeln!(file, "http://bench.test/ok").map_err(|err| err.to_string())?;
        let settings = RunSettings {
            use_static_source: Some(false),
            url_list_path: Some(file.path().to_string_lossy().into_owned()),
            ..static_settings("/ok", 2, 0)
        };

        let (_shutdown_tx, shutdown_rx) = shutdown_channel();
        let transport = Arc::new(RoutedTransport::new(Duration::ZERO));
        let orchestrator =
            LoadTestOrchestrator::from_settings(&settings, transport.clone(), shutdown_rx)
                .map_err(|err| err.to_string())?;
        match orchestrator.run().await {
            Err(AppError::Http(HttpError::UrlListTooShort {
                available: 1,
                required: 6,
                ..
            })) => {}
            other => return Err(format!("Expected UrlListTooShort, got {:?}", other)),
        }
        if transport.peak() != 0 {
            return Err("No request should have been sent".to_owned());
        }
        Ok(())
    })
}

#[test]
fn orchestrator_rejects_invalid_settings() -> Result<(), String> {
    let (_shutdown_tx, shutdown_rx) = shutdown_channel();
    match LoadTestOrchestrator::from_settings(
        &static_settings("/ok", 5, 5),
        Arc::new(StalledTransport),
        shutdown_rx,
    ) {
        Err(AppError::Validation(_)) => Ok(()),
        Err(other) => Err(format!("Unexpected error: {}", other)),
        Ok(_) => Err("Expected validation to fail".to_owned()),
    }
}

#[test]
fn shutdown_during_settle_cancels_run() -> Result<(), String> {
    run_async_test(async {
        let (shutdown_tx, shutdown_rx) = shutdown_channel();
        let transport = Arc::new(RoutedTransport::new(Duration::ZERO));
        let orchestrator = LoadTestOrchestrator::from_settings(
            &static_settings("/ok", 3, 0),
            transport.clone(),
            shutdown_rx,
        )
        .map_err(|err| err.to_string())?
        .with_settle(Duration::from_secs(3600));
        request_shutdown(&shutdown_tx);

        match orchestrator.run().await {
            Err(err) if err.is_cancelled() => {}
            other => return Err(format!("Expected cancellation, got {:?}", other)),
        }
        if transport.peak() != 0 {
            return Err("No request should have been sent".to_owned());
        }
        Ok(())
    })
}
