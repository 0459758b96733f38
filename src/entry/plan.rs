use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::args::{BenchArgs, RunLabel};
use crate::bench::{LoadTestOrchestrator, RunParameters, RunSettings, check_run_signal};
use crate::error::AppResult;
use crate::http::{ClientSettings, ReqwestTransport, build_client};
use crate::shutdown::{request_shutdown, shutdown_channel};
use crate::shutdown_handlers::setup_signal_shutdown_handler;
use crate::sinks::{export_json, print_report};

/// Everything a run needs, validated before the runtime starts.
pub(super) struct BenchPlan {
    params: RunParameters,
    client: ClientSettings,
    settle: Duration,
    label: RunLabel,
    export_json: Option<String>,
}

impl BenchPlan {
    pub(super) fn from_args(args: &BenchArgs) -> AppResult<Self> {
        let params = RunSettings::from_args(args).validate().inspect_err(|err| {
            tracing::error!("Invalid run settings: {}", err);
        })?;
        let label = args
            .label
            .clone()
            .unwrap_or_else(|| RunLabel::static_source(params.is_static()));
        Ok(Self {
            params,
            client: ClientSettings::from_args(args),
            settle: args.settle,
            label,
            export_json: args.export_json.clone(),
        })
    }
}

pub(super) async fn execute_plan(plan: BenchPlan) -> AppResult<()> {
    let client = build_client(&plan.client)?;
    let transport = Arc::new(ReqwestTransport::new(client));
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    info!(
        "Running {} samples of {} requests at concurrency {}",
        plan.params.sample_count(),
        plan.params.batch_size(),
        plan.params.concurrency()
    );
    let orchestrator = LoadTestOrchestrator::new(plan.params.clone(), transport, shutdown_rx)
        .with_settle(plan.settle);
    let outcome = orchestrator.run().await;

    request_shutdown(&shutdown_tx);
    if let Err(err) = signal_handle.await {
        tracing::debug!("Signal handler ended abnormally: {}", err);
    }
    let result = outcome?;

    print_report(&result, &plan.label);
    if let Some(path) = plan.export_json.as_deref() {
        export_json(path, &result, &plan.params, &plan.label).await?;
        info!("Wrote JSON report to {}", path);
    }
    check_run_signal(&result)
}
