use std::time::Duration;

use reqwest::{Client, redirect};
use tracing::error;

use crate::{
    args::{BenchArgs, DEFAULT_USER_AGENT},
    error::{AppError, AppResult, HttpError},
};

/// Knobs for the HTTP client shared by every batch of a run.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub redirect_limit: u32,
    pub disable_keepalive: bool,
    pub insecure: bool,
}

impl ClientSettings {
    #[must_use]
    pub fn from_args(args: &BenchArgs) -> Self {
        Self {
            request_timeout: args.request_timeout,
            connect_timeout: args.connect_timeout,
            redirect_limit: args.redirect_limit,
            disable_keepalive: args.disable_keepalive,
            insecure: args.insecure,
        }
    }
}

/// Builds the pooled client. It carries no batch state, so one instance is
/// reused across samples for connection reuse.
///
/// # Errors
///
/// Returns an error when the TLS backend or client configuration is rejected.
pub fn build_client(settings: &ClientSettings) -> AppResult<Client> {
    let mut client_builder = Client::builder()
        .user_agent(DEFAULT_USER_AGENT)
        .timeout(settings.request_timeout)
        .connect_timeout(settings.connect_timeout);

    if settings.redirect_limit == 0 {
        client_builder = client_builder.redirect(redirect::Policy::none());
    } else {
        client_builder = client_builder.redirect(redirect::Policy::limited(
            usize::try_from(settings.redirect_limit).unwrap_or(10),
        ));
    }

    if settings.disable_keepalive {
        client_builder = client_builder
            .pool_max_idle_per_host(0)
            .pool_idle_timeout(Some(Duration::from_secs(0)));
    }

    if settings.insecure {
        client_builder = client_builder
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true);
    }

    client_builder.build().map_err(|err| {
        error!("Failed to build HTTP client: {}", err);
        AppError::http(HttpError::BuildClientFailed { source: err })
    })
}
