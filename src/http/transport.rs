use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use url::Url;

/// Signature recorded for requests dropped by a shutdown request.
pub(crate) const CANCELLED_MESSAGE: &str = "Request cancelled";

/// Classified result of a single GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The server answered with a 2xx status and the body was read in full.
    Success { bytes: u64 },
    /// The server answered with a non-2xx status; the body was still drained.
    HttpStatus {
        status: u16,
        reason: String,
        bytes: u64,
    },
    /// No complete response: connect/DNS/TLS failure, timeout, body read
    /// failure or cancellation.
    Transport { message: String, detail: String },
}

impl RequestOutcome {
    pub(crate) fn cancelled() -> Self {
        RequestOutcome::Transport {
            message: CANCELLED_MESSAGE.to_owned(),
            detail: "shutdown requested before the response completed".to_owned(),
        }
    }

    fn from_error(err: &reqwest::Error) -> Self {
        RequestOutcome::Transport {
            message: err.to_string(),
            detail: format!("{:?}", err),
        }
    }

    fn from_status(status: StatusCode, bytes: u64) -> Self {
        if status.is_success() {
            return RequestOutcome::Success { bytes };
        }
        let reason = status
            .canonical_reason()
            .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_owned);
        RequestOutcome::HttpStatus {
            status: status.as_u16(),
            reason,
            bytes,
        }
    }
}

/// Issues one GET and classifies the result. Implementations must never
/// fail the batch: every failure is folded into the returned outcome.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> RequestOutcome;
}

/// Production transport backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &Url) -> RequestOutcome {
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(err) => return RequestOutcome::from_error(&err),
        };
        let status = response.status();
        match drain_response_body(response).await {
            Ok(bytes) => RequestOutcome::from_status(status, bytes),
            Err(err) => RequestOutcome::from_error(&err),
        }
    }
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
