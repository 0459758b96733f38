//! HTTP client construction and the request transport used by batches.
mod client;
mod transport;


pub use client::{ClientSettings, build_client};
pub use transport::{ReqwestTransport, RequestOutcome, Transport};
