use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(
        "All requests failed across {samples} retained samples. Make sure the URLs are correct and the server is up."
    )]
    AllRequestsFailed { samples: usize },
    #[error("Run cancelled by shutdown request.")]
    Cancelled,
}
