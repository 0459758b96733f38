use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Invalid URL '{url}' at index {index}: {source}")]
    InvalidUrl {
        url: String,
        index: usize,
        #[source]
        source: url::ParseError,
    },
    #[error("Failed to read URL file '{path}': {source}")]
    ReadUrlFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("URL file '{path}' was empty.")]
    UrlFileEmpty { path: PathBuf },
    #[error("URL file '{path}' has {available} URLs but the batch size needs {required}.")]
    UrlListTooShort {
        path: PathBuf,
        available: usize,
        required: usize,
    },
    #[error("URL index {index} is outside the list of {len} URLs.")]
    UrlIndexOutOfRange { index: usize, len: usize },
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
}
