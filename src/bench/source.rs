use std::path::Path;

use crate::error::{AppError, AppResult, HttpError};

use super::params::UrlSourceSpec;

/// Resolved URL source. Slot `i` of every batch requests `url_at(i)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlSource {
    Static(String),
    List(Vec<String>),
}

impl UrlSource {
    /// Loads the list file when needed and checks it covers a whole batch.
    ///
    /// # Errors
    ///
    /// Returns an error when the file can't be read, holds no URLs, or holds
    /// fewer URLs than `batch_size`.
    pub async fn resolve(origin: &UrlSourceSpec, batch_size: usize) -> AppResult<Self> {
        match origin {
            UrlSourceSpec::Static(url) => Ok(Self::Static(url.clone())),
            UrlSourceSpec::File(path) => {
                let content = tokio::fs::read_to_string(path).await.map_err(|source| {
                    AppError::http(HttpError::ReadUrlFile {
                        path: path.clone(),
                        source,
                    })
                })?;
                Self::from_lines(path, &content, batch_size)
            }
        }
    }

    fn from_lines(path: &Path, content: &str, batch_size: usize) -> AppResult<Self> {
        // Blank lines keep their slot so a malformed list fails URL parsing at
        // the right index instead of shifting later targets.
        let urls: Vec<String> = content
            .lines()
            .map(|line| line.trim().to_owned())
            .collect();

        if urls.iter().all(String::is_empty) {
            return Err(AppError::http(HttpError::UrlFileEmpty {
                path: path.to_path_buf(),
            }));
        }
        if urls.len() < batch_size {
            return Err(AppError::http(HttpError::UrlListTooShort {
                path: path.to_path_buf(),
                available: urls.len(),
                required: batch_size,
            }));
        }
        Ok(Self::List(urls))
    }

    /// URL for batch slot `index`.
    ///
    /// # Errors
    ///
    /// Returns an error when a list source has no line at `index`.
    pub fn url_at(&self, index: usize) -> AppResult<&str> {
        match self {
            Self::Static(url) => Ok(url),
            Self::List(urls) => urls.get(index).map(String::as_str).ok_or_else(|| {
                AppError::http(HttpError::UrlIndexOutOfRange {
                    index,
                    len: urls.len(),
                })
            }),
        }
    }
}
