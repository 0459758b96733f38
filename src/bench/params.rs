use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::args::{BenchArgs, SourceKind};
use crate::error::ValidationError;

/// Where batch URLs come from once settings are validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "location", rename_all = "lowercase")]
pub enum UrlSourceSpec {
    Static(String),
    File(PathBuf),
}

/// Unvalidated run settings, as merged from config file and CLI.
///
/// Counts are signed so that negative values from a config file reach
/// [`RunSettings::validate`] and get a precise diagnostic.
#[derive(Debug, Clone, Default)]
pub struct RunSettings {
    pub use_static_source: Option<bool>,
    pub static_url: Option<String>,
    pub url_list_path: Option<String>,
    pub sample_count: i64,
    pub trim_count: i64,
    pub concurrency: i64,
    pub batch_size: i64,
}

impl RunSettings {
    #[must_use]
    pub fn from_args(args: &BenchArgs) -> Self {
        Self {
            use_static_source: args.source.map(SourceKind::is_static),
            static_url: args.url.clone(),
            url_list_path: args.url_file.clone(),
            sample_count: args.sample_count,
            trim_count: args.trim_count,
            concurrency: args.concurrency,
            batch_size: args.batch_size,
        }
    }

    /// Static mode unless told otherwise or no static URL was given.
    #[must_use]
    pub fn uses_static_source(&self) -> bool {
        self.use_static_source
            .unwrap_or(self.static_url.is_some())
    }

    /// Checks the settings in a fixed order and stops at the first failure:
    /// source, sample count, concurrency, batch size, trim sign, trim bound.
    ///
    /// # Errors
    ///
    /// Returns the first rule the settings violate.
    pub fn validate(&self) -> Result<RunParameters, ValidationError> {
        let source = self.validate_source()?;

        if self.sample_count <= 0 {
            return Err(ValidationError::SampleCountNotPositive {
                value: self.sample_count,
            });
        }
        if self.concurrency <= 0 {
            return Err(ValidationError::ConcurrencyNotPositive {
                value: self.concurrency,
            });
        }
        if self.batch_size <= 0 {
            return Err(ValidationError::BatchSizeNotPositive {
                value: self.batch_size,
            });
        }
        if self.trim_count < 0 {
            return Err(ValidationError::TrimCountNegative {
                value: self.trim_count,
            });
        }
        if self.trim_count >= self.sample_count {
            return Err(ValidationError::TrimCountNotBelowSamples {
                trim: self.trim_count,
                samples: self.sample_count,
            });
        }

        Ok(RunParameters {
            source,
            sample_count: to_count("sample_count", self.sample_count)?,
            trim_count: to_count("trim_count", self.trim_count)?,
            concurrency: to_count("concurrency", self.concurrency)?,
            batch_size: to_count("batch_size", self.batch_size)?,
        })
    }

    fn validate_source(&self) -> Result<UrlSourceSpec, ValidationError> {
        if self.uses_static_source() {
            return self
                .static_url
                .as_deref()
                .filter(|url| !url.trim().is_empty())
                .map(|url| UrlSourceSpec::Static(url.to_owned()))
                .ok_or(ValidationError::StaticUrlEmpty);
        }

        let path = self
            .url_list_path
            .as_deref()
            .filter(|path| !path.trim().is_empty())
            .ok_or(ValidationError::UrlFileUnset)?;
        if !Path::new(path).is_file() {
            return Err(ValidationError::UrlFileMissing {
                path: PathBuf::from(path),
            });
        }
        Ok(UrlSourceSpec::File(PathBuf::from(path)))
    }
}

fn to_count(field: &'static str, value: i64) -> Result<usize, ValidationError> {
    usize::try_from(value).map_err(|_err| ValidationError::CountOutOfRange { field, value })
}

/// Validated, immutable parameters of one run. Only
/// [`RunSettings::validate`] constructs it, so `0 <= trim_count <
/// sample_count` and all other counts are positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunParameters {
    source: UrlSourceSpec,
    sample_count: usize,
    trim_count: usize,
    concurrency: usize,
    batch_size: usize,
}

impl RunParameters {
    #[must_use]
    pub const fn source(&self) -> &UrlSourceSpec {
        &self.source
    }

    #[must_use]
    pub const fn is_static(&self) -> bool {
        matches!(self.source, UrlSourceSpec::Static(_))
    }

    #[must_use]
    pub const fn sample_count(&self) -> usize {
        self.sample_count
    }

    #[must_use]
    pub const fn trim_count(&self) -> usize {
        self.trim_count
    }

    #[must_use]
    pub const fn concurrency(&self) -> usize {
        self.concurrency
    }

    #[must_use]
    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }
}
