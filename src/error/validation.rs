use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("static_url can't be empty in static mode.")]
    StaticUrlEmpty,
    #[error("url_file doesn't exist: {path}")]
    UrlFileMissing { path: PathBuf },
    #[error("url_file must be set when not using a static URL.")]
    UrlFileUnset,
    #[error("sample_count must be positive: {value}")]
    SampleCountNotPositive { value: i64 },
    #[error("concurrency must be positive: {value}")]
    ConcurrencyNotPositive { value: i64 },
    #[error("batch_size must be positive: {value}")]
    BatchSizeNotPositive { value: i64 },
    #[error("trim_count must be zero or positive: {value}")]
    TrimCountNegative { value: i64 },
    #[error("trim_count ({trim}) must be less than sample_count ({samples}).")]
    TrimCountNotBelowSamples { trim: i64, samples: i64 },
    #[error("{field} is too large for this platform: {value}")]
    CountOutOfRange { field: &'static str, value: i64 },
    #[error("Invalid label '{value}'. Expected 'Name=Value'.")]
    InvalidLabel { value: String },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Invalid boolean '{value}'. Expected true/false, yes/no, on/off, or 1/0.")]
    InvalidBoolean { value: String },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
