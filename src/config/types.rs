use std::time::Duration;

use serde::Deserialize;

use crate::args::parse_duration_arg;
use crate::error::ValidationError;

/// Run settings as they appear in a config file. Every field is optional;
/// CLI flags take precedence over anything set here.
///
/// The PascalCase aliases accept settings files written for the older
/// harness (`UseStaticImage`, `ThreadCount`, ...).
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(alias = "UseStaticImage")]
    pub use_static_source: Option<bool>,
    #[serde(alias = "StaticImageURL", alias = "url")]
    pub static_url: Option<String>,
    #[serde(alias = "PathForURLs", alias = "url_file")]
    pub url_list_path: Option<String>,
    #[serde(alias = "SampleCount", alias = "samples")]
    pub sample_count: Option<i64>,
    #[serde(alias = "MinSamplesToRemove", alias = "trim")]
    pub trim_count: Option<i64>,
    #[serde(alias = "ThreadCount")]
    pub concurrency: Option<i64>,
    #[serde(alias = "BatchCount")]
    pub batch_size: Option<i64>,
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub redirect: Option<u32>,
    pub disable_keepalive: Option<bool>,
    pub insecure: Option<bool>,
    pub settle: Option<DurationValue>,
    pub label: Option<String>,
    pub export_json: Option<String>,
    pub no_color: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration_arg(text),
        }
    }
}
