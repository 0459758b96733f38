use clap::Parser;
use std::time::Duration;

use super::defaults::{
    DEFAULT_BATCH_SIZE, DEFAULT_CONCURRENCY, DEFAULT_REDIRECT_LIMIT, DEFAULT_SAMPLES, DEFAULT_TRIM,
};
use super::parsers::{parse_bool_env, parse_duration_arg, parse_label};
use super::types::{RunLabel, SourceKind};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "HTTP throughput micro-benchmark: runs bounded-concurrency request batches, drops the slowest samples, and reports mean RPS with its standard deviation."
)]
pub struct BenchArgs {
    /// Static target URL requested by every slot of a batch
    #[arg(long, short)]
    pub url: Option<String>,

    /// File with one URL per line; slot i of each batch requests line i
    #[arg(long = "url-file", short = 'f')]
    pub url_file: Option<String>,

    /// URL source (defaults to static when --url is set, list otherwise)
    #[arg(long = "source", value_enum)]
    pub source: Option<SourceKind>,

    /// Number of batches (samples) to run
    #[arg(
        long = "samples",
        short = 's',
        default_value_t = DEFAULT_SAMPLES,
        allow_negative_numbers = true
    )]
    pub sample_count: i64,

    /// Number of slowest samples to discard before computing statistics
    #[arg(long = "trim", default_value_t = DEFAULT_TRIM, allow_negative_numbers = true)]
    pub trim_count: i64,

    /// Maximum number of requests in flight within a batch
    #[arg(
        long = "concurrency",
        short = 'c',
        default_value_t = DEFAULT_CONCURRENCY,
        allow_negative_numbers = true
    )]
    pub concurrency: i64,

    /// Number of requests per batch
    #[arg(
        long = "batch-size",
        short = 'n',
        default_value_t = DEFAULT_BATCH_SIZE,
        allow_negative_numbers = true
    )]
    pub batch_size: i64,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(long = "timeout", default_value = "10s", value_parser = parse_duration_arg)]
    pub request_timeout: Duration,

    /// Connect timeout (supports ms/s/m/h)
    #[arg(long = "connect-timeout", default_value = "5s", value_parser = parse_duration_arg)]
    pub connect_timeout: Duration,

    /// Maximum redirects to follow (0 disables redirects)
    #[arg(long = "redirect", default_value_t = DEFAULT_REDIRECT_LIMIT)]
    pub redirect_limit: u32,

    /// Disable connection reuse between requests
    #[arg(long = "disable-keepalive")]
    pub disable_keepalive: bool,

    /// Accept invalid TLS certificates and hostnames
    #[arg(long = "insecure")]
    pub insecure: bool,

    /// Idle pause before the first sample (supports ms/s/m/h, 0 disables)
    #[arg(long = "settle", default_value = "300ms", value_parser = parse_duration_arg)]
    pub settle: Duration,

    /// First report column as 'Name=Value' (defaults to 'Static URL=Yes|No')
    #[arg(long = "label", value_parser = parse_label)]
    pub label: Option<RunLabel>,

    /// Write the aggregated result as JSON to this path
    #[arg(long = "export-json")]
    pub export_json: Option<String>,

    /// Path to config file (TOML/JSON). Defaults to ./urlbench.toml, ./urlbench.json or ./appsettings.json if present.
    #[arg(long)]
    pub config: Option<String>,

    /// Enable verbose logging (sets log level to debug unless overridden by URLBENCH_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}
