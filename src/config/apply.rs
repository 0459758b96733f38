use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{BenchArgs, SourceKind, parse_label};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::{ConfigFile, DurationValue};

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn to_duration(value: &DurationValue, field: &'static str) -> AppResult<std::time::Duration> {
    value
        .to_duration()
        .map_err(|err| AppError::config(ConfigError::InvalidDuration { field, source: err }))
}

/// Applies configuration values to CLI arguments that were not given on the
/// command line.
///
/// # Errors
///
/// Returns an error when a config value cannot be parsed.
pub fn apply_config(
    args: &mut BenchArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "source")
        && let Some(use_static) = config.use_static_source
    {
        args.source = Some(if use_static {
            SourceKind::Static
        } else {
            SourceKind::List
        });
    }

    if !is_cli(matches, "url")
        && let Some(url) = config.static_url.clone()
    {
        args.url = Some(url);
    }

    if !is_cli(matches, "url_file")
        && let Some(path) = config.url_list_path.clone()
    {
        args.url_file = Some(path);
    }

    if !is_cli(matches, "sample_count")
        && let Some(value) = config.sample_count
    {
        args.sample_count = value;
    }

    if !is_cli(matches, "trim_count")
        && let Some(value) = config.trim_count
    {
        args.trim_count = value;
    }

    if !is_cli(matches, "concurrency")
        && let Some(value) = config.concurrency
    {
        args.concurrency = value;
    }

    if !is_cli(matches, "batch_size")
        && let Some(value) = config.batch_size
    {
        args.batch_size = value;
    }

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = to_duration(timeout, "timeout")?;
    }

    if !is_cli(matches, "connect_timeout")
        && let Some(timeout) = config.connect_timeout.as_ref()
    {
        args.connect_timeout = to_duration(timeout, "connect_timeout")?;
    }

    if !is_cli(matches, "redirect_limit")
        && let Some(limit) = config.redirect
    {
        args.redirect_limit = limit;
    }

    if !is_cli(matches, "disable_keepalive")
        && let Some(value) = config.disable_keepalive
    {
        args.disable_keepalive = value;
    }

    if !is_cli(matches, "insecure")
        && let Some(value) = config.insecure
    {
        args.insecure = value;
    }

    if !is_cli(matches, "settle")
        && let Some(settle) = config.settle.as_ref()
    {
        args.settle = to_duration(settle, "settle")?;
    }

    if !is_cli(matches, "label")
        && let Some(label) = config.label.as_deref()
    {
        args.label = Some(
            parse_label(label)
                .map_err(|err| AppError::config(ConfigError::InvalidLabel { source: err }))?,
        );
    }

    if !is_cli(matches, "export_json")
        && let Some(path) = config.export_json.clone()
    {
        args.export_json = Some(path);
    }

    if !is_cli(matches, "no_color")
        && let Some(value) = config.no_color
    {
        args.no_color = value;
    }

    Ok(())
}
