pub(crate) const DEFAULT_USER_AGENT: &str = concat!("urlbench/", env!("CARGO_PKG_VERSION"));

/// Config filenames checked in the working directory when `--config` is absent.
pub(crate) const DEFAULT_CONFIG_FILES: [&str; 3] =
    ["urlbench.toml", "urlbench.json", "appsettings.json"];

pub(super) const DEFAULT_SAMPLES: i64 = 5;
pub(super) const DEFAULT_TRIM: i64 = 1;
pub(super) const DEFAULT_CONCURRENCY: i64 = 10;
pub(super) const DEFAULT_BATCH_SIZE: i64 = 100;
pub(super) const DEFAULT_REDIRECT_LIMIT: u32 = 10;
