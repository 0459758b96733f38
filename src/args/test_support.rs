use clap::Parser;

use crate::error::{AppError, AppResult};

use super::BenchArgs;

pub(crate) fn parse_test_args<I, T>(args: I) -> AppResult<BenchArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    BenchArgs::try_parse_from(args).map_err(AppError::from)
}
