mod app;
mod config;
mod http;
mod run;
mod sink;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use http::HttpError;
pub use run::RunError;
pub use sink::SinkError;
pub use validation::ValidationError;
