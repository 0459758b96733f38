//! Core library for the `urlbench` CLI.
//!
//! `urlbench` measures HTTP GET throughput: it runs a number of fixed-size
//! request batches with bounded concurrency, drops the slowest batches and
//! reports the mean requests-per-second with its standard deviation. The
//! modules here are the building blocks of the binary: CLI argument types,
//! configuration loading, the request transport, the batch engine and the
//! report sinks.
pub mod args;
pub mod bench;
pub mod config;
pub mod error;
pub mod http;
pub mod shutdown;
pub mod sinks;
