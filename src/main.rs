mod args;
mod bench;
mod config;
mod entry;
mod error;
mod http;
mod shutdown;
mod shutdown_handlers;
mod sinks;
mod system;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
