//! Run report outputs: console table and JSON export.
mod console;
mod json;

pub use console::{print_report, report_lines};
pub use json::export_json;
