use crate::args::RunLabel;
use crate::bench::{AggregateResult, BatchResult};

const HEADERS: [&str; 9] = [
    "RPS",
    "Threads",
    "BatchSize",
    "OK",
    "Error",
    "TotalMB",
    "AvgKb",
    "AvgMs",
    "TotalMs",
];

fn row(cells: impl IntoIterator<Item = String>) -> String {
    cells
        .into_iter()
        .map(|cell| format!("{:<10}", cell))
        .collect::<Vec<_>>()
        .join("\t")
}

fn sample_row(label: &RunLabel, sample: &BatchResult) -> String {
    row([
        label.value.clone(),
        format!("{:.0}", sample.throughput_rps),
        sample.concurrency.to_string(),
        sample.batch_size.to_string(),
        sample.success_count.to_string(),
        sample.error_count.to_string(),
        format!("{:.2}", sample.total_mb()),
        format!("{:.1}", sample.avg_response_kb),
        sample.avg_latency_ms.to_string(),
        sample.total_elapsed_ms.to_string(),
    ])
}

/// Renders the report: header, one row per retained sample, the throughput
/// summary, then each retained sample's errors.
#[must_use]
pub fn report_lines(result: &AggregateResult, label: &RunLabel) -> Vec<String> {
    let mut lines = Vec::with_capacity(result.samples.len().saturating_add(3));
    lines.push(row(std::iter::once(label.name.clone())
        .chain(HEADERS.iter().map(|header| (*header).to_owned()))));
    lines.extend(result.samples.iter().map(|sample| sample_row(label, sample)));

    let std_dev = result
        .stats
        .std_dev_rps
        .map_or_else(|| "n/a (insufficient data)".to_owned(), |value| format!("{:.0}", value));
    lines.push(format!("Avg RPS:\t{:.0} ± {}", result.stats.mean_rps, std_dev));
    lines.push(format!("Discarded slowest samples: {}", result.discarded.len()));

    for sample in &result.samples {
        for (key, value) in &sample.errors {
            lines.push(format!("{}: {}", key, value));
        }
    }
    lines
}

pub fn print_report(result: &AggregateResult, label: &RunLabel) {
    for line in report_lines(result, label) {
        println!("{}", line);
    }
}
