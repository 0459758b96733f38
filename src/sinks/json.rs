use std::path::Path;

use tokio::io::{AsyncWriteExt, BufWriter};

use crate::args::RunLabel;
use crate::bench::{AggregateResult, RunParameters};
use crate::error::{AppError, AppResult, SinkError};

fn report_document(
    result: &AggregateResult,
    params: &RunParameters,
    label: &RunLabel,
) -> serde_json::Value {
    serde_json::json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "label": label,
        "parameters": params,
        "stats": result.stats,
        "samples": result.samples,
        "discarded": result.discarded,
    })
}

/// Writes the aggregated run as pretty-printed JSON to `path`.
///
/// # Errors
///
/// Returns an error if serialization fails or the file can't be written.
pub async fn export_json(
    path: &str,
    result: &AggregateResult,
    params: &RunParameters,
    label: &RunLabel,
) -> AppResult<()> {
    let document = report_document(result, params, label);
    let json = serde_json::to_vec_pretty(&document)
        .map_err(|source| AppError::sink(SinkError::Serialize { source }))?;

    let write_error = |source: std::io::Error| {
        AppError::sink(SinkError::Write {
            path: Path::new(path).to_path_buf(),
            source,
        })
    };
    let file = tokio::fs::File::create(path).await.map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&json).await.map_err(write_error)?;
    writer.write_all(b"\n").await.map_err(write_error)?;
    writer.flush().await.map_err(write_error)?;
    Ok(())
}
