//! Post-conversion checks on the output directory.
//!
//! Nothing here fails the run: a missing file is reported, not raised.

use std::path::Path;

use onnxport_common::model::{FileReport, LabelSummary};
use serde_json::Value;
use tokio::fs;
use tracing::debug;

/// Checks each of `files` in `dir`, in order, recording its size if present.
///
/// Only regular files count as present: a directory carrying a required
/// file's name is reported missing, since it cannot be loaded as a model
/// artifact.
pub async fn verify_outputs(dir: &Path, files: &[&str]) -> Vec<FileReport> {
    let mut reports = Vec::with_capacity(files.len());

    for &name in files {
        let path = dir.join(name);
        let bytes = match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Some(meta.len()),
            Ok(_) => None,
            Err(e) => {
                debug!("{}: {e}", path.display());
                None
            }
        };
        reports.push(FileReport {
            name: name.to_string(),
            path,
            bytes,
        });
    }

    reports
}

/// Reads the `id2label` table of an exported `config.json`.
///
/// Returns `None` when the file is absent, unreadable, or has no usable table.
pub async fn read_labels(config_path: &Path) -> Option<LabelSummary> {
    let raw = fs::read(config_path).await.ok()?;
    let value: Value = serde_json::from_slice(&raw).ok()?;
    let table = value.get("id2label")?.as_object()?;

    let mut labels: Vec<(u64, String)> = table
        .iter()
        .filter_map(|(id, label)| Some((id.parse().ok()?, label.as_str()?.to_string())))
        .collect();

    if labels.is_empty() {
        return None;
    }

    labels.sort_by_key(|(id, _)| *id);
    Some(LabelSummary { labels })
}
