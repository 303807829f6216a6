//! Adapter for the optimum ONNX exporter.
//!
//! The exporter downloads the checkpoint from the hub, traces it and writes
//! `model.onnx` plus its configuration. It runs in a private staging
//! directory so a failed export never touches the output directory.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::Context;
use async_trait::async_trait;
use onnxport_common::config::EXPORT_TASK;
use onnxport_common::error::ConvertError;
use onnxport_common::model::ModelId;
use onnxport_common::toolchain::{ModelExporter, Pretrained};
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, info};

use crate::artifacts;

const EXPORTER_MODULE: &str = "optimum.exporters.onnx";
const STDERR_TAIL_LINES: usize = 8;

pub struct OptimumExporter {
    python: PathBuf,
    task: String,
}

impl OptimumExporter {
    pub fn new(python: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
            task: EXPORT_TASK.to_string(),
        }
    }

    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.task = task.into();
        self
    }
}

#[async_trait]
impl ModelExporter for OptimumExporter {
    async fn export(&self, model_id: &ModelId) -> anyhow::Result<Box<dyn Pretrained>> {
        let staging = tempfile::Builder::new()
            .prefix("onnxport-")
            .tempdir()
            .context("failed to create staging directory")?;

        info!("exporting {model_id} ({}) with {}", self.task, self.python.display());

        let output = Command::new(&self.python)
            .arg("-m")
            .arg(EXPORTER_MODULE)
            .arg("--model")
            .arg(model_id.as_str())
            .arg("--task")
            .arg(&self.task)
            .arg(staging.path())
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| ConvertError::InterpreterSpawn {
                interpreter: self.python.display().to_string(),
                source,
            })?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!(target: "onnxport::exporter", "{line}");
        }

        if !output.status.success() {
            return Err(ConvertError::ExporterFailed {
                status: output.status,
                stderr: stderr_tail(&output.stderr, STDERR_TAIL_LINES),
            }
            .into());
        }

        let files = artifacts::list_files(staging.path()).await?;
        if files.is_empty() {
            return Err(ConvertError::EmptyExport(staging.path().to_path_buf()).into());
        }

        Ok(Box::new(ExportedOnnx {
            _staging: staging,
            files,
        }))
    }
}

/// Exported model held in its staging directory until saved.
/// The directory is removed when this is dropped.
pub struct ExportedOnnx {
    _staging: TempDir,
    files: Vec<PathBuf>,
}

#[async_trait]
impl Pretrained for ExportedOnnx {
    async fn save_pretrained(&self, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
        Ok(artifacts::copy_into(&self.files, dir).await?)
    }
}

/// Last `max_lines` non-blank lines of the exporter's stderr.
///
/// Python tracebacks end with the exception message, which is what the user
/// needs to see.
fn stderr_tail(stderr: &[u8], max_lines: usize) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();

    if lines.is_empty() {
        return "no output on stderr".to_string();
    }
    lines[lines.len().saturating_sub(max_lines)..].join("\n")
}
