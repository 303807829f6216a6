//! Contracts for the external tools the converter drives.
//!
//! The pipeline in `onnxport-core` only talks to these traits. The real
//! implementations shell out to Python and call the hub; tests swap in fakes.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::ConvertError;
use crate::model::ModelId;

/// Answers whether a named package can be imported.
#[async_trait]
pub trait PackageResolver: Send + Sync {
    /// `Ok(false)` means the package is missing. `Err` means the question
    /// could not be asked at all (e.g. the interpreter is not installed).
    async fn is_importable(&self, package: &str) -> Result<bool, ConvertError>;
}

/// Something loaded in memory that knows how to write itself to a directory.
#[async_trait]
pub trait Pretrained: Send + Sync {
    /// Writes every artifact into `dir` and returns the written paths.
    async fn save_pretrained(&self, dir: &Path) -> anyhow::Result<Vec<PathBuf>>;
}

/// Downloads a model from the hub and converts it to ONNX in one step.
#[async_trait]
pub trait ModelExporter: Send + Sync {
    async fn export(&self, model_id: &ModelId) -> anyhow::Result<Box<dyn Pretrained>>;
}

/// Fetches the image preprocessing configuration that goes with a model.
#[async_trait]
pub trait PreprocessorSource: Send + Sync {
    async fn fetch(&self, model_id: &ModelId) -> anyhow::Result<Box<dyn Pretrained>>;
}
