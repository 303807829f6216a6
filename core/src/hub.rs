//! Hub access for the companion preprocessing configuration.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use hf_hub::api::tokio::ApiBuilder;
use onnxport_common::config::PREPROCESSOR_FILE;
use onnxport_common::error::ConvertError;
use onnxport_common::model::ModelId;
use onnxport_common::toolchain::{Pretrained, PreprocessorSource};
use serde_json::Value;
use tokio::fs;
use tracing::debug;

/// Downloads `preprocessor_config.json` through the default hub cache.
#[derive(Default)]
pub struct HubPreprocessorSource;

impl HubPreprocessorSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PreprocessorSource for HubPreprocessorSource {
    async fn fetch(&self, model_id: &ModelId) -> anyhow::Result<Box<dyn Pretrained>> {
        let api = ApiBuilder::new()
            .with_progress(false)
            .build()
            .context("failed to initialise hub client")?;

        let cached = api
            .model(model_id.to_string())
            .get(PREPROCESSOR_FILE)
            .await
            .with_context(|| format!("failed to fetch {PREPROCESSOR_FILE} for {model_id}"))?;
        debug!("preprocessor config cached at {}", cached.display());

        let raw = fs::read(&cached)
            .await
            .map_err(|e| ConvertError::io("failed to read", &cached, e))?;

        Ok(Box::new(PreprocessorConfig::from_slice(model_id, &raw)?))
    }
}

/// Image preprocessing parameters (resize, normalisation, ...) for a model.
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessorConfig {
    value: Value,
}

impl PreprocessorConfig {
    /// Parses a preprocessor config. Anything but a JSON object is rejected.
    pub fn from_slice(model_id: &ModelId, raw: &[u8]) -> Result<Self, ConvertError> {
        match serde_json::from_slice::<Value>(raw) {
            Ok(value) if value.is_object() => Ok(Self { value }),
            _ => Err(ConvertError::InvalidPreprocessor {
                model_id: model_id.to_string(),
            }),
        }
    }
}

#[async_trait]
impl Pretrained for PreprocessorConfig {
    async fn save_pretrained(&self, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| ConvertError::io("failed to create directory", dir, e))?;

        let path = dir.join(PREPROCESSOR_FILE);
        let mut body = serde_json::to_vec_pretty(&self.value)?;
        body.push(b'\n');
        fs::write(&path, body)
            .await
            .map_err(|e| ConvertError::io("failed to write", &path, e))?;

        Ok(vec![path])
    }
}
