use std::path::PathBuf;

use crate::model::ModelId;

/// Hub identifier of the crop leaf disease classifier.
pub const DEFAULT_MODEL_ID: &str = "wambugu71/crop_leaf_diseases_vit";

pub const DEFAULT_OUTPUT_DIR: &str = "./crop_disease_model_onnx";

pub const DEFAULT_PYTHON: &str = "python3";

/// Python packages the exporter needs, checked in this order.
pub const REQUIRED_PACKAGES: &[&str] = &["transformers", "torch", "onnx", "optimum"];

pub const MODEL_FILE: &str = "model.onnx";

pub const MODEL_CONFIG_FILE: &str = "config.json";

pub const PREPROCESSOR_FILE: &str = "preprocessor_config.json";

/// Files that must be present in the output directory after a conversion.
pub const REQUIRED_FILES: &[&str] = &[MODEL_FILE, MODEL_CONFIG_FILE, PREPROCESSOR_FILE];

pub const INSTALL_COMMAND: &str = "pip install transformers torch onnx optimum[exporters]";

pub const UPGRADE_COMMAND: &str = "pip install --upgrade transformers optimum";

/// Task handed to the exporter.
pub const EXPORT_TASK: &str = "image-classification";

pub const HUB_URL: &str = "https://huggingface.co";

pub struct Config {
    pub model_id: ModelId,
    pub output_dir: PathBuf,

    /// Interpreter used both for the dependency check and the exporter.
    pub python: PathBuf,

    /// Exporter task, e.g. `image-classification`.
    pub task: String,

    /// When set, verified artifacts are also copied here
    /// (for example a web app's `public/models/`).
    pub serve_dir: Option<PathBuf>,

    pub no_banner: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_id: ModelId::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            python: PathBuf::from(DEFAULT_PYTHON),
            task: EXPORT_TASK.to_string(),
            serve_dir: None,
            no_banner: false,
        }
    }
}
