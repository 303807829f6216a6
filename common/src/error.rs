use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Failures raised by the adapters around the exporter and the hub.
///
/// The pipeline never matches on these; they exist so the single error
/// boundary can print a precise message.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("invalid model id '{0}': expected '<owner>/<name>'")]
    InvalidModelId(String),

    #[error("failed to start '{interpreter}': {source}")]
    InterpreterSpawn {
        interpreter: String,
        #[source]
        source: std::io::Error,
    },

    #[error("exporter exited with {status}: {stderr}")]
    ExporterFailed { status: ExitStatus, stderr: String },

    #[error("exporter produced no files in {0}")]
    EmptyExport(PathBuf),

    #[error("preprocessor config for '{model_id}' is not a JSON object")]
    InvalidPreprocessor { model_id: String },

    #[error("{action} '{path}': {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
