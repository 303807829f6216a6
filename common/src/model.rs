//! # Conversion Model
//!
//! Plain data passed between the pipeline and the terminal:
//! * [`ModelId`]: a validated hub identifier (`owner/name`).
//! * [`FileReport`]: presence and size of one expected output file.
//! * [`ConversionReport`]: everything a successful run has to show.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{DEFAULT_MODEL_ID, HUB_URL};
use crate::error::ConvertError;

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// A model identifier in the hub's namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelId(String);

impl ModelId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Browser URL of the model card, used in troubleshooting hints.
    pub fn hub_url(&self) -> String {
        format!("{HUB_URL}/{}", self.0)
    }
}

impl Default for ModelId {
    fn default() -> Self {
        Self(DEFAULT_MODEL_ID.to_string())
    }
}

impl FromStr for ModelId {
    type Err = ConvertError;

    /// Accepts exactly one `/` with a non-empty owner and name on either side.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let valid = match s.split_once('/') {
            Some((owner, name)) => {
                !owner.is_empty()
                    && !name.is_empty()
                    && !name.contains('/')
                    && !s.chars().any(char::is_whitespace)
            }
            None => false,
        };

        if !valid {
            return Err(ConvertError::InvalidModelId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of checking one required file in the output directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileReport {
    pub name: String,
    pub path: PathBuf,
    /// `None` when the file does not exist.
    pub bytes: Option<u64>,
}

impl FileReport {
    pub fn is_present(&self) -> bool {
        self.bytes.is_some()
    }

    pub fn mebibytes(&self) -> Option<f64> {
        self.bytes.map(|b| b as f64 / BYTES_PER_MIB)
    }
}

/// Class labels read from the exported `config.json` as `(id, label)`,
/// ordered by id. Ids keep their original values, gaps included.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelSummary {
    pub labels: Vec<(u64, String)>,
}

impl LabelSummary {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConversionReport {
    pub output_dir: PathBuf,
    pub files: Vec<FileReport>,
    pub labels: Option<LabelSummary>,
    /// Files copied into the serving directory, if one was configured.
    pub installed: Vec<PathBuf>,
}

impl ConversionReport {
    pub fn missing(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| !f.is_present())
    }
}
