use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use onnxport_common::config::{Config, PREPROCESSOR_FILE};
use onnxport_common::error::ConvertError;
use onnxport_common::model::ModelId;
use onnxport_common::toolchain::{ModelExporter, PackageResolver, Pretrained, PreprocessorSource};
use onnxport_core::pipeline::{ConversionEvent, ConversionService, Step, Toolchain};

pub const VIT_CONFIG: &str = r#"{
  "model_type": "vit",
  "id2label": {"0": "Corn___Common_Rust", "1": "Corn___Gray_Leaf_Spot", "2": "Corn___Healthy", "3": "Invalid"}
}"#;

/// Call counters shared between a test and its fake toolchain.
#[derive(Clone, Default)]
pub struct Probe {
    pub resolves: Arc<AtomicUsize>,
    pub exports: Arc<AtomicUsize>,
    pub fetches: Arc<AtomicUsize>,
    pub events: Arc<Mutex<Vec<String>>>,
}

impl Probe {
    pub fn exports(&self) -> usize {
        self.exports.load(Ordering::SeqCst)
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

pub struct FakeResolver {
    pub absent: Vec<&'static str>,
    pub probe: Probe,
}

#[async_trait]
impl PackageResolver for FakeResolver {
    async fn is_importable(&self, package: &str) -> Result<bool, ConvertError> {
        self.probe.resolves.fetch_add(1, Ordering::SeqCst);
        Ok(!self.absent.contains(&package))
    }
}

/// Files written by a [`FakeModel`] or [`FakePreprocessor`] on save.
pub struct FakeModel {
    files: Vec<(String, Vec<u8>)>,
}

#[async_trait]
impl Pretrained for FakeModel {
    async fn save_pretrained(&self, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::new();
        for (name, body) in &self.files {
            let path = dir.join(name);
            std::fs::write(&path, body)?;
            written.push(path);
        }
        Ok(written)
    }
}

pub struct FakeExporter {
    pub files: Vec<(String, Vec<u8>)>,
    pub error: Option<String>,
    pub probe: Probe,
}

#[async_trait]
impl ModelExporter for FakeExporter {
    async fn export(&self, _model_id: &ModelId) -> anyhow::Result<Box<dyn Pretrained>> {
        self.probe.exports.fetch_add(1, Ordering::SeqCst);
        if let Some(msg) = &self.error {
            anyhow::bail!("{msg}");
        }
        Ok(Box::new(FakeModel {
            files: self.files.clone(),
        }))
    }
}

pub struct FakePreprocessor {
    pub error: Option<String>,
    pub probe: Probe,
}

#[async_trait]
impl PreprocessorSource for FakePreprocessor {
    async fn fetch(&self, _model_id: &ModelId) -> anyhow::Result<Box<dyn Pretrained>> {
        self.probe.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(msg) = &self.error {
            anyhow::bail!("{msg}");
        }
        Ok(Box::new(FakeModel {
            files: vec![(PREPROCESSOR_FILE.to_string(), br#"{"do_resize": true}"#.to_vec())],
        }))
    }
}

/// A toolchain that exports `model.onnx` and `config.json` and fetches the
/// preprocessor config, with every package installed.
pub struct FakeToolchain {
    pub absent: Vec<&'static str>,
    pub exported: Vec<(String, Vec<u8>)>,
    pub export_error: Option<String>,
    pub fetch_error: Option<String>,
}

impl Default for FakeToolchain {
    fn default() -> Self {
        Self {
            absent: Vec::new(),
            exported: vec![
                ("model.onnx".to_string(), vec![7u8; 3 * 1024 * 1024]),
                ("config.json".to_string(), VIT_CONFIG.as_bytes().to_vec()),
            ],
            export_error: None,
            fetch_error: None,
        }
    }
}

impl FakeToolchain {
    pub fn into_service(self, probe: &Probe) -> ConversionService {
        let toolchain = Toolchain {
            resolver: Box::new(FakeResolver {
                absent: self.absent,
                probe: probe.clone(),
            }),
            exporter: Box::new(FakeExporter {
                files: self.exported,
                error: self.export_error,
                probe: probe.clone(),
            }),
            preprocessor: Box::new(FakePreprocessor {
                error: self.fetch_error,
                probe: probe.clone(),
            }),
        };

        let events = probe.events.clone();
        ConversionService::new(toolchain).with_events(Box::new(move |event| {
            events.lock().unwrap().push(describe(event));
        }))
    }
}

fn describe(event: &ConversionEvent) -> String {
    match event {
        ConversionEvent::DependenciesSatisfied => "deps".to_string(),
        ConversionEvent::Started { .. } => "started".to_string(),
        ConversionEvent::StepStarted(step) => format!("start:{}", step_name(*step)),
        ConversionEvent::StepFinished(step) => format!("done:{}", step_name(*step)),
        ConversionEvent::FileChecked(report) => format!("file:{}", report.name),
    }
}

fn step_name(step: Step) -> &'static str {
    match step {
        Step::Export => "export",
        Step::Save => "save",
        Step::Preprocessor => "preprocessor",
        Step::Verify => "verify",
        Step::Install => "install",
    }
}

pub fn config_in(root: &Path) -> Config {
    Config {
        output_dir: root.join("crop_disease_model_onnx"),
        ..Config::default()
    }
}
