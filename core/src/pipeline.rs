//! # Conversion Pipeline
//!
//! Runs the whole conversion top to bottom:
//! 1. **Dependencies**: every required package must resolve, otherwise stop.
//! 2. **Export**: one call to the [`ModelExporter`], never retried.
//! 3. **Save**: the exported artifacts are written to the output directory.
//! 4. **Preprocessor**: fetched separately and written next to the model.
//! 5. **Verify**: each required file is reported present (with size) or missing.
//! 6. **Install** (optional): present files are copied to a serving directory.
//!
//! Steps 2 to 6 share a single error boundary. The first error ends the run;
//! whatever was already written stays on disk.

use std::path::{Path, PathBuf};

use anyhow::Context;
use onnxport_common::config::{Config, MODEL_CONFIG_FILE, REQUIRED_FILES, REQUIRED_PACKAGES};
use onnxport_common::model::{ConversionReport, FileReport, ModelId};
use onnxport_common::toolchain::{ModelExporter, PackageResolver, PreprocessorSource};
use tokio::fs;
use tracing::{debug, info};

use crate::dependencies::{self, DependencyReport, PythonResolver};
use crate::exporter::OptimumExporter;
use crate::hub::HubPreprocessorSource;
use crate::{artifacts, verify};

/// The external tools a conversion needs.
pub struct Toolchain {
    pub resolver: Box<dyn PackageResolver>,
    pub exporter: Box<dyn ModelExporter>,
    pub preprocessor: Box<dyn PreprocessorSource>,
}

impl Toolchain {
    /// Python + optimum for the export, the hub API for the preprocessor.
    pub fn python(cfg: &Config) -> Self {
        Self {
            resolver: Box::new(PythonResolver::new(&cfg.python)),
            exporter: Box::new(OptimumExporter::new(&cfg.python).with_task(&cfg.task)),
            preprocessor: Box::new(HubPreprocessorSource::new()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Export,
    Save,
    Preprocessor,
    Verify,
    Install,
}

impl Step {
    /// 1-based position in the printed step list.
    pub fn number(self) -> usize {
        match self {
            Step::Export => 1,
            Step::Save => 2,
            Step::Preprocessor => 3,
            Step::Verify => 4,
            Step::Install => 5,
        }
    }
}

#[derive(Clone, Debug)]
pub enum ConversionEvent {
    DependenciesSatisfied,
    Started { model_id: ModelId, output_dir: PathBuf },
    StepStarted(Step),
    StepFinished(Step),
    FileChecked(FileReport),
}

pub type EventCallback = Box<dyn Fn(&ConversionEvent) + Send + Sync>;

#[derive(Debug)]
pub enum RunOutcome {
    MissingDependencies(Vec<String>),
    Converted(ConversionReport),
    Failed(anyhow::Error),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Converted(_))
    }

    pub fn exit_code(&self) -> u8 {
        if self.is_success() { 0 } else { 1 }
    }
}

pub struct ConversionService {
    toolchain: Toolchain,
    on_event: Option<EventCallback>,
}

impl ConversionService {
    pub fn new(toolchain: Toolchain) -> Self {
        Self {
            toolchain,
            on_event: None,
        }
    }

    /// Registers a callback invoked synchronously for every progress event.
    pub fn with_events(mut self, on_event: EventCallback) -> Self {
        self.on_event = Some(on_event);
        self
    }

    fn emit(&self, event: ConversionEvent) {
        if let Some(cb) = &self.on_event {
            cb(&event);
        }
    }

    pub async fn check_dependencies(&self) -> DependencyReport {
        dependencies::check_dependencies(self.toolchain.resolver.as_ref(), REQUIRED_PACKAGES).await
    }

    /// Dependency check followed by the guarded conversion.
    pub async fn run(&self, cfg: &Config) -> RunOutcome {
        let deps = self.check_dependencies().await;
        if !deps.is_satisfied() {
            return RunOutcome::MissingDependencies(deps.missing);
        }
        self.emit(ConversionEvent::DependenciesSatisfied);

        match self.convert(cfg).await {
            Ok(report) => RunOutcome::Converted(report),
            Err(e) => {
                debug!("conversion of {} failed: {e:?}", cfg.model_id);
                RunOutcome::Failed(e)
            }
        }
    }

    /// Export, save, fetch the preprocessor, verify and optionally install.
    pub async fn convert(&self, cfg: &Config) -> anyhow::Result<ConversionReport> {
        let model_id = &cfg.model_id;
        let output_dir = cfg.output_dir.as_path();

        self.emit(ConversionEvent::Started {
            model_id: model_id.clone(),
            output_dir: output_dir.to_path_buf(),
        });

        fs::create_dir_all(output_dir)
            .await
            .with_context(|| format!("failed to create {}", output_dir.display()))?;

        self.emit(ConversionEvent::StepStarted(Step::Export));
        let model = self.toolchain.exporter.export(model_id).await?;
        self.emit(ConversionEvent::StepFinished(Step::Export));

        self.emit(ConversionEvent::StepStarted(Step::Save));
        let saved = model.save_pretrained(output_dir).await?;
        info!("saved {} exported files", saved.len());
        self.emit(ConversionEvent::StepFinished(Step::Save));

        self.emit(ConversionEvent::StepStarted(Step::Preprocessor));
        let preprocessor = self.toolchain.preprocessor.fetch(model_id).await?;
        preprocessor.save_pretrained(output_dir).await?;
        self.emit(ConversionEvent::StepFinished(Step::Preprocessor));

        self.emit(ConversionEvent::StepStarted(Step::Verify));
        let files = verify::verify_outputs(output_dir, REQUIRED_FILES).await;
        for file in &files {
            self.emit(ConversionEvent::FileChecked(file.clone()));
        }
        let labels = verify::read_labels(&output_dir.join(MODEL_CONFIG_FILE)).await;
        self.emit(ConversionEvent::StepFinished(Step::Verify));

        let installed = match &cfg.serve_dir {
            Some(serve_dir) => self.install(&files, serve_dir).await?,
            None => Vec::new(),
        };

        Ok(ConversionReport {
            output_dir: output_dir.to_path_buf(),
            files,
            labels,
            installed,
        })
    }

    async fn install(&self, files: &[FileReport], serve_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
        self.emit(ConversionEvent::StepStarted(Step::Install));
        let present: Vec<PathBuf> = files
            .iter()
            .filter(|f| f.is_present())
            .map(|f| f.path.clone())
            .collect();
        let installed = artifacts::copy_into(&present, serve_dir).await?;
        self.emit(ConversionEvent::StepFinished(Step::Install));
        Ok(installed)
    }
}
