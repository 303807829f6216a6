pub mod convert;

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use onnxport_common::config::{
    Config, DEFAULT_MODEL_ID, DEFAULT_OUTPUT_DIR, DEFAULT_PYTHON, EXPORT_TASK,
};
use onnxport_common::model::ModelId;

#[derive(Parser)]
#[command(name = "onnxport")]
#[command(version, about = "Convert a hub image classifier to ONNX for in-browser inference.")]
pub struct CommandLine {
    /// Hub model to convert
    #[arg(long = "model", value_name = "ID", default_value = DEFAULT_MODEL_ID)]
    pub model_id: ModelId,

    /// Directory the converted files are written to
    #[arg(short, long = "output", value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Python interpreter with transformers, torch, onnx and optimum installed
    #[arg(long, value_name = "PATH", default_value = DEFAULT_PYTHON)]
    pub python: PathBuf,

    /// Exporter task
    #[arg(long, default_value = EXPORT_TASK)]
    pub task: String,

    /// Also copy the verified files here (e.g. public/models)
    #[arg(long, value_name = "DIR")]
    pub serve_dir: Option<PathBuf>,

    /// Skip the title banner
    #[arg(long)]
    pub no_banner: bool,

    /// Show debug output (-vv for trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Config {
        Config {
            model_id: self.model_id.clone(),
            output_dir: self.output_dir.clone(),
            python: self.python.clone(),
            task: self.task.clone(),
            serve_dir: self.serve_dir.clone(),
            no_banner: self.no_banner,
        }
    }
}
