use colored::*;
use onnxport_common::config::{Config, INSTALL_COMMAND, REQUIRED_FILES, UPGRADE_COMMAND};
use onnxport_common::model::{ConversionReport, ModelId};
use onnxport_core::pipeline::{ConversionEvent, ConversionService, RunOutcome, Step, Toolchain};
use tracing::Instrument;

use crate::terminal::{colors, format, print, spinner};

/// Runs the dependency check and the guarded conversion, printing as it goes.
pub async fn convert(cfg: &Config) -> RunOutcome {
    let service = ConversionService::new(Toolchain::python(cfg)).with_events(Box::new(on_event));

    let outcome = service.run(cfg).instrument(spinner::conversion_span()).await;

    print::print_lines(&outcome_lines(&outcome, &cfg.model_id));
    outcome
}

fn on_event(event: &ConversionEvent) {
    if let ConversionEvent::StepStarted(step) = event {
        spinner::report_progress(step_title(*step));
    }
    print::print_lines(&event_lines(event));
}

fn event_lines(event: &ConversionEvent) -> Vec<String> {
    match event {
        ConversionEvent::DependenciesSatisfied => vec![
            print::status_line("All dependencies installed".green().to_string()),
            String::new(),
        ],
        ConversionEvent::Started { model_id, output_dir } => vec![
            print::header_line("converting to onnx"),
            print::aligned_line("Model", 6, model_id.to_string().color(colors::ACCENT)),
            print::aligned_line("Output", 6, output_dir.display().to_string()),
            String::new(),
        ],
        ConversionEvent::StepStarted(step) => {
            let mut lines = vec![print::step_line(step.number(), step_title(*step))];
            if *step == Step::Export {
                lines.push(print::status_line("This downloads the model and converts it to ONNX."));
                lines.push(print::status_line("May take 5-10 minutes on first run."));
            }
            lines
        }
        ConversionEvent::StepFinished(step) => vec![
            print::status_line(format!("{} {}", "✓".green().bold(), step_done(*step))),
            String::new(),
        ],
        ConversionEvent::FileChecked(report) => {
            let (key, value) = format::file_to_detail(report);
            vec![print::aligned_line(&key, file_key_width(), value)]
        }
    }
}

fn file_key_width() -> usize {
    REQUIRED_FILES.iter().map(|f| f.len()).max().unwrap_or(0)
}

fn step_title(step: Step) -> &'static str {
    match step {
        Step::Export => "Loading and converting model from Hugging Face...",
        Step::Save => "Saving ONNX model...",
        Step::Preprocessor => "Saving preprocessor config...",
        Step::Verify => "Verifying exported files...",
        Step::Install => "Copying files to the serving directory...",
    }
}

fn step_done(step: Step) -> &'static str {
    match step {
        Step::Export => "Model loaded and converted successfully",
        Step::Save => "ONNX model saved",
        Step::Preprocessor => "Preprocessor saved",
        Step::Verify => "Verification finished",
        Step::Install => "Files copied",
    }
}

fn outcome_lines(outcome: &RunOutcome, model_id: &ModelId) -> Vec<String> {
    match outcome {
        RunOutcome::MissingDependencies(missing) => missing_dependencies(missing),
        RunOutcome::Converted(report) => conversion_succeeded(report),
        RunOutcome::Failed(err) => conversion_failed(model_id, err),
    }
}

fn missing_dependencies(missing: &[String]) -> Vec<String> {
    let mut lines = vec![print::failure_line("Missing required packages:")];
    for package in missing {
        lines.push(print::bullet_line(&package.bold().to_string()));
    }
    lines.push(String::new());
    lines.push(print::status_line("Install with:"));
    lines.push(print::bullet_line(&INSTALL_COMMAND.color(colors::ACCENT).to_string()));
    lines
}

fn conversion_succeeded(report: &ConversionReport) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(labels) = &report.labels {
        lines.push(print::header_line(&format!("{} classes", labels.len())));
        lines.extend(format::labels_to_lines(labels).into_iter().map(|l| print::status_line(l)));
        lines.push(String::new());
    }

    for path in &report.installed {
        lines.push(print::status_line(format!("installed {}", path.display())));
    }

    let missing = report.missing().count();
    if missing > 0 {
        lines.push(print::status_line(
            format!("{missing} expected file(s) missing, see the list above")
                .yellow()
                .to_string(),
        ));
    }

    lines.push(print::fat_separator_line());
    lines.push(print::centered_line(
        &"SUCCESS! Model converted to ONNX format".green().bold().to_string(),
    ));
    lines.push(print::fat_separator_line());
    lines.extend(next_steps(report));
    lines.push(String::new());
    lines.push(print::status_line(
        "Conversion complete! Check the output directory.".green().bold().to_string(),
    ));
    lines.push(print::end_of_program_line());
    lines
}

fn next_steps(report: &ConversionReport) -> Vec<String> {
    let dir = report.output_dir.display();
    let dir_name = report
        .output_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model_onnx".to_string());

    vec![
        print::header_line("next steps"),
        print::step_line(1, "Upload to Hugging Face (recommended):"),
        print::bullet_line("Create a new model repository on huggingface.co"),
        print::bullet_line(&format!("Upload all files from {dir}/")),
        print::bullet_line("Point lib/modelUtils.js at your model:"),
        print::bullet_line(&format!("'YOUR_USERNAME/{dir_name}'")),
        String::new(),
        print::step_line(2, "OR use locally (for testing):"),
        print::bullet_line("Copy files to public/models/ (or pass --serve-dir)"),
        print::bullet_line("Configure Transformers.js to use local models"),
        String::new(),
        print::step_line(3, "Test the model:"),
        print::bullet_line("Restart your dev server"),
        print::bullet_line("Upload a crop image"),
        print::bullet_line("Check browser console for loading messages"),
    ]
}

fn conversion_failed(model_id: &ModelId, err: &anyhow::Error) -> Vec<String> {
    vec![
        String::new(),
        print::failure_line(&format!("Error during conversion: {err:#}")),
        String::new(),
        print::status_line("Troubleshooting:"),
        print::bullet_line("Make sure you have internet connection"),
        print::bullet_line(&format!("Try: {UPGRADE_COMMAND}")),
        print::bullet_line(&format!("Check if model exists: {}", model_id.hub_url())),
        String::new(),
        print::failure_line("Conversion failed. Please check the errors above."),
        print::end_of_program_line(),
    ]
}
