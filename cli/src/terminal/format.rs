use colored::*;
use onnxport_common::model::{FileReport, LabelSummary};

use crate::terminal::colors;

type Detail = (String, ColoredString);

/// `(name, "12.34 MB")` for a present file, `(name, "MISSING!")` otherwise.
pub fn file_to_detail(report: &FileReport) -> Detail {
    let value: ColoredString = match report.mebibytes() {
        Some(mib) => format!("✓ {}", mib_to_string(mib)).color(colors::SIZE),
        None => "✗ MISSING!".color(colors::MISSING).bold(),
    };
    (report.name.clone(), value)
}

pub fn mib_to_string(mib: f64) -> String {
    format!("{mib:.2} MB")
}

/// Numbered label list, `[id] label`, for the class summary.
pub fn labels_to_lines(summary: &LabelSummary) -> Vec<String> {
    summary
        .labels
        .iter()
        .map(|(id, label)| format!("{} {}", format!("[{id:>2}]").color(colors::SEPARATOR), label))
        .collect()
}
