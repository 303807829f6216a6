use indicatif::ProgressStyle;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg} {elapsed:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ])
}

/// Span whose lifetime is shown as a spinner under the console output.
pub fn conversion_span() -> Span {
    let span = info_span!("conversion", indicatif.pb_show = true);
    span.pb_set_style(&spinner_style());
    span.pb_set_message("Checking dependencies...");
    span
}

/// Updates the spinner message of the current span.
pub fn report_progress(msg: &str) {
    Span::current().pb_set_message(msg);
}
