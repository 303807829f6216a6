use std::fmt::Display;

use colored::*;
use tracing::info;
use unicode_width::UnicodeWidthStr;

use crate::terminal::colors;

pub const TOTAL_WIDTH: usize = 64;

/// Events on this target are written verbatim, without a level prefix.
pub const PRINT_TARGET: &str = "onnxport::print";

pub trait WithDefaultColor {
    fn with_default(self, default_color: Color) -> ColoredString;
}

impl WithDefaultColor for &str {
    fn with_default(self, default_color: Color) -> ColoredString {
        self.color(default_color)
    }
}

impl WithDefaultColor for String {
    fn with_default(self, default_color: Color) -> ColoredString {
        self.color(default_color)
    }
}

impl WithDefaultColor for ColoredString {
    fn with_default(self, _default_color: Color) -> ColoredString {
        self
    }
}

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        print(line);
    }
}

pub fn banner(no_banner: bool) {
    if no_banner {
        return;
    }

    let text_content: String = format!("⟦ ONNXPORT v{} ⟧", env!("CARGO_PKG_VERSION"));
    let text_width: usize = UnicodeWidthStr::width(text_content.as_str());
    let text: ColoredString = text_content.bright_green().bold();
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH.saturating_sub(text_width) / 2).bright_black();

    print(&format!("{}{}{}", sep, text, sep));
    print(&centered_line(&"Crop Disease Model Converter".bold().to_string()));
    print(&centered_line(
        &"Converting to ONNX for Transformers.js".color(colors::TEXT_DEFAULT).to_string(),
    ));
    print(&fat_separator_line());
}

pub fn header_line(msg: &str) -> String {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    line.to_string()
}

pub fn fat_separator_line() -> String {
    "═".repeat(TOTAL_WIDTH).bright_black().to_string()
}

pub fn centered_line(msg: &str) -> String {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    format!("{}{}", space, msg)
}

/// `[n] message` for a numbered pipeline step.
pub fn step_line(idx: usize, msg: &str) -> String {
    let idx_str: String = format!("[{}]", idx.to_string().color(colors::ACCENT));
    format!(
        "{} {}",
        idx_str.color(colors::SEPARATOR),
        msg.color(colors::PRIMARY)
    )
}

pub fn status_line<T: AsRef<str>>(msg: T) -> String {
    let prefix: ColoredString = ">".color(colors::SEPARATOR);
    format!("{} {}", prefix, msg.as_ref().color(colors::TEXT_DEFAULT))
}

pub fn aligned_line<V>(key: &str, key_width: usize, value: V) -> String
where
    V: Display + WithDefaultColor,
{
    let dots: String = ".".repeat((key_width + 1).saturating_sub(key.len()));
    let colon: String = format!(
        "{}{}",
        dots.color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR)
    );
    let value: ColoredString = value.with_default(colors::TEXT_DEFAULT);
    status_line(format!("{}{} {}", key.color(colors::PRIMARY), colon, value))
}

pub fn bullet_line(msg: &str) -> String {
    format!("   {} {}", "-".color(colors::SEPARATOR), msg)
}

pub fn failure_line(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg.red())
}

pub fn end_of_program_line() -> String {
    "═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR).to_string()
}
