use crossterm::style::Color;
use regex::Regex;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

/// Marker kubetail prints when it starts before the run's pods exist.
pub const NO_MATCHING_PODS_MARKER: &str = "No pods exists that matches";

static COLUMN_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[A-Z][A-Z0-9_-]*(\s+[A-Z][A-Z0-9_-]*)*\s*$").expect("valid header pattern")
});

/// True for table headers such as `LAST SEEN   TYPE   REASON   OBJECT   MESSAGE`.
pub fn is_column_header(line: &str) -> bool {
    COLUMN_HEADER.is_match(line)
}

/// Extracts the binary from shell errors like `/bin/sh: kubetail: command not found`.
pub fn missing_tool_name(text: &str) -> Option<String> {
    if !text.contains("command not found") {
        return None;
    }
    let tool = text
        .split_whitespace()
        .nth(1)?
        .trim_end_matches(':')
        .trim_matches('`');
    if tool.is_empty() {
        None
    } else {
        Some(tool.to_string())
    }
}

/// Generate a color for a string based on hash.
pub fn get_color(s: &str) -> Color {
    let colors = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::AnsiValue(91), // Bright Red
        Color::AnsiValue(92), // Bright Green
        Color::AnsiValue(94), // Bright Blue
        Color::AnsiValue(93), // Bright Yellow
        Color::AnsiValue(95), // Bright Magenta
        Color::AnsiValue(96), // Bright Cyan
    ];
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    s.hash(&mut hasher);
    let hash = hasher.finish() as u32;
    colors[(hash % colors.len() as u32) as usize]
}
