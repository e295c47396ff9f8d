//! CLI output formatting utilities.
//!
//! This module provides utilities for formatting CLI output including:
//! - JSON syntax highlighting
//! - Cell helpers for `tabled` tables

use std::fmt::Write;

use colored::Colorize;

/// Indentation unit for highlighted JSON.
const INDENT: &str = "  ";

/// Prints JSON with syntax highlighting.
///
/// Colors:
/// - Keys: Cyan
/// - Strings: Green
/// - Numbers: Yellow
/// - Booleans/Null: Magenta
/// - Brackets/Braces: White (bold)
pub fn print_highlighted_json(value: &serde_json::Value) {
    println!("{}", highlight_json(value));
}

/// Renders a JSON value as pretty-printed, colored text.
#[must_use]
pub fn highlight_json(value: &serde_json::Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    out
}

fn write_value(out: &mut String, value: &serde_json::Value, depth: usize) {
    use serde_json::Value;

    match value {
        Value::Null => push(out, "null".magenta()),
        Value::Bool(b) => push(out, b.to_string().magenta()),
        Value::Number(n) => push(out, n.to_string().yellow()),
        Value::String(s) => push(out, quote(s).green()),
        Value::Array(items) if items.is_empty() => push(out, "[]".white().bold()),
        Value::Object(map) if map.is_empty() => push(out, "{}".white().bold()),
        Value::Array(items) => {
            push(out, "[".white().bold());
            for (i, item) in items.iter().enumerate() {
                separator(out, i, depth + 1);
                write_value(out, item, depth + 1);
            }
            newline(out, depth);
            push(out, "]".white().bold());
        }
        Value::Object(map) => {
            push(out, "{".white().bold());
            for (i, (key, item)) in map.iter().enumerate() {
                separator(out, i, depth + 1);
                push(out, quote(key).cyan());
                push(out, ":".white());
                out.push(' ');
                write_value(out, item, depth + 1);
            }
            newline(out, depth);
            push(out, "}".white().bold());
        }
    }
}

fn separator(out: &mut String, index: usize, depth: usize) {
    if index > 0 {
        push(out, ",".white());
    }
    newline(out, depth);
}

fn newline(out: &mut String, depth: usize) {
    out.push('\n');
    out.push_str(&INDENT.repeat(depth));
}

fn push(out: &mut String, token: impl std::fmt::Display) { let _ = write!(out, "{token}"); }

/// Quotes and escapes a string the way `serde_json` does.
fn quote(s: &str) -> String { serde_json::Value::from(s).to_string() }

/// Truncates a string to a maximum number of characters, adding ellipsis if needed.
///
/// Counts characters rather than bytes, so multi-byte UTF-8 is never split.
#[must_use]
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars <= 1 {
        return "…".to_string();
    }
    let kept: String = s.chars().take(max_chars - 1).collect();
    format!("{kept}…")
}

/// Formats a boolean as a colored string.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}
