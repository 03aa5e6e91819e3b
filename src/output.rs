//! CLI output formatting for the conversion run.
//!
//! # Output Format
//!
//! ```text
//! Reading from input folder /home/me/originals
//! Writing to output folder /home/me/resized
//! Processing file dawn.jpg [1 / 3]
//!     Original dimensions: 4000 x 3000
//!     Original size: 5120 kb
//!     → /home/me/resized/dawn-large.jpg (812 kb) 15.86%
//!     ✓ skipping (exists) /home/me/resized/dawn-small.jpg
//! Processing file notes.txt [2 / 3]
//!     Skipping: notes.txt
//!
//! Done: 3 files, 1 written, 1 existing, 0 failed (5120 kb → 812 kb, 15.86%)
//! ```
//!
//! Percentages above 100 (the variant grew) and failures are red, savings
//! are green.
//!
//! # Architecture
//!
//! `format_*` functions return lines for testability and take a `color`
//! flag; `print_*` wrappers write to stdout. Format functions are pure: no
//! I/O, no side effects.

use crate::convert::{ConvertEvent, SkipReason, Summary, VariantOutcome};
use crossterm::style::Stylize;
use std::io::IsTerminal;

const INDENT: &str = "    ";

/// Whether stdout should get ANSI colors (`NO_COLOR` and pipes turn them off).
pub fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

fn red(text: &str, color: bool) -> String {
    if color {
        text.red().to_string()
    } else {
        text.to_string()
    }
}

fn green(text: &str, color: bool) -> String {
    if color {
        text.green().to_string()
    } else {
        text.to_string()
    }
}

fn kb(bytes: u64) -> u64 {
    bytes / 1024
}

/// Format a size ratio, red when the output grew.
fn format_percentage(percentage: Option<f64>, color: bool) -> String {
    match percentage {
        Some(p) => {
            let text = format!("{:.2}%", p);
            if p > 100.0 {
                red(&text, color)
            } else {
                green(&text, color)
            }
        }
        None => "n/a".to_string(),
    }
}

/// Format a single progress event as display lines.
pub fn format_event(event: &ConvertEvent, color: bool) -> Vec<String> {
    match event {
        ConvertEvent::Started { input, output, .. } => vec![
            format!("Reading from input folder {}", input.display()),
            format!("Writing to output folder {}", output.display()),
        ],
        ConvertEvent::FileStarted {
            file_name,
            index,
            total,
        } => vec![format!("Processing file {} [{} / {}]", file_name, index, total)],
        ConvertEvent::FileSkipped {
            file_name,
            reason: SkipReason::Unsupported,
        } => vec![format!("{INDENT}Skipping: {}", file_name)],
        ConvertEvent::FileSkipped {
            file_name,
            reason: SkipReason::BelowMinWidth { width, min_width },
        } => vec![format!(
            "{INDENT}{}",
            red(
                &format!(
                    "Warning: {} is {} px wide, below the minimum width ({} px). Skipping.",
                    file_name, width, min_width
                ),
                color
            )
        )],
        ConvertEvent::FileFailed { file_name, error } => vec![format!(
            "{INDENT}{}",
            red(&format!("✘ cannot read {}: {}", file_name, error), color)
        )],
        ConvertEvent::Original { dimensions, bytes } => vec![
            format!(
                "{INDENT}Original dimensions: {} x {}",
                dimensions.width, dimensions.height
            ),
            format!("{INDENT}Original size: {} kb", kb(*bytes)),
        ],
        ConvertEvent::Upscale {
            source_width,
            target_width,
        } => vec![format!(
            "{INDENT}{}",
            red(
                &format!(
                    "Warning: file is smaller than target width ({} px < {} px).",
                    source_width, target_width
                ),
                color
            )
        )],
        ConvertEvent::Variant { output, outcome } => {
            let line = match outcome {
                VariantOutcome::Exists => {
                    format!("{INDENT}✓ skipping (exists) {}", output.display())
                }
                VariantOutcome::Written { bytes, percentage } => format!(
                    "{INDENT}→ {} ({} kb) {}",
                    output.display(),
                    kb(*bytes),
                    format_percentage(*percentage, color)
                ),
                VariantOutcome::Failed { error } => format!(
                    "{INDENT}→ {} {}",
                    output.display(),
                    red(&format!("✘ failed: {}", error), color)
                ),
            };
            vec![line]
        }
    }
}

/// Format the end-of-run totals.
pub fn format_summary(summary: &Summary, color: bool) -> String {
    let failed = summary.variants_failed + summary.files_failed;
    let failed_text = format!("{} failed", failed);
    let mut line = format!(
        "Done: {} files, {} written, {} existing, {}",
        summary.files,
        summary.variants_written,
        summary.variants_existing,
        if failed > 0 {
            red(&failed_text, color)
        } else {
            failed_text
        }
    );
    if summary.variants_written > 0 {
        line.push_str(&format!(
            " ({} kb → {} kb, {})",
            kb(summary.bytes_in),
            kb(summary.bytes_out),
            format_percentage(summary.percentage(), color)
        ));
    }
    line
}

/// Print one progress event to stdout.
pub fn print_event(event: &ConvertEvent, color: bool) {
    for line in format_event(event, color) {
        println!("{}", line);
    }
}

/// Print the end-of-run totals to stdout.
pub fn print_summary(summary: &Summary, color: bool) {
    println!();
    println!("{}", format_summary(summary, color));
}
