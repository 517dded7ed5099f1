//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{}m {:.0}s", mins, remaining_secs)
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Format a match score; very small scores print in scientific notation
pub fn format_score(score: f64) -> String {
    if score == 0.0 {
        "0".to_string()
    } else if score < 0.001 {
        format!("{:.2e}", score)
    } else {
        format!("{:.3}", score)
    }
}

/// Wrap the given inclusive character ranges of `text` with `open`/`close`.
///
/// Ranges are expected sorted; overlapping ranges are skipped and
/// out-of-range ends are clamped.
pub fn mark_ranges(text: &str, ranges: &[(usize, usize)], open: &str, close: &str) -> String {
    mark_ranges_with(text, ranges, |segment| format!("{}{}{}", open, segment, close))
}

/// Highlight matched ranges in bold for terminal output
pub fn highlight(text: &str, ranges: &[(usize, usize)]) -> String {
    mark_ranges_with(text, ranges, |segment| segment.bold().to_string())
}

fn mark_ranges_with(
    text: &str,
    ranges: &[(usize, usize)],
    wrap: impl Fn(&str) -> String,
) -> String {
    let offsets: Vec<usize> = text
        .char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(text.len()))
        .collect();
    let chars = offsets.len() - 1;

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for &(start, end) in ranges {
        if start >= chars || start < cursor || end < start {
            continue;
        }
        let end = end.min(chars - 1);
        out.push_str(&text[offsets[cursor]..offsets[start]]);
        out.push_str(&wrap(&text[offsets[start]..offsets[end + 1]]));
        cursor = end + 1;
    }
    out.push_str(&text[offsets[cursor]..]);
    out
}
