//! Utility functions for UI rendering

use crossterm::style::Color;

use crate::constants::{
    BYTES_PER_GB, BYTES_PER_KB, BYTES_PER_MB, IO_THRESHOLD_CRITICAL, IO_THRESHOLD_MODERATE,
    IO_THRESHOLD_WARNING,
};

/// Truncates a string to fit within a given width.
///
/// If the string exceeds `max_len` characters, it is truncated and "..."
/// is appended.
///
/// # Arguments
/// * `s` - The string to truncate
/// * `max_len` - Maximum character length for the output
///
/// # Returns
/// The original string if it fits, or a truncated version with "..." suffix
#[must_use]
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max_len).collect()
    }
}

/// Scales a byte count to the largest unit that keeps it above one.
fn human(bytes: f64) -> (f64, &'static str) {
    if bytes < BYTES_PER_KB {
        (bytes, "B")
    } else if bytes < BYTES_PER_MB {
        (bytes / BYTES_PER_KB, "KB")
    } else if bytes < BYTES_PER_GB {
        (bytes / BYTES_PER_MB, "MB")
    } else {
        (bytes / BYTES_PER_GB, "GB")
    }
}

/// Formats a byte rate (bytes/sec) as a human-readable string.
///
/// Automatically selects appropriate unit (B/s, KB/s, MB/s, GB/s).
#[must_use]
pub fn format_rate(bytes_per_sec: f64) -> String {
    let (value, unit) = human(bytes_per_sec.max(0.0));
    format!("{:.2} {}/s", value, unit)
}

/// Formats a cumulative byte count (B, KB, MB, GB).
#[must_use]
pub fn format_bytes(bytes: f64) -> String {
    let (value, unit) = human(bytes.max(0.0));
    format!("{:.2} {}", value, unit)
}

/// Formats a read/write column value.
///
/// # Arguments
/// * `value` - Bytes per second, or bytes when `accumulated`
/// * `kilobytes` - Always use kilobytes (`K/s`, `K`)
/// * `accumulated` - The value is a total, not a rate
#[must_use]
pub fn format_value(value: f64, kilobytes: bool, accumulated: bool) -> String {
    match (kilobytes, accumulated) {
        (true, false) => format!("{:.2} K/s", value.max(0.0) / BYTES_PER_KB),
        (true, true) => format!("{:.2} K", value.max(0.0) / BYTES_PER_KB),
        (false, false) => format_rate(value),
        (false, true) => format_bytes(value),
    }
}

/// Returns a color based on the I/O wait percentage.
///
/// # Color Thresholds
/// * Red - Critical wait (≥80%)
/// * Yellow - Warning level (≥50%)
/// * Cyan - Moderate wait (≥20%)
/// * Green - Low wait (<20%)
#[must_use]
pub fn io_color(percent: f64) -> Color {
    if percent >= IO_THRESHOLD_CRITICAL {
        Color::Red
    } else if percent >= IO_THRESHOLD_WARNING {
        Color::Yellow
    } else if percent >= IO_THRESHOLD_MODERATE {
        Color::Cyan
    } else {
        Color::Green
    }
}
