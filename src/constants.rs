//! Centralized constants for the application
//!
//! This module contains all magic numbers and configuration constants
//! used throughout the application, making them easy to find and modify.

// ============================================================================
// Application Info
// ============================================================================

/// Application name displayed in header
pub const DISPLAY_NAME: &str = "Linux Disk I/O Monitor";

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Application version from Cargo.toml
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Sampling
// ============================================================================

/// Default delay between iterations in seconds
pub const DEFAULT_DELAY_SECS: f64 = 1.0;

/// Longest single blocking wait before the cancellation token is re-checked
pub const WAIT_SLICE_MS: u64 = 100;

// ============================================================================
// Navigation
// ============================================================================

/// Lines subtracted from terminal height to calculate visible rows
/// (header, two totals lines, column headers, status line, help line)
pub const VISIBLE_ROWS_OVERHEAD: usize = 6;

// ============================================================================
// Byte Size Conversions
// ============================================================================

/// Bytes in a kilobyte
pub const BYTES_PER_KB: f64 = 1024.0;

/// Bytes in a megabyte
pub const BYTES_PER_MB: f64 = 1_048_576.0;

/// Bytes in a gigabyte
pub const BYTES_PER_GB: f64 = 1_073_741_824.0;

// ============================================================================
// UI Dialog Dimensions
// ============================================================================

/// Width of the help dialog box
pub const HELP_DIALOG_WIDTH: usize = 56;

/// Width of the key column in help dialog
pub const HELP_KEY_COL_WIDTH: usize = 14;

/// Width reserved for the COMMAND column before truncation kicks in
pub const MIN_COMMAND_WIDTH: usize = 12;

// ============================================================================
// I/O Wait Thresholds (for coloring)
// ============================================================================

/// I/O wait percentage for red color (critical)
pub const IO_THRESHOLD_CRITICAL: f64 = 80.0;

/// I/O wait percentage for yellow color (warning)
pub const IO_THRESHOLD_WARNING: f64 = 50.0;

/// I/O wait percentage for cyan color (moderate)
pub const IO_THRESHOLD_MODERATE: f64 = 20.0;
