//! View dispatcher
//!
//! Two interchangeable renderers consume the same `Frame`:
//! - `batch` - one self-contained text frame per cycle, timed sleep between
//! - `interactive` - full-screen redraw, owns the keyboard wait
//!
//! Shared layout lives in:
//! - `components` - header, totals, column headers, footer
//! - `task_list` - task rows
//! - `help` - help overlay
//! - `utils` - formatting helpers

mod batch;
mod components;
mod help;
mod interactive;
mod task_list;
mod utils;

pub use batch::BatchView;
pub use interactive::InteractiveView;

use std::io;
use std::time::Duration;

use crate::app::{CancelToken, DeltaRecord, DisplayOptions, RuntimeConfig};

/// How a wait step ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The delay ran out
    Elapsed,
    /// Unrecognized key: start the next cycle now
    Refresh,
    /// Runtime configuration changed: re-present the current records
    Reconfigured,
    /// Operator asked to quit
    Quit,
    /// Termination requested
    Cancelled,
}

/// Everything a renderer needs for one frame
#[derive(Debug)]
pub struct Frame<'a> {
    /// Filtered and sorted records
    pub records: &'a [DeltaRecord],
    /// Sum of the displayed read and write columns
    pub totals: (f64, f64),
    /// System-wide read and write rates, None when unavailable
    pub current: Option<(f64, f64)>,
    pub config: &'a RuntimeConfig,
    pub display: &'a DisplayOptions,
    pub delay: Duration,
    /// 1-based number of the sampling cycle this frame belongs to
    pub cycle: u64,
}

impl<'a> Frame<'a> {
    pub fn new(
        records: &'a [DeltaRecord],
        current: Option<(f64, f64)>,
        config: &'a RuntimeConfig,
        display: &'a DisplayOptions,
        delay: Duration,
        cycle: u64,
    ) -> Self {
        let totals = records.iter().fold((0.0, 0.0), |(read, write), r| {
            (
                read + r.read_value(config.accumulated),
                write + r.write_value(config.accumulated),
            )
        });
        Self {
            records,
            totals,
            current,
            config,
            display,
            delay,
            cycle,
        }
    }
}

/// A renderer plus the wait primitive used between cycles
pub trait View {
    /// Draws one frame
    fn render(&mut self, frame: &Frame<'_>) -> io::Result<()>;

    /// Blocks for up to `timeout`, returning early on cancellation or input.
    ///
    /// Interactive views may mutate `config` in response to keys.
    fn wait(
        &mut self,
        timeout: Duration,
        cancel: &CancelToken,
        config: &mut RuntimeConfig,
    ) -> io::Result<WaitOutcome>;

    /// Restores any output state the view holds. Safe to call twice.
    fn finish(&mut self) -> io::Result<()>;

    /// True if the view owns the terminal
    fn is_interactive(&self) -> bool {
        false
    }
}
