//! Runtime configuration and loop parameters
//!
//! `RuntimeConfig` is the operator-adjustable state read by the filter,
//! sort and render steps every cycle. It is owned by the sampler and only
//! mutated by interactive input between cycles. `Params` never changes
//! after startup.

use std::path::PathBuf;
use std::time::Duration;

use crate::system::TaskQuery;

use super::SortColumn;

/// Operator-adjustable display, filter and sort state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Current sort column
    pub sort_column: SortColumn,
    /// Sort in ascending order (false = descending)
    pub sort_ascending: bool,
    /// Only show tasks doing I/O
    pub only_active: bool,
    /// One row per process instead of per thread
    pub processes_only: bool,
    /// Show cumulative counters instead of rates
    pub accumulated: bool,
    /// Only tasks owned by this uid
    pub user_filter: Option<u32>,
    /// Only the task with this id
    pub task_filter: Option<u32>,
    /// Highlighted task in interactive mode
    pub selected: Option<u32>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            sort_column: SortColumn::Io,
            sort_ascending: false,
            only_active: false,
            processes_only: false,
            accumulated: false,
            user_filter: None,
            task_filter: None,
            selected: None,
        }
    }
}

impl RuntimeConfig {
    /// Query for the kernel accounting source this cycle
    pub fn task_query(&self) -> TaskQuery {
        TaskQuery {
            processes_only: self.processes_only,
            user_filter: self.user_filter,
            task_filter: self.task_filter,
        }
    }

    /// Moves to the next sort column; the direction is kept
    pub fn next_column(&mut self) {
        self.sort_column = self.sort_column.next();
    }

    pub fn prev_column(&mut self) {
        self.sort_column = self.sort_column.prev();
    }

    /// Toggles sort order between ascending and descending.
    pub fn toggle_sort_order(&mut self) {
        self.sort_ascending = !self.sort_ascending;
    }

    pub fn toggle_only_active(&mut self) {
        self.only_active = !self.only_active;
    }

    /// Switches between per-process and per-thread sampling.
    ///
    /// Takes effect on the next sample; the highlight is dropped because
    /// task ids change meaning.
    pub fn toggle_processes(&mut self) {
        self.processes_only = !self.processes_only;
        self.selected = None;
    }

    pub fn toggle_accumulated(&mut self) {
        self.accumulated = !self.accumulated;
    }
}

/// Presentation options fixed at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Always use kilobytes instead of a human friendly unit
    pub kilobytes: bool,
    /// Prefix every batch line with a timestamp
    pub timestamp: bool,
    /// Header suppression level (0 = full headers)
    pub quiet: u8,
    /// Show the full command line instead of the command name
    pub full_cmdline: bool,
    /// Hide the shortcut line in interactive mode
    pub no_help: bool,
}

/// Loop parameters fixed at startup
#[derive(Debug, Clone)]
pub struct Params {
    /// Number of frames before exiting (None = unbounded)
    pub iterations: Option<u64>,
    /// Delay between cycles
    pub delay: Duration,
    /// Non-interactive output
    pub batch: bool,
    pub display: DisplayOptions,
    /// Where logs are written, if anywhere
    pub log_file: Option<PathBuf>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            iterations: None,
            delay: Duration::from_secs(1),
            batch: false,
            display: DisplayOptions::default(),
            log_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sorts_by_io_descending() {
        let config = RuntimeConfig::default();
        assert_eq!(config.sort_column, SortColumn::Io);
        assert!(!config.sort_ascending);
    }

    #[test]
    fn test_toggles_twice_restore() {
        let original = RuntimeConfig::default();
        let mut config = original.clone();

        config.toggle_sort_order();
        config.toggle_only_active();
        config.toggle_accumulated();
        config.toggle_processes();
        assert_ne!(config, original);

        config.toggle_sort_order();
        config.toggle_only_active();
        config.toggle_accumulated();
        config.toggle_processes();
        assert_eq!(config, original);
    }

    #[test]
    fn test_direction_survives_column_change() {
        let mut config = RuntimeConfig::default();
        assert!(!config.sort_ascending);
        config.toggle_sort_order();
        config.next_column();
        assert_eq!(config.sort_column, SortColumn::Command);
        assert!(config.sort_ascending);
        config.prev_column();
        config.prev_column();
        assert_eq!(config.sort_column, SortColumn::Swapin);
        assert!(config.sort_ascending);
    }

    #[test]
    fn test_task_query_mirrors_scope_and_filters() {
        let config = RuntimeConfig {
            processes_only: true,
            user_filter: Some(1000),
            task_filter: Some(42),
            ..RuntimeConfig::default()
        };
        let query = config.task_query();
        assert!(query.processes_only);
        assert_eq!(query.user_filter, Some(1000));
        assert_eq!(query.task_filter, Some(42));
    }

    #[test]
    fn test_scope_toggle_drops_selection() {
        let mut config = RuntimeConfig { selected: Some(7), ..RuntimeConfig::default() };
        config.toggle_processes();
        assert_eq!(config.selected, None);
    }
}
