//! View mode enum for the interactive display
//!
//! Defines mutually exclusive input modes, ensuring only one
//! mode can be active at a time.

use crate::system::IoPriority;

/// The current input mode of the interactive view.
///
/// The mode determines how keyboard input is handled and what
/// overlay is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Normal task list view (default mode)
    #[default]
    TaskList,

    /// Help overlay showing keyboard shortcuts
    Help,

    /// I/O priority dialog for one task
    IoprioDialog {
        /// Task being edited
        tid: u32,
        /// Priority that Enter will apply
        priority: IoPriority,
    },
}

impl ViewMode {
    /// Returns true if showing help overlay
    #[inline]
    pub fn is_help(&self) -> bool {
        matches!(self, ViewMode::Help)
    }
}
