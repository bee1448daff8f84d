//! Input/keyboard event handling
//!
//! This module handles all keyboard input for the interactive modes:
//! - Task list mode (sort, toggles, navigation)
//! - Help overlay (any key closes)
//! - I/O priority dialog (class/level selection)
//!
//! Keys only mutate `RuntimeConfig` and the input mode; they never touch
//! the sampled data.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, info};

use crate::system::{set_io_priority, IoClass, IoPriority, PriorityResult};

use super::{RuntimeConfig, ViewMode};

/// Applies an I/O priority to a task
pub type PrioritySetter = fn(u32, IoPriority) -> PriorityResult<()>;

/// Result of handling a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Configuration or mode changed; redraw without sampling
    Reconfigured,
    /// Unrecognized key; start the next cycle now
    Refresh,
    /// Nothing to do (key release, repeat)
    Ignored,
    /// Operator asked to quit
    Quit,
    /// Ctrl+C in raw mode, same as a termination signal
    Cancel,
}

/// A row of the last rendered frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRow {
    pub tid: u32,
    pub priority: Option<IoPriority>,
}

/// Interactive input state owned by the view
pub struct Controls {
    /// Current input mode
    pub mode: ViewMode,
    /// Status message to display (if any)
    pub status: Option<String>,
    set_priority: PrioritySetter,
}

impl Default for Controls {
    fn default() -> Self {
        Self::new(set_io_priority)
    }
}

impl Controls {
    pub fn new(set_priority: PrioritySetter) -> Self {
        Self {
            mode: ViewMode::default(),
            status: None,
            set_priority,
        }
    }

    /// Dispatches a key to the handler for the current mode
    pub fn handle_key(&mut self, key: KeyEvent, config: &mut RuntimeConfig, rows: &[TaskRow]) -> KeyAction {
        // Only handle key PRESS events, ignore Release and Repeat
        if key.kind != KeyEventKind::Press {
            return KeyAction::Ignored;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return KeyAction::Cancel;
        }

        // Clear status message on any key press
        self.status = None;

        match self.mode {
            ViewMode::TaskList => self.handle_task_list_key(key.code, config, rows),
            ViewMode::Help => {
                self.mode = ViewMode::TaskList;
                KeyAction::Reconfigured
            }
            ViewMode::IoprioDialog { tid, priority } => self.handle_dialog_key(key.code, tid, priority),
        }
    }

    /// Handles key events in task list mode
    fn handle_task_list_key(&mut self, code: KeyCode, config: &mut RuntimeConfig, rows: &[TaskRow]) -> KeyAction {
        let tids: Vec<u32> = rows.iter().map(|r| r.tid).collect();
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return KeyAction::Quit,
            KeyCode::Left => config.prev_column(),
            KeyCode::Right => config.next_column(),
            KeyCode::Char('r') | KeyCode::Char('R') => config.toggle_sort_order(),
            KeyCode::Char('o') | KeyCode::Char('O') => config.toggle_only_active(),
            KeyCode::Char('p') | KeyCode::Char('P') => {
                config.toggle_processes();
                self.status = Some(format!(
                    "Showing {} from the next refresh",
                    if config.processes_only { "processes" } else { "threads" }
                ));
            }
            KeyCode::Char('a') | KeyCode::Char('A') => config.toggle_accumulated(),
            KeyCode::Char('i') | KeyCode::Char('I') => self.open_dialog(config, rows),
            KeyCode::Char('?') => self.mode = ViewMode::Help,
            KeyCode::Up => config.move_up(&tids),
            KeyCode::Down => config.move_down(&tids),
            KeyCode::Home => config.jump_to_start(&tids),
            KeyCode::End => config.jump_to_end(&tids),
            _ => return KeyAction::Refresh,
        }
        debug!(?config, "runtime configuration changed");
        KeyAction::Reconfigured
    }

    /// Opens the priority dialog for the highlighted task
    fn open_dialog(&mut self, config: &RuntimeConfig, rows: &[TaskRow]) {
        let row = config
            .selected
            .and_then(|tid| rows.iter().find(|r| r.tid == tid))
            .or_else(|| rows.first());

        match row {
            Some(row) => {
                let priority = row
                    .priority
                    .unwrap_or(IoPriority::new(IoClass::BestEffort, 4));
                self.mode = ViewMode::IoprioDialog { tid: row.tid, priority };
            }
            None => self.status = Some("No task to change".to_string()),
        }
    }

    /// Handles key events while the priority dialog is open
    fn handle_dialog_key(&mut self, code: KeyCode, tid: u32, priority: IoPriority) -> KeyAction {
        let mut edited = priority;
        match code {
            KeyCode::Left => edited = IoPriority::new(priority.class.prev(), priority.level),
            KeyCode::Right => edited = IoPriority::new(priority.class.next(), priority.level),
            KeyCode::Up => edited = priority.raise(),
            KeyCode::Down => edited = priority.lower(),
            KeyCode::Enter => {
                self.mode = ViewMode::TaskList;
                self.status = Some(match (self.set_priority)(tid, priority) {
                    Ok(()) => {
                        info!(tid, %priority, "changed I/O priority");
                        format!("Task {}: I/O priority set to {}", tid, priority)
                    }
                    Err(e) => format!("Failed to set I/O priority: {}", e),
                });
                return KeyAction::Reconfigured;
            }
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.mode = ViewMode::TaskList;
                return KeyAction::Reconfigured;
            }
            _ => return KeyAction::Ignored,
        }
        self.mode = ViewMode::IoprioDialog { tid, priority: edited };
        KeyAction::Reconfigured
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SortColumn;
    use crate::system::error::PriorityError;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn rows() -> Vec<TaskRow> {
        vec![
            TaskRow { tid: 10, priority: Some(IoPriority::new(IoClass::BestEffort, 4)) },
            TaskRow { tid: 20, priority: None },
        ]
    }

    fn accept(_tid: u32, _priority: IoPriority) -> PriorityResult<()> {
        Ok(())
    }

    fn refuse(tid: u32, _priority: IoPriority) -> PriorityResult<()> {
        Err(PriorityError::PermissionDenied { tid })
    }

    #[test]
    fn test_sort_keys_reconfigure() {
        let mut controls = Controls::new(accept);
        let mut config = RuntimeConfig::default();

        assert_eq!(controls.handle_key(press(KeyCode::Right), &mut config, &rows()), KeyAction::Reconfigured);
        assert_eq!(config.sort_column, SortColumn::Command);
        assert_eq!(controls.handle_key(press(KeyCode::Left), &mut config, &rows()), KeyAction::Reconfigured);
        assert_eq!(config.sort_column, SortColumn::Io);

        controls.handle_key(press(KeyCode::Char('r')), &mut config, &rows());
        assert!(config.sort_ascending);
    }

    #[test]
    fn test_toggle_keys() {
        let mut controls = Controls::new(accept);
        let mut config = RuntimeConfig::default();
        for key in ['o', 'p', 'a'] {
            assert_eq!(
                controls.handle_key(press(KeyCode::Char(key)), &mut config, &rows()),
                KeyAction::Reconfigured
            );
        }
        assert!(config.only_active);
        assert!(config.processes_only);
        assert!(config.accumulated);
    }

    #[test]
    fn test_quit_cancel_and_refresh() {
        let mut controls = Controls::new(accept);
        let mut config = RuntimeConfig::default();
        assert_eq!(controls.handle_key(press(KeyCode::Char('q')), &mut config, &rows()), KeyAction::Quit);
        assert_eq!(controls.handle_key(press(KeyCode::Char('x')), &mut config, &rows()), KeyAction::Refresh);
        assert_eq!(controls.handle_key(press(KeyCode::Char(' ')), &mut config, &rows()), KeyAction::Refresh);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(controls.handle_key(ctrl_c, &mut config, &rows()), KeyAction::Cancel);
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn test_help_overlay_closes_on_any_key() {
        let mut controls = Controls::new(accept);
        let mut config = RuntimeConfig::default();
        controls.handle_key(press(KeyCode::Char('?')), &mut config, &rows());
        assert!(controls.mode.is_help());
        controls.handle_key(press(KeyCode::Char('z')), &mut config, &rows());
        assert_eq!(controls.mode, ViewMode::TaskList);
    }

    #[test]
    fn test_priority_dialog_applies_edit() {
        let mut controls = Controls::new(accept);
        let mut config = RuntimeConfig { selected: Some(10), ..RuntimeConfig::default() };

        controls.handle_key(press(KeyCode::Char('i')), &mut config, &rows());
        assert!(matches!(controls.mode, ViewMode::IoprioDialog { tid: 10, .. }));

        controls.handle_key(press(KeyCode::Up), &mut config, &rows());
        controls.handle_key(press(KeyCode::Left), &mut config, &rows());
        assert_eq!(
            controls.mode,
            ViewMode::IoprioDialog { tid: 10, priority: IoPriority::new(IoClass::RealTime, 3) }
        );

        controls.handle_key(press(KeyCode::Enter), &mut config, &rows());
        assert_eq!(controls.mode, ViewMode::TaskList);
        assert_eq!(controls.status.as_deref(), Some("Task 10: I/O priority set to rt/3"));
    }

    #[test]
    fn test_priority_dialog_reports_failure() {
        let mut controls = Controls::new(refuse);
        let mut config = RuntimeConfig::default();
        controls.handle_key(press(KeyCode::Char('i')), &mut config, &rows());
        controls.handle_key(press(KeyCode::Enter), &mut config, &rows());
        let status = controls.status.clone().unwrap();
        assert!(status.starts_with("Failed to set I/O priority"));
    }

    #[test]
    fn test_priority_dialog_escape_cancels() {
        let mut controls = Controls::new(refuse);
        let mut config = RuntimeConfig::default();
        controls.handle_key(press(KeyCode::Char('i')), &mut config, &rows());
        controls.handle_key(press(KeyCode::Esc), &mut config, &rows());
        assert_eq!(controls.mode, ViewMode::TaskList);
        assert!(controls.status.is_none());
    }

    #[test]
    fn test_dialog_without_rows() {
        let mut controls = Controls::new(accept);
        let mut config = RuntimeConfig::default();
        controls.handle_key(press(KeyCode::Char('i')), &mut config, &[]);
        assert_eq!(controls.mode, ViewMode::TaskList);
        assert!(controls.status.is_some());
    }
}
