//! Interactive full-screen renderer
//!
//! Owns the terminal for its whole lifetime through `TerminalGuard` and
//! provides the keyboard-driven wait step. Terminal state is restored by
//! `finish` or, failing that, when the guard is dropped.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event},
    execute,
    terminal::{
        self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use tracing::{debug, warn};

use crate::app::{CancelToken, Controls, KeyAction, RuntimeConfig, TaskRow};
use crate::constants::{VISIBLE_ROWS_OVERHEAD, WAIT_SLICE_MS};
use crate::system::UserNames;

use super::components::{render_column_headers, render_footer, render_header, render_totals};
use super::help::render_help_overlay;
use super::task_list::render_task_list;
use super::{Frame, View, WaitOutcome};

/// Raw mode plus alternate screen, released exactly once
struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    fn acquire() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self { active: true };
        execute!(io::stdout(), EnterAlternateScreen, DisableLineWrap, Hide)?;
        Ok(guard)
    }

    fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let screen = execute!(io::stdout(), Show, EnableLineWrap, LeaveAlternateScreen);
        let raw = terminal::disable_raw_mode();
        debug!("terminal restored");
        screen.and(raw)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!(error = %e, "failed to restore terminal");
        }
    }
}

pub struct InteractiveView {
    stdout: io::Stdout,
    guard: TerminalGuard,
    controls: Controls,
    /// Rows of the last frame, in display order
    rows: Vec<TaskRow>,
    users: UserNames,
    scroll_offset: usize,
}

impl InteractiveView {
    /// Takes over the terminal
    pub fn enter() -> io::Result<Self> {
        let guard = TerminalGuard::acquire()?;
        Ok(Self {
            stdout: io::stdout(),
            guard,
            controls: Controls::default(),
            rows: Vec::new(),
            users: UserNames::new(),
            scroll_offset: 0,
        })
    }
}

impl View for InteractiveView {
    fn render(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        let width = width as usize;
        let height = height as usize;
        let visible_rows = height.saturating_sub(VISIBLE_ROWS_OVERHEAD);

        self.rows = frame
            .records
            .iter()
            .map(|r| TaskRow { tid: r.task.tid, priority: r.task.priority })
            .collect();

        let out = &mut self.stdout;
        execute!(out, MoveTo(0, 0), Clear(ClearType::All))?;
        render_header(out, frame, width)?;
        render_totals(out, frame, width)?;
        render_column_headers(out, frame.config, width)?;
        self.scroll_offset = render_task_list(
            out,
            frame.records,
            &mut self.users,
            frame.config,
            frame.display,
            self.scroll_offset,
            visible_rows,
            width,
        )?;
        render_footer(out, &self.controls, frame.display, width)?;

        if self.controls.mode.is_help() {
            render_help_overlay(out, width, height)?;
        }
        out.flush()
    }

    fn wait(
        &mut self,
        timeout: Duration,
        cancel: &CancelToken,
        config: &mut RuntimeConfig,
    ) -> io::Result<WaitOutcome> {
        let deadline = Instant::now() + timeout;
        loop {
            if cancel.is_cancelled() {
                return Ok(WaitOutcome::Cancelled);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(WaitOutcome::Elapsed);
            }
            if !event::poll(remaining.min(Duration::from_millis(WAIT_SLICE_MS)))? {
                continue;
            }

            match event::read()? {
                Event::Key(key) => match self.controls.handle_key(key, config, &self.rows) {
                    KeyAction::Reconfigured => return Ok(WaitOutcome::Reconfigured),
                    KeyAction::Refresh => return Ok(WaitOutcome::Refresh),
                    KeyAction::Quit => return Ok(WaitOutcome::Quit),
                    KeyAction::Cancel => {
                        cancel.cancel();
                        return Ok(WaitOutcome::Cancelled);
                    }
                    KeyAction::Ignored => {}
                },
                Event::Resize(..) => return Ok(WaitOutcome::Reconfigured),
                _ => {}
            }
        }
    }

    fn finish(&mut self) -> io::Result<()> {
        self.guard.restore()
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_after_release_is_noop() {
        let mut guard = TerminalGuard { active: false };
        assert!(guard.restore().is_ok());
        assert!(guard.restore().is_ok());
        assert!(!guard.active);
    }
}
