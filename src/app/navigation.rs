//! Highlight navigation over the rows of the last frame

use super::RuntimeConfig;

impl RuntimeConfig {
    /// Position of the highlighted task among `rows`, if visible
    pub fn selected_index(&self, rows: &[u32]) -> Option<usize> {
        let selected = self.selected?;
        rows.iter().position(|&tid| tid == selected)
    }

    /// Moves the highlight up by one row.
    pub fn move_up(&mut self, rows: &[u32]) {
        let index = self.selected_index(rows).map_or(0, |i| i.saturating_sub(1));
        self.selected = rows.get(index).copied();
    }

    /// Moves the highlight down by one row.
    pub fn move_down(&mut self, rows: &[u32]) {
        let index = self
            .selected_index(rows)
            .map_or(0, |i| (i + 1).min(rows.len().saturating_sub(1)));
        self.selected = rows.get(index).copied();
    }

    /// Jumps the highlight to the first task.
    pub fn jump_to_start(&mut self, rows: &[u32]) {
        self.selected = rows.first().copied();
    }

    /// Jumps the highlight to the last task.
    pub fn jump_to_end(&mut self, rows: &[u32]) {
        self.selected = rows.last().copied();
    }
}
