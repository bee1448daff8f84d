//! Task list rendering

use std::io::{self, Write};

use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};

use crate::app::{DeltaRecord, DisplayOptions, RuntimeConfig};
use crate::constants::MIN_COMMAND_WIDTH;
use crate::system::{priority_label, UserNames};

use super::utils::{format_value, io_color, truncate_string};

/// Row text split around the IO column, which is colored separately
struct RowParts {
    prefix: String,
    io: String,
    command: String,
}

fn row_parts(
    record: &DeltaRecord,
    users: &mut UserNames,
    config: &RuntimeConfig,
    display: &DisplayOptions,
) -> RowParts {
    let task = &record.task;
    let prefix = format!(
        "{:>7} {:<5} {:<8} {:>12} {:>12} {:>6.2} % ",
        task.tid,
        priority_label(task.priority),
        truncate_string(users.name(task.uid), 8),
        format_value(record.read_value(config.accumulated), display.kilobytes, config.accumulated),
        format_value(record.write_value(config.accumulated), display.kilobytes, config.accumulated),
        record.swapin_percent,
    );
    RowParts {
        prefix,
        io: format!("{:>6.2} %", record.io_percent),
        command: task.display_name(display.full_cmdline).to_string(),
    }
}

/// Formats one task as a plain text line
pub fn format_row(
    record: &DeltaRecord,
    users: &mut UserNames,
    config: &RuntimeConfig,
    display: &DisplayOptions,
) -> String {
    let parts = row_parts(record, users, config, display);
    format!("{}{}  {}", parts.prefix, parts.io, parts.command)
}

/// Renders the scrollable task list.
///
/// Highlights the selected task and colors the IO column by wait share.
/// Returns the scroll offset used, so the caller can keep it stable.
#[allow(clippy::too_many_arguments)]
pub fn render_task_list<W: Write>(
    out: &mut W,
    records: &[DeltaRecord],
    users: &mut UserNames,
    config: &RuntimeConfig,
    display: &DisplayOptions,
    scroll_offset: usize,
    visible_rows: usize,
    width: usize,
) -> io::Result<usize> {
    // Adjust scroll offset to keep selection visible
    let mut scroll_offset = scroll_offset.min(records.len().saturating_sub(1));
    if let Some(index) = config.selected.and_then(|tid| records.iter().position(|r| r.task.tid == tid)) {
        if index < scroll_offset {
            scroll_offset = index;
        } else if index >= scroll_offset + visible_rows {
            scroll_offset = index + 1 - visible_rows;
        }
    }

    for record in records.iter().skip(scroll_offset).take(visible_rows) {
        let parts = row_parts(record, users, config, display);
        let used = parts.prefix.chars().count() + parts.io.chars().count() + 2;
        let command_space = width.saturating_sub(used).max(MIN_COMMAND_WIDTH);
        let suffix = format!("  {}", truncate_string(&parts.command, command_space));
        let io_col = io_color(record.io_percent);
        let rest = width.saturating_sub(parts.prefix.chars().count() + parts.io.chars().count());

        if config.selected == Some(record.task.tid) {
            // Selected row - use background color, IO still colored
            execute!(
                out,
                SetBackgroundColor(Color::DarkCyan),
                SetForegroundColor(Color::White),
                Print(&parts.prefix),
                SetForegroundColor(io_col),
                Print(&parts.io),
                SetForegroundColor(Color::White),
                Print(format!("{:rest$}", suffix, rest = rest)),
                ResetColor,
            )?;
        } else {
            execute!(
                out,
                Print(&parts.prefix),
                SetForegroundColor(io_col),
                Print(&parts.io),
                ResetColor,
                Print(format!("{:rest$}", suffix, rest = rest)),
            )?;
        }
        execute!(out, Print("\r\n"))?;
    }

    // Fill remaining space
    for _ in records.len().saturating_sub(scroll_offset).min(visible_rows)..visible_rows {
        execute!(out, Print(format!("{:width$}\r\n", "", width = width)))?;
    }

    Ok(scroll_offset)
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::system::task::fixtures::record;
    use crate::system::{IoClass, IoPriority};

    fn delta(tid: u32) -> DeltaRecord {
        let mut task = record(tid, 4096, 0, Instant::now());
        task.priority = Some(IoPriority::new(IoClass::BestEffort, 4));
        task.cmdline = Some(format!("/usr/bin/task{} --flag", tid));
        DeltaRecord {
            io_percent: 12.5,
            ..DeltaRecord::idle(task)
        }
    }

    #[test]
    fn test_format_row_columns() {
        let mut users = UserNames::new();
        let config = RuntimeConfig::default();
        let display = DisplayOptions::default();
        let line = format_row(&delta(42), &mut users, &config, &display);
        assert!(line.trim_start().starts_with("42 be/4"));
        assert!(line.contains("0.00 B/s"));
        assert!(line.contains("12.50 %"));
        assert!(line.ends_with("  task42"));
    }

    #[test]
    fn test_format_row_accumulated_and_full_cmdline() {
        let mut users = UserNames::new();
        let config = RuntimeConfig { accumulated: true, ..RuntimeConfig::default() };
        let display = DisplayOptions { full_cmdline: true, ..DisplayOptions::default() };
        let line = format_row(&delta(7), &mut users, &config, &display);
        assert!(line.contains("4.00 KB"));
        assert!(!line.contains("/s"));
        assert!(line.ends_with("/usr/bin/task7 --flag"));
    }

    #[test]
    fn test_render_keeps_selection_visible() {
        let records: Vec<DeltaRecord> = (1..=10).map(delta).collect();
        let mut users = UserNames::new();
        let config = RuntimeConfig { selected: Some(9), ..RuntimeConfig::default() };
        let display = DisplayOptions::default();
        let mut out = Vec::new();

        let offset = render_task_list(&mut out, &records, &mut users, &config, &display, 0, 3, 100).unwrap();
        assert_eq!(offset, 6);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("\r\n").count(), 3);
        assert!(text.contains("task9"));
        assert!(!text.contains("task1 "));
    }
}
