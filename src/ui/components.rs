//! Frame components: header, totals, column headers, footer
//!
//! The `*_line` builders return plain text shared by both renderers; the
//! `render_*` functions draw the interactive variants with colors.

use std::io::{self, Write};

use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};

use crate::app::{Controls, DisplayOptions, RuntimeConfig, SortColumn, ViewMode};
use crate::constants::{APP_VERSION, DISPLAY_NAME};

use super::utils::{format_value, truncate_string};
use super::Frame;

/// Columns in display order
const COLUMNS: [SortColumn; 8] = [
    SortColumn::Tid,
    SortColumn::Priority,
    SortColumn::User,
    SortColumn::DiskRead,
    SortColumn::DiskWrite,
    SortColumn::Swapin,
    SortColumn::Io,
    SortColumn::Command,
];

/// Builds the two totals lines of a frame
pub fn totals_lines(frame: &Frame<'_>) -> [String; 2] {
    let accumulated = frame.config.accumulated;
    let kilobytes = frame.display.kilobytes;
    let (total_read, total_write) = frame.totals;
    let current = |value: Option<f64>| match value {
        Some(rate) => format_value(rate, kilobytes, false),
        None => "n/a".to_string(),
    };

    [
        format!(
            "Total DISK READ: {:>14} | Total DISK WRITE: {:>14}",
            format_value(total_read, kilobytes, accumulated),
            format_value(total_write, kilobytes, accumulated),
        ),
        format!(
            "Current DISK READ: {:>12} | Current DISK WRITE: {:>12}",
            current(frame.current.map(|c| c.0)),
            current(frame.current.map(|c| c.1)),
        ),
    ]
}

/// Builds the column header line.
///
/// With `mark_sort`, the active sort column carries a direction arrow.
pub fn column_header_line(config: &RuntimeConfig, mark_sort: bool) -> String {
    let title = |column: SortColumn| {
        let name = column.name(config.processes_only);
        if mark_sort && column == config.sort_column {
            format!("{}{}", name, if config.sort_ascending { "↑" } else { "↓" })
        } else {
            name.to_string()
        }
    };
    let [tid, prio, user, read, write, swapin, io, command] = COLUMNS.map(title);
    format!(
        "{:>7} {:<5} {:<8} {:>12} {:>12} {:>8} {:>8}  {}",
        tid, prio, user, read, write, swapin, io, command
    )
}

/// Renders the application header
pub fn render_header<W: Write>(out: &mut W, frame: &Frame<'_>, width: usize) -> io::Result<()> {
    let config = frame.config;
    let scope = if config.processes_only { "processes" } else { "threads" };
    let mode = if config.accumulated { "accumulated" } else { "bandwidth" };
    let mut title = format!(
        " {} v{}  |  {:.1}s  |  {}  |  {}",
        DISPLAY_NAME,
        APP_VERSION,
        frame.delay.as_secs_f64(),
        scope,
        mode
    );
    if config.only_active {
        title.push_str("  |  only active");
    }
    execute!(
        out,
        SetBackgroundColor(Color::DarkBlue),
        SetForegroundColor(Color::White),
        Print(format!("{:width$}", truncate_string(&title, width), width = width)),
        ResetColor,
        Print("\r\n")
    )
}

/// Renders the totals lines
pub fn render_totals<W: Write>(out: &mut W, frame: &Frame<'_>, width: usize) -> io::Result<()> {
    for line in totals_lines(frame) {
        execute!(
            out,
            SetForegroundColor(Color::Cyan),
            Print(format!("{:width$}", truncate_string(&line, width), width = width)),
            ResetColor,
            Print("\r\n")
        )?;
    }
    Ok(())
}

/// Renders column headers
pub fn render_column_headers<W: Write>(out: &mut W, config: &RuntimeConfig, width: usize) -> io::Result<()> {
    let header = column_header_line(config, true);
    execute!(
        out,
        SetBackgroundColor(Color::DarkGrey),
        SetForegroundColor(Color::White),
        Print(format!("{:width$}", truncate_string(&header, width), width = width)),
        ResetColor,
        Print("\r\n")
    )
}

/// Renders the footer (status line or priority dialog, then the key line)
pub fn render_footer<W: Write>(
    out: &mut W,
    controls: &Controls,
    display: &DisplayOptions,
    width: usize,
) -> io::Result<()> {
    if let ViewMode::IoprioDialog { tid, priority } = controls.mode {
        let prompt = format!(
            " I/O priority of {}: < {} > level {}   Left/Right: class  Up/Down: level  Enter: apply  Esc: cancel",
            tid,
            priority.class.name(),
            priority.level
        );
        execute!(
            out,
            SetBackgroundColor(Color::DarkYellow),
            SetForegroundColor(Color::Black),
            Print(format!("{:width$}", truncate_string(&prompt, width), width = width)),
            ResetColor,
            Print("\r\n")
        )?;
    } else if let Some(ref msg) = controls.status {
        execute!(
            out,
            SetForegroundColor(Color::Yellow),
            Print(format!(" {}", truncate_string(msg, width.saturating_sub(2)))),
            ResetColor,
            Print("\r\n")
        )?;
    } else {
        execute!(out, Print("\r\n"))?;
    }

    if display.no_help {
        return Ok(());
    }
    let keys = " keys: any: refresh  q: quit  i: ionice  o: active  p: procs  a: accum  \
                r: reverse  left/right: sort  ?: help";
    execute!(
        out,
        SetBackgroundColor(Color::DarkGrey),
        SetForegroundColor(Color::White),
        Print(format!("{:width$}", truncate_string(keys, width), width = width)),
        ResetColor
    )
}
