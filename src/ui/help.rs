//! Help overlay rendering

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    execute,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};

use crate::constants::{HELP_DIALOG_WIDTH, HELP_KEY_COL_WIDTH};

/// Help content definition
const HELP_LINES: &[(&str, &str)] = &[
    ("", ""),
    ("SORTING", ""),
    ("  Left/Right", "Previous/next sort column"),
    ("  r", "Reverse sort order"),
    ("", ""),
    ("DISPLAY", ""),
    ("  o", "Only tasks doing I/O"),
    ("  p", "Processes / threads"),
    ("  a", "Accumulated / bandwidth"),
    ("", ""),
    ("TASKS", ""),
    ("  Up/Down", "Move highlight"),
    ("  Home/End", "Jump to first/last task"),
    ("  i", "Change I/O priority"),
    ("", ""),
    ("OTHER", ""),
    ("  any key", "Refresh now"),
    ("  ?", "Show this help"),
    ("  q", "Quit"),
    ("  Ctrl+C", "Quit"),
];

/// Renders the help overlay showing all keyboard shortcuts
pub fn render_help_overlay<W: Write>(out: &mut W, width: usize, height: usize) -> io::Result<()> {
    let box_width = HELP_DIALOG_WIDTH.min(width);
    let inner_width = box_width.saturating_sub(2);
    let box_height = (HELP_LINES.len() + 4).min(height.saturating_sub(2));
    if box_height < 4 || inner_width <= HELP_KEY_COL_WIDTH {
        return Ok(());
    }
    let start_x = (width - box_width) / 2;
    let start_y = (height.saturating_sub(box_height)) / 2;

    let fill = |out: &mut W, y: usize, left: &str, body: &str, right: &str, fg: Color| -> io::Result<()> {
        execute!(
            out,
            MoveTo(start_x as u16, y as u16),
            SetBackgroundColor(Color::DarkBlue),
            SetForegroundColor(fg),
            Print(left),
            Print(format!("{:<w$}", body, w = inner_width)),
            Print(right),
            ResetColor
        )
    };

    fill(out, start_y, "┌", &"─".repeat(inner_width), "┐", Color::White)?;

    let title = "Keyboard Shortcuts";
    let title_line = format!("{:^w$}", title, w = inner_width);
    fill(out, start_y + 1, "│", &title_line, "│", Color::Yellow)?;
    fill(out, start_y + 2, "├", &"─".repeat(inner_width), "┤", Color::White)?;

    let body_rows = box_height - 4;
    for (i, (key, desc)) in HELP_LINES.iter().take(body_rows).enumerate() {
        let y = start_y + 3 + i;
        if desc.is_empty() {
            // Blank line or section header
            let header = if key.is_empty() { String::new() } else { format!(" {}", key) };
            fill(out, y, "│", &header, "│", Color::Cyan)?;
        } else {
            execute!(
                out,
                MoveTo(start_x as u16, y as u16),
                SetBackgroundColor(Color::DarkBlue),
                SetForegroundColor(Color::White),
                Print("│"),
                SetForegroundColor(Color::Green),
                Print(format!(" {:<kw$}", key, kw = HELP_KEY_COL_WIDTH)),
                SetForegroundColor(Color::White),
                Print(format!("{:<dw$}", desc, dw = inner_width - HELP_KEY_COL_WIDTH - 1)),
                Print("│"),
                ResetColor
            )?;
        }
    }

    // Bottom border with hint
    let hint = " Press any key to close ";
    let bottom = format!("{:─^w$}", hint, w = inner_width);
    fill(out, start_y + box_height - 1, "└", &bottom, "┘", Color::White)?;

    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_draws_every_shortcut_when_it_fits() {
        let mut out = Vec::new();
        render_help_overlay(&mut out, 100, 40).unwrap();
        let text = String::from_utf8(out).unwrap();
        for (key, desc) in HELP_LINES.iter().filter(|(_, d)| !d.is_empty()) {
            assert!(text.contains(key.trim()), "missing key {}", key);
            assert!(text.contains(desc), "missing {}", desc);
        }
        assert!(text.contains("Press any key to close"));
    }

    #[test]
    fn test_overlay_skipped_on_tiny_terminal() {
        let mut out = Vec::new();
        render_help_overlay(&mut out, 10, 3).unwrap();
        assert!(out.is_empty());
    }
}
