//! Batch (non-interactive) renderer
//!
//! Prints one self-contained text frame per cycle. Never reads input; the
//! wait step is a plain timed sleep that only cancellation cuts short.

use std::io::{self, Write};
use std::time::Duration;

use chrono::Local;

use crate::app::{CancelToken, RuntimeConfig};
use crate::system::UserNames;

use super::components::{column_header_line, totals_lines};
use super::task_list::format_row;
use super::{Frame, View, WaitOutcome};

pub struct BatchView<W: Write> {
    out: W,
    users: UserNames,
}

impl BatchView<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> BatchView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            users: UserNames::new(),
        }
    }

    #[cfg(test)]
    fn output(&self) -> &W {
        &self.out
    }
}

impl<W: Write> View for BatchView<W> {
    fn render(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let display = frame.display;
        let mut lines = Vec::with_capacity(frame.records.len() + 3);

        if display.quiet < 3 {
            lines.extend(totals_lines(frame));
        }
        if display.quiet == 0 || (display.quiet == 1 && frame.cycle == 1) {
            lines.push(column_header_line(frame.config, false));
        }
        for record in frame.records {
            lines.push(format_row(record, &mut self.users, frame.config, display));
        }

        let stamp = display
            .timestamp
            .then(|| Local::now().format("%H:%M:%S").to_string());
        for line in &lines {
            match stamp {
                Some(ref stamp) => writeln!(self.out, "{} {}", stamp, line)?,
                None => writeln!(self.out, "{}", line)?,
            }
        }
        self.out.flush()
    }

    fn wait(
        &mut self,
        timeout: Duration,
        cancel: &CancelToken,
        _config: &mut RuntimeConfig,
    ) -> io::Result<WaitOutcome> {
        Ok(if cancel.wait_timeout(timeout) {
            WaitOutcome::Cancelled
        } else {
            WaitOutcome::Elapsed
        })
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::app::{DeltaRecord, DisplayOptions};
    use crate::system::task::fixtures::record;

    fn render(display: DisplayOptions, cycles: u64) -> String {
        let records = vec![DeltaRecord::idle(record(5, 0, 0, Instant::now()))];
        let config = RuntimeConfig::default();
        let mut view = BatchView::new(Vec::new());
        for cycle in 1..=cycles {
            let frame = Frame::new(&records, None, &config, &display, Duration::from_secs(1), cycle);
            view.render(&frame).unwrap();
        }
        String::from_utf8(view.output().clone()).unwrap()
    }

    #[test]
    fn test_full_frame() {
        let text = render(DisplayOptions::default(), 1);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Total DISK READ"));
        assert!(lines[1].starts_with("Current DISK READ"));
        assert!(lines[2].contains("COMMAND"));
        assert!(lines[3].ends_with("task5"));
    }

    #[test]
    fn test_quiet_levels() {
        let once = render(DisplayOptions { quiet: 1, ..DisplayOptions::default() }, 2);
        assert_eq!(once.matches("COMMAND").count(), 1);
        assert_eq!(once.matches("Total DISK READ").count(), 2);

        let never = render(DisplayOptions { quiet: 2, ..DisplayOptions::default() }, 2);
        assert_eq!(never.matches("COMMAND").count(), 0);

        let bare = render(DisplayOptions { quiet: 3, ..DisplayOptions::default() }, 2);
        assert_eq!(bare.lines().count(), 2);
    }

    #[test]
    fn test_timestamp_prefix() {
        let text = render(DisplayOptions { timestamp: true, ..DisplayOptions::default() }, 1);
        for line in text.lines() {
            let (stamp, _) = line.split_at(8);
            assert_eq!(stamp.matches(':').count(), 2, "line {:?}", line);
        }
    }

    #[test]
    fn test_wait_reports_cancellation() {
        let mut view = BatchView::new(Vec::new());
        let mut config = RuntimeConfig::default();
        let cancel = CancelToken::new();
        assert_eq!(
            view.wait(Duration::from_millis(5), &cancel, &mut config).unwrap(),
            WaitOutcome::Elapsed
        );
        cancel.cancel();
        assert_eq!(
            view.wait(Duration::from_secs(10), &cancel, &mut config).unwrap(),
            WaitOutcome::Cancelled
        );
    }

    #[test]
    fn test_empty_frame_prints_headers_only() {
        let config = RuntimeConfig { user_filter: Some(4242), ..RuntimeConfig::default() };
        let display = DisplayOptions::default();
        let mut view = BatchView::new(Vec::new());
        view.render(&Frame::new(&[], None, &config, &display, Duration::from_secs(1), 1)).unwrap();
        assert_eq!(String::from_utf8(view.output().clone()).unwrap().lines().count(), 3);
    }
}
