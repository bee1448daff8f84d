//! Sorting options for the task list

use std::cmp::Ordering;

use super::DeltaRecord;

/// Sort column options, in on-screen column order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Tid,
    Priority,
    User,
    DiskRead,
    DiskWrite,
    Swapin,
    Io,
    Command,
}

impl SortColumn {
    /// Cycle to the next sort option
    pub fn next(self) -> Self {
        match self {
            SortColumn::Tid => SortColumn::Priority,
            SortColumn::Priority => SortColumn::User,
            SortColumn::User => SortColumn::DiskRead,
            SortColumn::DiskRead => SortColumn::DiskWrite,
            SortColumn::DiskWrite => SortColumn::Swapin,
            SortColumn::Swapin => SortColumn::Io,
            SortColumn::Io => SortColumn::Command,
            SortColumn::Command => SortColumn::Tid,
        }
    }

    /// Cycle to the previous sort option
    pub fn prev(self) -> Self {
        match self {
            SortColumn::Tid => SortColumn::Command,
            SortColumn::Priority => SortColumn::Tid,
            SortColumn::User => SortColumn::Priority,
            SortColumn::DiskRead => SortColumn::User,
            SortColumn::DiskWrite => SortColumn::DiskRead,
            SortColumn::Swapin => SortColumn::DiskWrite,
            SortColumn::Io => SortColumn::Swapin,
            SortColumn::Command => SortColumn::Io,
        }
    }


    /// Get display name for the sort column
    pub fn name(&self, processes_only: bool) -> &'static str {
        match self {
            SortColumn::Tid if processes_only => "PID",
            SortColumn::Tid => "TID",
            SortColumn::Priority => "PRIO",
            SortColumn::User => "USER",
            SortColumn::DiskRead => "DISK READ",
            SortColumn::DiskWrite => "DISK WRITE",
            SortColumn::Swapin => "SWAPIN",
            SortColumn::Io => "IO",
            SortColumn::Command => "COMMAND",
        }
    }
}

/// Orders records by the active column and direction.
///
/// Ties always fall back to ascending task id, whatever the direction.
pub fn sort_records(records: &mut [DeltaRecord], column: SortColumn, ascending: bool, accumulated: bool) {
    records.sort_by(|a, b| {
        let cmp = compare(a, b, column, accumulated);
        let cmp = if ascending { cmp } else { cmp.reverse() };
        cmp.then_with(|| a.task.tid.cmp(&b.task.tid))
    });
}

/// Ascending comparison on one column
fn compare(a: &DeltaRecord, b: &DeltaRecord, column: SortColumn, accumulated: bool) -> Ordering {
    match column {
        SortColumn::Tid => a.task.tid.cmp(&b.task.tid),
        SortColumn::Priority => priority_rank(a).cmp(&priority_rank(b)),
        SortColumn::User => a.task.uid.cmp(&b.task.uid),
        SortColumn::DiskRead => a
            .read_value(accumulated)
            .partial_cmp(&b.read_value(accumulated))
            .unwrap_or(Ordering::Equal),
        SortColumn::DiskWrite => a
            .write_value(accumulated)
            .partial_cmp(&b.write_value(accumulated))
            .unwrap_or(Ordering::Equal),
        SortColumn::Swapin => a
            .swapin_percent
            .partial_cmp(&b.swapin_percent)
            .unwrap_or(Ordering::Equal),
        SortColumn::Io => a
            .io_percent
            .partial_cmp(&b.io_percent)
            .unwrap_or(Ordering::Equal),
        SortColumn::Command => a
            .task
            .command
            .to_lowercase()
            .cmp(&b.task.command.to_lowercase()),
    }
}

/// Unreadable priorities sort after every readable one
fn priority_rank(record: &DeltaRecord) -> u32 {
    record.task.priority.map(|p| p.rank()).unwrap_or(u32::MAX)
}
