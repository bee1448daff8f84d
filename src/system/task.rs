//! Task records and snapshots
//!
//! A `Snapshot` is one sample of every visible task's accounting counters.
//! Snapshots are immutable once built; task ids are unique within one.

use std::collections::HashMap;
use std::time::Instant;

use tracing::debug;

use super::error::SourceResult;
use super::priority::IoPriority;

/// One task's accounting state at sample time
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    /// Task (thread) ID, or process ID in process mode
    pub tid: u32,
    /// Owning process (thread group) ID
    pub pid: u32,
    /// True if this record sums every thread of a process
    pub is_process: bool,
    /// Effective user ID of the owner
    pub uid: u32,
    /// Command name (`comm`)
    pub command: String,
    /// Full command line, when requested and readable
    pub cmdline: Option<String>,
    /// I/O priority, None if unreadable
    pub priority: Option<IoPriority>,
    /// Cumulative bytes read from block devices
    pub read_bytes: u64,
    /// Cumulative bytes written to block devices
    pub write_bytes: u64,
    /// Cumulative time spent waiting for swap-in, in nanoseconds
    pub swapin_delay_ns: u64,
    /// Cumulative time spent waiting on block I/O, in nanoseconds
    pub blkio_delay_ns: u64,
    /// Monotonic sample time
    pub timestamp: Instant,
}

impl TaskRecord {
    /// Name to display: full command line if present, otherwise `comm`
    pub fn display_name(&self, full_cmdline: bool) -> &str {
        match (&self.cmdline, full_cmdline) {
            (Some(cmdline), true) if !cmdline.is_empty() => cmdline,
            _ => &self.command,
        }
    }
}

/// Query passed to a task source each cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskQuery {
    /// One record per process instead of per thread
    pub processes_only: bool,
    /// Only tasks owned by this uid
    pub user_filter: Option<u32>,
    /// Only the task with this id
    pub task_filter: Option<u32>,
}

/// An ordered, immutable collection of task records from one instant
#[derive(Debug, Clone)]
pub struct Snapshot {
    records: Vec<TaskRecord>,
    index: HashMap<u32, usize>,
    processes_only: bool,
    taken_at: Instant,
}

impl Snapshot {
    /// Builds a snapshot, keeping the first record for any duplicated task id
    pub fn new(records: Vec<TaskRecord>, processes_only: bool, taken_at: Instant) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        let mut unique = Vec::with_capacity(records.len());

        for record in records {
            debug_assert!(
                record.is_process == processes_only && (!record.is_process || record.tid == record.pid),
                "record for task {} does not match the snapshot scope",
                record.tid
            );
            if index.contains_key(&record.tid) {
                debug!(tid = record.tid, "dropping duplicate task record");
                continue;
            }
            index.insert(record.tid, unique.len());
            unique.push(record);
        }

        Self {
            records: unique,
            index,
            processes_only,
            taken_at,
        }
    }

    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }

    /// Finds the record for a task id
    pub fn get(&self, tid: u32) -> Option<&TaskRecord> {
        self.index.get(&tid).map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True if records describe processes rather than threads
    pub fn processes_only(&self) -> bool {
        self.processes_only
    }

    pub fn taken_at(&self) -> Instant {
        self.taken_at
    }
}

/// Supplies one snapshot of per-task I/O counters per call.
///
/// Implementations omit tasks that vanish mid-query instead of failing.
pub trait TaskSource {
    /// Samples every visible task matching the query
    fn snapshot(&mut self, query: &TaskQuery) -> SourceResult<Snapshot>;

    /// Releases the underlying handle. Must be safe to call more than once.
    fn close(&mut self);
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Builds a thread record with the given counters
    pub fn record(tid: u32, read: u64, write: u64, at: Instant) -> TaskRecord {
        TaskRecord {
            tid,
            pid: tid,
            is_process: false,
            uid: 1000,
            command: format!("task{}", tid),
            cmdline: None,
            priority: None,
            read_bytes: read,
            write_bytes: write,
            swapin_delay_ns: 0,
            blkio_delay_ns: 0,
            timestamp: at,
        }
    }

    /// Builds a process record with the given counters
    pub fn process(pid: u32, read: u64, write: u64, at: Instant) -> TaskRecord {
        TaskRecord {
            is_process: true,
            ..record(pid, read, write, at)
        }
    }
}
