//! Per-task accounting via taskstats and /proc
//!
//! Tasks are enumerated from `/proc/<pid>/task`; their block I/O byte
//! counters and delay accounting come from the kernel's taskstats
//! generic-netlink family. The netlink client is opened once and held
//! until `close`.

use std::fs;
use std::time::Instant;

use linux_taskstats::{Client, TaskStats};
use procfs::process::{self, Process, Task};
use tracing::{debug, info, warn};

use super::error::{SourceError, SourceResult};
use super::priority::get_io_priority;
use super::task::{Snapshot, TaskQuery, TaskRecord, TaskSource};

const DELAYACCT_SYSCTL: &str = "/proc/sys/kernel/task_delayacct";

/// Kernel accounting source backed by a taskstats netlink client
pub struct TaskstatsSource {
    client: Option<Client>,
    full_cmdline: bool,
}

impl TaskstatsSource {
    /// Opens the netlink client and probes it with our own task.
    ///
    /// # Returns
    /// * `Err(SourceError::Unavailable)` - taskstats cannot be reached
    /// * `Err(SourceError::Permission)` - the kernel refused the query
    pub fn open(full_cmdline: bool) -> SourceResult<Self> {
        let client = Client::open().map_err(|e| {
            SourceError::unavailable(format!("cannot open taskstats netlink socket: {:?}", e))
        })?;

        let own_tid = std::process::id();
        if let Err(e) = client.pid_stats(own_tid) {
            debug!(error = ?e, "taskstats probe failed");
            return Err(if nix::unistd::geteuid().is_root() {
                SourceError::unavailable(format!("taskstats query failed: {:?}", e))
            } else {
                SourceError::permission("taskstats queries require CAP_NET_ADMIN")
            });
        }

        if delay_accounting_disabled() {
            warn!(
                "delay accounting is disabled; SWAPIN and IO columns will stay at zero \
                 (enable with sysctl kernel.task_delayacct=1)"
            );
        }

        info!("taskstats client opened");
        Ok(Self {
            client: Some(client),
            full_cmdline,
        })
    }
}

impl TaskSource for TaskstatsSource {
    fn snapshot(&mut self, query: &TaskQuery) -> SourceResult<Snapshot> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| SourceError::unavailable("taskstats client already closed"))?;

        let processes = process::all_processes()
            .map_err(|e| SourceError::unavailable(format!("cannot enumerate /proc: {}", e)))?;

        let mut records = Vec::new();
        for proc in processes.flatten() {
            // Gone between readdir and open
            let Ok(uid) = proc.uid() else { continue };
            if query.user_filter.is_some_and(|user| user != uid) {
                continue;
            }

            if query.processes_only {
                if query.task_filter.is_some_and(|id| id != proc.pid as u32) {
                    continue;
                }
                if let Some(record) = fetch_process(client, &proc, uid, self.full_cmdline) {
                    records.push(record);
                }
            } else {
                let Ok(tasks) = proc.tasks() else { continue };
                let cmdline = self.full_cmdline.then(|| read_cmdline(&proc)).flatten();
                for task in tasks.flatten() {
                    if query.task_filter.is_some_and(|id| id != task.tid as u32) {
                        continue;
                    }
                    if let Some(record) = fetch_thread(client, &task, uid, cmdline.clone()) {
                        records.push(record);
                    }
                }
            }
        }

        debug!(tasks = records.len(), "sampled task accounting");
        Ok(Snapshot::new(records, query.processes_only, Instant::now()))
    }

    fn close(&mut self) {
        if self.client.take().is_some() {
            info!("taskstats client closed");
        }
    }
}

/// Reads stats for one thread; None if it vanished
fn fetch_thread(client: &Client, task: &Task, uid: u32, cmdline: Option<String>) -> Option<TaskRecord> {
    let tid = task.tid as u32;
    let stat = task.stat().ok()?;
    let stats = query_stats(client, tid)?;

    let mut record = TaskRecord {
        tid,
        pid: task.pid as u32,
        is_process: false,
        uid,
        command: stat.comm,
        cmdline,
        priority: get_io_priority(tid, Some(stat.nice)),
        read_bytes: 0,
        write_bytes: 0,
        swapin_delay_ns: 0,
        blkio_delay_ns: 0,
        timestamp: Instant::now(),
    };
    accumulate(&mut record, &stats);
    Some(record)
}

/// Sums the stats of every thread of a process into one record
fn fetch_process(client: &Client, proc: &Process, uid: u32, full_cmdline: bool) -> Option<TaskRecord> {
    let pid = proc.pid as u32;
    let stat = proc.stat().ok()?;

    let mut record = TaskRecord {
        tid: pid,
        pid,
        is_process: true,
        uid,
        command: stat.comm,
        cmdline: if full_cmdline { read_cmdline(proc) } else { None },
        priority: get_io_priority(pid, Some(stat.nice)),
        read_bytes: 0,
        write_bytes: 0,
        swapin_delay_ns: 0,
        blkio_delay_ns: 0,
        timestamp: Instant::now(),
    };

    let mut seen_any = false;
    for task in proc.tasks().ok()?.flatten() {
        if let Some(stats) = query_stats(client, task.tid as u32) {
            accumulate(&mut record, &stats);
            seen_any = true;
        }
    }
    record.timestamp = Instant::now();

    seen_any.then_some(record)
}

fn query_stats(client: &Client, tid: u32) -> Option<TaskStats> {
    match client.pid_stats(tid) {
        Ok(stats) => Some(stats),
        Err(e) => {
            debug!(tid, error = ?e, "task vanished before its counters could be read");
            None
        }
    }
}

fn accumulate(record: &mut TaskRecord, stats: &TaskStats) {
    record.read_bytes = record.read_bytes.saturating_add(stats.blkio.read_bytes);
    record.write_bytes = record.write_bytes.saturating_add(stats.blkio.write_bytes);
    record.swapin_delay_ns = record
        .swapin_delay_ns
        .saturating_add(stats.delays.swapin.delay_total.as_nanos() as u64);
    record.blkio_delay_ns = record
        .blkio_delay_ns
        .saturating_add(stats.delays.blkio.delay_total.as_nanos() as u64);
}

fn read_cmdline(proc: &Process) -> Option<String> {
    let args = proc.cmdline().ok()?;
    let joined = args.join(" ");
    (!joined.is_empty()).then_some(joined)
}

/// True if the kernel reports delay accounting switched off
fn delay_accounting_disabled() -> bool {
    fs::read_to_string(DELAYACCT_SYSCTL)
        .map(|s| s.trim() == "0")
        .unwrap_or(false)
}
