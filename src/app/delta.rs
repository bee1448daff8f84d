//! Rate calculation between consecutive snapshots
//!
//! Every task in the current snapshot yields exactly one `DeltaRecord`.
//! Tasks only present in the previous snapshot yield nothing.

use crate::system::{Snapshot, TaskRecord};

/// A task's derived rates for one render cycle
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaRecord {
    /// Current sample, carried through for display
    pub task: TaskRecord,
    /// Bytes read per second
    pub read_rate: f64,
    /// Bytes written per second
    pub write_rate: f64,
    /// Share of the interval spent waiting for swap-in (0-100)
    pub swapin_percent: f64,
    /// Share of the interval spent waiting on block I/O (0-100)
    pub io_percent: f64,
}

impl DeltaRecord {
    /// A record with every rate at zero
    pub fn idle(task: TaskRecord) -> Self {
        Self {
            task,
            read_rate: 0.0,
            write_rate: 0.0,
            swapin_percent: 0.0,
            io_percent: 0.0,
        }
    }

    /// Read column value: cumulative bytes or bytes per second
    pub fn read_value(&self, accumulated: bool) -> f64 {
        if accumulated {
            self.task.read_bytes as f64
        } else {
            self.read_rate
        }
    }

    /// Write column value: cumulative bytes or bytes per second
    pub fn write_value(&self, accumulated: bool) -> f64 {
        if accumulated {
            self.task.write_bytes as f64
        } else {
            self.write_rate
        }
    }

    /// True if any displayed activity field is nonzero
    pub fn is_active(&self, accumulated: bool) -> bool {
        self.read_value(accumulated) > 0.0
            || self.write_value(accumulated) > 0.0
            || self.swapin_percent > 0.0
            || self.io_percent > 0.0
    }
}

/// Matches the current snapshot against the previous one by task id.
///
/// A reused task id is treated as the same task; if its counters went
/// backwards the affected rates clamp to zero.
pub fn compute_deltas(current: &Snapshot, previous: Option<&Snapshot>) -> Vec<DeltaRecord> {
    current
        .records()
        .iter()
        .map(|c| derive(c, previous.and_then(|p| p.get(c.tid))))
        .collect()
}

/// Derives one record from a task and its previous sample, if any
pub fn derive(current: &TaskRecord, previous: Option<&TaskRecord>) -> DeltaRecord {
    let Some(previous) = previous else {
        return DeltaRecord::idle(current.clone());
    };

    let elapsed = match current.timestamp.checked_duration_since(previous.timestamp) {
        Some(elapsed) if !elapsed.is_zero() => elapsed,
        _ => return DeltaRecord::idle(current.clone()),
    };
    let secs = elapsed.as_secs_f64();
    let nanos = elapsed.as_nanos() as f64;

    let rate = |now: u64, before: u64| now.saturating_sub(before) as f64 / secs;
    let percent = |now: u64, before: u64| {
        (100.0 * now.saturating_sub(before) as f64 / nanos).clamp(0.0, 100.0)
    };

    DeltaRecord {
        task: current.clone(),
        read_rate: rate(current.read_bytes, previous.read_bytes),
        write_rate: rate(current.write_bytes, previous.write_bytes),
        swapin_percent: percent(current.swapin_delay_ns, previous.swapin_delay_ns),
        io_percent: percent(current.blkio_delay_ns, previous.blkio_delay_ns),
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::system::task::fixtures::record;

    #[test]
    fn test_rate_is_delta_over_elapsed() {
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(2);
        let prev = record(1, 1000, 500, t0);
        let cur = record(1, 5000, 2500, t1);

        let d = derive(&cur, Some(&prev));
        assert_eq!(d.read_rate, 2000.0);
        assert_eq!(d.write_rate, 1000.0);
    }

    #[test]
    fn test_new_task_has_zero_rates() {
        let cur = record(1, 5000, 2500, Instant::now());
        let d = derive(&cur, None);
        assert_eq!(d.read_rate, 0.0);
        assert_eq!(d.write_rate, 0.0);
        assert_eq!(d.task.read_bytes, 5000);
    }

    #[test]
    fn test_counter_reset_clamps_to_zero() {
        let t0 = Instant::now();
        let prev = record(1, 9000, 100, t0);
        let cur = record(1, 10, 300, t0 + Duration::from_secs(1));

        let d = derive(&cur, Some(&prev));
        assert_eq!(d.read_rate, 0.0);
        assert_eq!(d.write_rate, 200.0);
    }

    #[test]
    fn test_non_positive_elapsed_yields_zero() {
        let t0 = Instant::now();
        let prev = record(1, 0, 0, t0 + Duration::from_secs(1));
        let cur = record(1, 1000, 1000, t0);
        let d = derive(&cur, Some(&prev));
        assert_eq!(d.read_rate, 0.0);

        let same = record(1, 1000, 1000, t0 + Duration::from_secs(1));
        let d = derive(&same, Some(&prev));
        assert_eq!(d.write_rate, 0.0);
    }

    #[test]
    fn test_delay_percentages_are_clamped() {
        let t0 = Instant::now();
        let mut prev = record(1, 0, 0, t0);
        prev.blkio_delay_ns = 0;
        prev.swapin_delay_ns = 0;
        let mut cur = record(1, 0, 0, t0 + Duration::from_secs(1));
        cur.blkio_delay_ns = 250_000_000;
        cur.swapin_delay_ns = 5_000_000_000;

        let d = derive(&cur, Some(&prev));
        assert!((d.io_percent - 25.0).abs() < 1e-9);
        assert_eq!(d.swapin_percent, 100.0);
    }

    #[test]
    fn test_every_current_task_yields_one_record() {
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(1);
        let previous = Snapshot::new(vec![record(1, 0, 0, t0), record(2, 0, 0, t0)], false, t0);
        let current = Snapshot::new(vec![record(2, 100, 0, t1), record(3, 100, 0, t1)], false, t1);

        let deltas = compute_deltas(&current, Some(&previous));
        let tids: Vec<u32> = deltas.iter().map(|d| d.task.tid).collect();
        assert_eq!(tids, vec![2, 3]);
        assert_eq!(deltas[0].read_rate, 100.0);
        assert_eq!(deltas[1].read_rate, 0.0);
    }

    #[test]
    fn test_owner_survives_derivation() {
        let t0 = Instant::now();
        let mut thread = record(7, 0, 0, t0);
        thread.pid = 5;
        let current = Snapshot::new(vec![thread], false, t0);

        let deltas = compute_deltas(&current, None);
        assert_eq!(deltas[0].task.pid, 5);
        assert!(!deltas[0].task.is_process);
    }

    #[test]
    fn test_activity_follows_display_mode() {
        let d = DeltaRecord::idle(record(1, 4096, 0, Instant::now()));
        assert!(!d.is_active(false));
        assert!(d.is_active(true));
    }
}
