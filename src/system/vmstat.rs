//! System-wide block I/O counters from /proc/vmstat
//!
//! `pgpgin`/`pgpgout` count kilobytes paged in from and out to block
//! devices since boot.

use std::time::Instant;

use tracing::debug;

use super::error::{SourceError, SourceResult};

/// Cumulative system-wide block I/O byte counters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateCounters {
    pub read_bytes: u64,
    pub write_bytes: u64,
    pub timestamp: Instant,
}

/// Supplies system-wide cumulative counters
pub trait CounterSource {
    fn counters(&mut self) -> SourceResult<AggregateCounters>;
}

/// Aggregate counter source reading `/proc/vmstat`
#[derive(Debug, Default)]
pub struct VmstatSource;

impl CounterSource for VmstatSource {
    fn counters(&mut self) -> SourceResult<AggregateCounters> {
        let stats = procfs::vmstat()
            .map_err(|e| SourceError::unavailable(format!("cannot read /proc/vmstat: {}", e)))?;

        let kib = |key: &str| -> SourceResult<u64> {
            stats
                .get(key)
                .map(|&v| (v.max(0) as u64).saturating_mul(1024))
                .ok_or_else(|| SourceError::unavailable(format!("/proc/vmstat has no {}", key)))
        };

        let counters = AggregateCounters {
            read_bytes: kib("pgpgin")?,
            write_bytes: kib("pgpgout")?,
            timestamp: Instant::now(),
        };
        debug!(read = counters.read_bytes, write = counters.write_bytes, "read vmstat counters");
        Ok(counters)
    }
}

/// Retains the latest aggregate counters to compute throughput deltas
#[derive(Debug, Default)]
pub struct ThroughputTracker {
    previous: Option<AggregateCounters>,
}

impl ThroughputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new sample and returns (read, write) bytes per second since
    /// the previous one. None on the first sample, when the source is
    /// unavailable, or when no time has elapsed.
    pub fn update(&mut self, current: Option<AggregateCounters>) -> Option<(f64, f64)> {
        let current = current?;
        let previous = self.previous.replace(current)?;

        let elapsed = current
            .timestamp
            .checked_duration_since(previous.timestamp)?
            .as_secs_f64();
        if elapsed <= 0.0 {
            return None;
        }

        Some((
            current.read_bytes.saturating_sub(previous.read_bytes) as f64 / elapsed,
            current.write_bytes.saturating_sub(previous.write_bytes) as f64 / elapsed,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn counters(read: u64, write: u64, at: Instant) -> AggregateCounters {
        AggregateCounters { read_bytes: read, write_bytes: write, timestamp: at }
    }

    #[test]
    fn test_first_sample_has_no_throughput() {
        let mut tracker = ThroughputTracker::new();
        assert_eq!(tracker.update(Some(counters(100, 100, Instant::now()))), None);
    }

    #[test]
    fn test_throughput_from_consecutive_samples() {
        let t0 = Instant::now();
        let mut tracker = ThroughputTracker::new();
        tracker.update(Some(counters(1000, 0, t0)));
        let rates = tracker.update(Some(counters(3000, 4096, t0 + Duration::from_secs(2))));
        assert_eq!(rates, Some((1000.0, 2048.0)));
    }

    #[test]
    fn test_unavailable_sample_keeps_previous() {
        let t0 = Instant::now();
        let mut tracker = ThroughputTracker::new();
        tracker.update(Some(counters(0, 0, t0)));
        assert_eq!(tracker.update(None), None);
        let rates = tracker.update(Some(counters(500, 0, t0 + Duration::from_secs(1))));
        assert_eq!(rates, Some((500.0, 0.0)));
    }

    #[test]
    fn test_counter_decrease_clamps_to_zero() {
        let t0 = Instant::now();
        let mut tracker = ThroughputTracker::new();
        tracker.update(Some(counters(5000, 5000, t0)));
        let rates = tracker.update(Some(counters(10, 10, t0 + Duration::from_secs(1))));
        assert_eq!(rates, Some((0.0, 0.0)));
    }

    #[test]
    fn test_vmstat_readable() {
        let mut source = VmstatSource;
        if let Ok(counters) = source.counters() {
            println!("pgpgin bytes: {}, pgpgout bytes: {}", counters.read_bytes, counters.write_bytes);
        }
    }
}
