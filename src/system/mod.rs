//! System information module - task accounting, counters, priorities
//!
//! This module provides safe abstractions over the Linux interfaces
//! iotop-style monitoring needs: taskstats, /proc and the ioprio syscalls.

pub mod error;
pub mod priority;
pub mod task;
pub mod taskstats;
pub mod users;
pub mod vmstat;

pub use error::{PriorityResult, SourceError};
pub use priority::{priority_label, set_io_priority, IoClass, IoPriority};
pub use task::{Snapshot, TaskQuery, TaskRecord, TaskSource};
pub use taskstats::TaskstatsSource;
pub use users::{resolve_user, UserNames};
pub use vmstat::{CounterSource, ThroughputTracker, VmstatSource};
