//! Task I/O priority management using the ioprio syscalls
//!
//! This module provides functions to get and set the I/O scheduling
//! priority of a task using `ioprio_get` and `ioprio_set`.

use std::fmt;
use std::io;

use super::error::{PriorityError, PriorityResult};

const IOPRIO_WHO_PROCESS: libc::c_int = 1;
const IOPRIO_CLASS_SHIFT: u32 = 13;
const IOPRIO_PRIO_MASK: i64 = (1 << IOPRIO_CLASS_SHIFT) - 1;

/// Highest (numerically largest) level within a class
pub const MAX_LEVEL: u8 = 7;

/// Linux I/O scheduling classes.
///
/// # Classes (strongest to weakest)
/// * `RealTime` - Served first regardless of other tasks
/// * `BestEffort` - Default class, levels 0-7 within it
/// * `Idle` - Only served when no other task wants the disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IoClass {
    RealTime = 1,
    BestEffort = 2,
    Idle = 3,
}

impl IoClass {
    /// Cycle to the next class (weaker)
    pub fn next(self) -> Self {
        match self {
            IoClass::RealTime => IoClass::BestEffort,
            IoClass::BestEffort => IoClass::Idle,
            IoClass::Idle => IoClass::RealTime,
        }
    }

    /// Cycle to the previous class (stronger)
    pub fn prev(self) -> Self {
        match self {
            IoClass::RealTime => IoClass::Idle,
            IoClass::BestEffort => IoClass::RealTime,
            IoClass::Idle => IoClass::BestEffort,
        }
    }

    /// Get full display name
    pub fn name(&self) -> &'static str {
        match self {
            IoClass::RealTime => "realtime",
            IoClass::BestEffort => "best-effort",
            IoClass::Idle => "idle",
        }
    }
}

/// An I/O priority: class plus level (0 is the strongest level).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoPriority {
    pub class: IoClass,
    pub level: u8,
}

impl IoPriority {
    pub fn new(class: IoClass, level: u8) -> Self {
        Self { class, level: level.min(MAX_LEVEL) }
    }

    /// Decodes a raw `ioprio_get` value.
    ///
    /// Tasks without an explicit class follow the CPU nice value, which the
    /// kernel maps onto a best-effort level of `(nice + 20) / 5`.
    pub fn from_raw(raw: i64, nice: Option<i64>) -> Option<Self> {
        let data = (raw & IOPRIO_PRIO_MASK).clamp(0, MAX_LEVEL as i64) as u8;
        match raw >> IOPRIO_CLASS_SHIFT {
            0 => {
                let level = nice.map(|n| ((n + 20) / 5).clamp(0, MAX_LEVEL as i64) as u8);
                Some(Self::new(IoClass::BestEffort, level.unwrap_or(4)))
            }
            1 => Some(Self::new(IoClass::RealTime, data)),
            2 => Some(Self::new(IoClass::BestEffort, data)),
            3 => Some(Self::new(IoClass::Idle, data)),
            _ => None,
        }
    }

    /// Encodes into the value expected by `ioprio_set`
    pub fn to_raw(self) -> i64 {
        ((self.class as i64) << IOPRIO_CLASS_SHIFT) | i64::from(self.level)
    }

    /// Sort rank: smaller is stronger. Real-time 0 ranks first, idle last.
    pub fn rank(&self) -> u32 {
        (self.class as u32) * 8 + u32::from(self.level)
    }

    /// Get the next stronger level, staying in the class
    pub fn raise(self) -> Self {
        Self::new(self.class, self.level.saturating_sub(1))
    }

    /// Get the next weaker level, staying in the class
    pub fn lower(self) -> Self {
        Self::new(self.class, self.level.saturating_add(1))
    }
}

impl fmt::Display for IoPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class {
            IoClass::RealTime => write!(f, "rt/{}", self.level),
            IoClass::BestEffort => write!(f, "be/{}", self.level),
            IoClass::Idle => write!(f, "idle"),
        }
    }
}

/// Short display name for an optional priority (`?` when unreadable)
pub fn priority_label(priority: Option<IoPriority>) -> String {
    priority.map(|p| p.to_string()).unwrap_or_else(|| "?".to_string())
}

/// Gets the I/O priority of a task.
///
/// # Arguments
/// * `tid` - The task ID to query
/// * `nice` - CPU nice value, used when the task has no explicit class
///
/// # Returns
/// * `Option<IoPriority>` - None if the task is gone or unreadable
pub fn get_io_priority(tid: u32, nice: Option<i64>) -> Option<IoPriority> {
    // SAFETY: ioprio_get takes two integers and touches no memory.
    let raw = unsafe {
        libc::syscall(libc::SYS_ioprio_get, IOPRIO_WHO_PROCESS, tid as libc::c_int)
    };
    if raw < 0 {
        return None;
    }
    IoPriority::from_raw(raw as i64, nice)
}

/// Sets the I/O priority of a task.
///
/// Raising a task into the real-time class requires CAP_SYS_ADMIN;
/// changing another user's task requires CAP_SYS_NICE.
pub fn set_io_priority(tid: u32, priority: IoPriority) -> PriorityResult<()> {
    if priority.level > MAX_LEVEL {
        return Err(PriorityError::Invalid { reason: "level must be between 0 and 7" });
    }

    // SAFETY: ioprio_set takes three integers and touches no memory.
    let result = unsafe {
        libc::syscall(
            libc::SYS_ioprio_set,
            IOPRIO_WHO_PROCESS,
            tid as libc::c_int,
            priority.to_raw() as libc::c_int,
        )
    };

    if result == 0 {
        return Ok(());
    }

    match io::Error::last_os_error().raw_os_error() {
        Some(libc::ESRCH) => Err(PriorityError::NotFound { tid }),
        Some(libc::EPERM) => Err(PriorityError::PermissionDenied { tid }),
        Some(errno) => Err(PriorityError::Syscall { syscall: "ioprio_set", errno }),
        None => Err(PriorityError::Syscall { syscall: "ioprio_set", errno: 0 }),
    }
}
