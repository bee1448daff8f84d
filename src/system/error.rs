//! Custom error types for type-safe error handling
//!
//! This module provides structured error types instead of raw strings,
//! enabling better error handling, matching, and user messages.

use thiserror::Error;

// ============================================================================
// Source Error
// ============================================================================

/// Errors raised by the kernel accounting and aggregate counter sources.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The caller lacks the capability needed to query task accounting
    #[error("permission denied: {reason} (try running as root or with CAP_NET_ADMIN)")]
    Permission {
        /// What was refused
        reason: String,
    },

    /// The accounting facility cannot be reached at all
    #[error("accounting source unavailable: {reason}")]
    Unavailable {
        /// Why the facility could not be reached
        reason: String,
    },
}

impl SourceError {
    pub fn permission(reason: impl Into<String>) -> Self {
        SourceError::Permission { reason: reason.into() }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        SourceError::Unavailable { reason: reason.into() }
    }
}

// ============================================================================
// Priority Error
// ============================================================================

/// Errors specific to I/O priority operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriorityError {
    /// Task does not exist or has already exited
    #[error("task {tid} not found or has exited")]
    NotFound { tid: u32 },

    /// Changing the priority needs more privileges
    #[error("permission denied changing priority of task {tid}")]
    PermissionDenied { tid: u32 },

    /// Class or level out of range
    #[error("invalid I/O priority: {reason}")]
    Invalid { reason: &'static str },

    /// Any other errno returned by the syscall
    #[error("{syscall} failed with errno {errno}")]
    Syscall { syscall: &'static str, errno: i32 },
}

// ============================================================================
// Result type aliases
// ============================================================================

/// Result type for accounting source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type for priority operations
pub type PriorityResult<T> = Result<T, PriorityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_messages() {
        let err = SourceError::permission("taskstats query refused");
        assert!(err.to_string().starts_with("permission denied"));

        let err = SourceError::unavailable("netlink family missing");
        assert_eq!(
            err.to_string(),
            "accounting source unavailable: netlink family missing"
        );
    }

    #[test]
    fn test_priority_error_messages() {
        let err = PriorityError::Syscall { syscall: "ioprio_set", errno: 22 };
        assert_eq!(err.to_string(), "ioprio_set failed with errno 22");
    }
}
