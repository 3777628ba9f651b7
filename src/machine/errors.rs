//! Error types for the stack machine
//!
//! This module defines [`MachineError`], covering bad input, frame storage
//! exhaustion, broken machine invariants and execution-history failures.
//!
//! All machine errors are fatal - the run stops and any moves emitted so far
//! are considered incomplete.

use std::fmt;

/// Broad classification of a [`MachineError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    ResourceExhausted,
    InternalInvariantViolation,
    History,
}

/// Errors that can occur while driving the machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachineError {
    /// Disk count below one, unparsable input, or unusable peg labels
    InvalidArgument { message: String },

    /// Frame storage cannot hold another frame
    ResourceExhausted {
        storage: &'static str,
        requested_depth: usize,
        capacity: usize,
    },

    /// A machine invariant was broken (bad continuation tag, runaway depth, ...)
    InternalInvariantViolation { message: String },

    /// Snapshot history limit exceeded
    SnapshotLimitExceeded { current: usize, limit: usize },

    /// History navigation failed (already at an end, missing snapshot)
    HistoryOperationFailed { message: String },
}

impl MachineError {
    pub fn invalid_disk_count(disk_count: i64) -> Self {
        MachineError::InvalidArgument {
            message: format!("disk count must be at least 1, got {}", disk_count),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        MachineError::InternalInvariantViolation {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            MachineError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            MachineError::ResourceExhausted { .. } => ErrorKind::ResourceExhausted,
            MachineError::InternalInvariantViolation { .. } => {
                ErrorKind::InternalInvariantViolation
            }
            MachineError::SnapshotLimitExceeded { .. }
            | MachineError::HistoryOperationFailed { .. } => ErrorKind::History,
        }
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::InvalidArgument => 1,
            ErrorKind::ResourceExhausted => 2,
            ErrorKind::InternalInvariantViolation => 3,
            ErrorKind::History => 4,
        }
    }
}

impl fmt::Display for MachineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachineError::InvalidArgument { message } => {
                write!(f, "Invalid argument: {}", message)
            }
            MachineError::ResourceExhausted {
                storage,
                requested_depth,
                capacity,
            } => {
                write!(
                    f,
                    "Frame storage exhausted: {} storage holds {} frame{}, depth {} requested",
                    storage,
                    capacity,
                    if *capacity == 1 { "" } else { "s" },
                    requested_depth
                )
            }
            MachineError::InternalInvariantViolation { message } => {
                write!(f, "Internal invariant violated: {}", message)
            }
            MachineError::SnapshotLimitExceeded { current, limit } => {
                write!(
                    f,
                    "Snapshot memory limit exceeded: {} bytes used, limit is {}",
                    current, limit
                )
            }
            MachineError::HistoryOperationFailed { message } => {
                write!(f, "History operation failed: {}", message)
            }
        }
    }
}

impl std::error::Error for MachineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_follow_kind() {
        assert_eq!(MachineError::invalid_disk_count(0).exit_code(), 1);
        let exhausted = MachineError::ResourceExhausted {
            storage: "fixed",
            requested_depth: 5,
            capacity: 4,
        };
        assert_eq!(exhausted.kind(), ErrorKind::ResourceExhausted);
        assert_eq!(exhausted.exit_code(), 2);
        assert_eq!(MachineError::invariant("x").exit_code(), 3);
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            MachineError::invalid_disk_count(-1).to_string(),
            "Invalid argument: disk count must be at least 1, got -1"
        );
        let exhausted = MachineError::ResourceExhausted {
            storage: "fixed",
            requested_depth: 2,
            capacity: 1,
        };
        assert_eq!(
            exhausted.to_string(),
            "Frame storage exhausted: fixed storage holds 1 frame, depth 2 requested"
        );
    }
}
