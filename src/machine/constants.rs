// Constants for the stack machine

/// Default peg labels, matching the classic 1 → 3 via 2 setup
pub const DEFAULT_SOURCE: i32 = 1;
pub const DEFAULT_TEMP: i32 = 2;
pub const DEFAULT_TARGET: i32 = 3;

/// Number of inline records in the fixed slot array built by the CLI
pub const FIXED_SLOT_CAPACITY: usize = 32;

pub const KILOBYTE: usize = 1024;

/// Size of the raw byte arena built by the CLI (128 frames)
pub const DEFAULT_ARENA_BYTES: usize = 4 * KILOBYTE;

/// Snapshot history memory limit for the stepper (256 MB)
pub const SNAPSHOT_MEMORY_LIMIT: usize = 256 * KILOBYTE * KILOBYTE;

/// Largest disk count the stepper records a history for
pub const MAX_TUI_DISKS: i64 = 12;
