//! Frame memory model
//!
//! This module provides the activation-record abstractions for the stack machine:
//! - [`frame`]: Peg labels, moves, continuation tags and the [`frame::Frame`] record
//! - [`stack`]: The [`stack::FrameStorage`] trait plus the slot-array, pool and
//!   linked-chain backings
//! - [`arena`]: A raw byte region holding frames at computed offsets
//!
//! # Frame Layout
//!
//! Every frame has a fixed, platform-independent encoding:
//!
//! ```text
//! 0──────4────────8──────12───────16──────────────24──────────────32
//! │ disks │ source │ temp │ target │ continuation  │ caller offset │
//! └───────┴────────┴──────┴────────┴───────────────┴───────────────┘
//! ```
//!
//! - integers: 4 bytes, little-endian
//! - continuation: 8-byte field, tag in the first byte
//! - caller offset: 8 bytes, [`NO_CALLER`] marks the root frame
//!
//! Frame `d` levels deep lives at `base + d * FRAME_SIZE`, see [`slot_at`].

pub mod arena;
pub mod frame;
pub mod stack;

/// Size of an encoded integer field
pub const INT_SIZE: usize = 4;

/// Size of an encoded address-sized field
pub const ADDRESS_SIZE: usize = 8;

pub const OFFSET_TO_DISK_COUNT: usize = 0;
pub const OFFSET_TO_SOURCE: usize = OFFSET_TO_DISK_COUNT + INT_SIZE;
pub const OFFSET_TO_TEMP: usize = OFFSET_TO_SOURCE + INT_SIZE;
pub const OFFSET_TO_TARGET: usize = OFFSET_TO_TEMP + INT_SIZE;
pub const OFFSET_TO_CONTINUATION: usize = OFFSET_TO_TARGET + INT_SIZE;
pub const OFFSET_TO_CALLER: usize = OFFSET_TO_CONTINUATION + ADDRESS_SIZE;

/// Size of one encoded frame record in bytes
pub const FRAME_SIZE: usize = OFFSET_TO_CALLER + ADDRESS_SIZE;

/// Caller offset stored in the root frame
pub const NO_CALLER: u64 = u64::MAX;

/// Constant size of one frame record
pub const fn frame_size() -> usize {
    FRAME_SIZE
}

/// Byte offset of the frame at `depth`, counted from `base`.
///
/// `depth` must be below `max_disks`. Callers check the bound first and
/// report exhaustion themselves; an out-of-range depth here is a bug.
pub fn slot_at(base: usize, depth: usize, max_disks: usize) -> usize {
    debug_assert!(
        depth < max_disks,
        "frame depth {} outside region of {} frames",
        depth,
        max_disks
    );
    base + depth * FRAME_SIZE
}

/// Index of the record for `depth` in an array of `capacity` records
pub fn slot_index(depth: usize, capacity: usize) -> Option<usize> {
    (depth < capacity).then_some(depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_offsets_are_packed() {
        assert_eq!(OFFSET_TO_DISK_COUNT, 0);
        assert_eq!(OFFSET_TO_SOURCE, 4);
        assert_eq!(OFFSET_TO_TEMP, 8);
        assert_eq!(OFFSET_TO_TARGET, 12);
        assert_eq!(OFFSET_TO_CONTINUATION, 16);
        assert_eq!(OFFSET_TO_CALLER, 24);
        assert_eq!(frame_size(), 32);
    }

    #[test]
    fn test_slot_at_scales_by_frame_size() {
        assert_eq!(slot_at(0, 0, 4), 0);
        assert_eq!(slot_at(0, 3, 4), 96);
        assert_eq!(slot_at(64, 1, 4), 96);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside region")]
    fn test_slot_at_rejects_depth_past_region() {
        slot_at(0, 4, 4);
    }

    #[test]
    fn test_slot_index_bounds() {
        assert_eq!(slot_index(0, 3), Some(0));
        assert_eq!(slot_index(2, 3), Some(2));
        assert_eq!(slot_index(3, 3), None);
    }
}
