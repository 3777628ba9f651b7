//! Raw byte arena holding encoded frames
//!
//! This module provides [`ByteArena`], a flat byte region sized by the caller
//! in which frames are written at computed offsets (see [`super::slot_at`]):
//! - Fields are copied in and out as little-endian integers
//! - The caller link is the caller's byte offset, [`NO_CALLER`] for the root
//! - The continuation is a one-byte tag, validated on every read
//!
//! # Error Handling
//!
//! Pushing past the end of the region is reported as
//! [`MachineError::ResourceExhausted`] before any byte is written. Reading back
//! a tag outside the continuation set, or a caller offset that does not land
//! on a frame boundary, is an [`MachineError::InternalInvariantViolation`].

use super::frame::{Continuation, Frame, FrameLocation, FrameView, Peg};
use super::stack::FrameStorage;
use super::{
    slot_at, ADDRESS_SIZE, FRAME_SIZE, INT_SIZE, NO_CALLER, OFFSET_TO_CALLER,
    OFFSET_TO_CONTINUATION, OFFSET_TO_DISK_COUNT, OFFSET_TO_SOURCE, OFFSET_TO_TARGET,
    OFFSET_TO_TEMP,
};
use crate::machine::errors::MachineError;

/// Flat byte region used as a frame stack
#[derive(Debug, Clone)]
pub struct ByteArena {
    memory: Vec<u8>,
    frame_pointer: Option<usize>,
    depth: usize,
}

impl ByteArena {
    /// Create an arena of `size` bytes; only whole frames are usable
    pub fn with_bytes(size: usize) -> Self {
        ByteArena {
            memory: vec![0; size],
            frame_pointer: None,
            depth: 0,
        }
    }

    /// Create an arena with room for exactly `frames` frames
    pub fn with_frames(frames: usize) -> Self {
        Self::with_bytes(frames * FRAME_SIZE)
    }

    /// Number of whole frames that fit in the region
    pub fn frame_capacity(&self) -> usize {
        self.memory.len() / FRAME_SIZE
    }

    /// Byte offset of the current frame
    pub fn frame_pointer(&self) -> Option<usize> {
        self.frame_pointer
    }

    /// The raw region
    pub fn bytes(&self) -> &[u8] {
        &self.memory
    }

    fn read_bytes(&self, offset: usize, size: usize) -> Result<&[u8], MachineError> {
        self.memory.get(offset..offset + size).ok_or_else(|| {
            MachineError::invariant(format!(
                "read of {} bytes at offset 0x{:x} outside arena of {} bytes",
                size,
                offset,
                self.memory.len()
            ))
        })
    }

    fn write_bytes(&mut self, offset: usize, bytes: &[u8]) {
        self.memory[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    fn read_u32(&self, offset: usize) -> Result<u32, MachineError> {
        let mut buf = [0u8; INT_SIZE];
        buf.copy_from_slice(self.read_bytes(offset, INT_SIZE)?);
        Ok(u32::from_le_bytes(buf))
    }

    fn read_i32(&self, offset: usize) -> Result<i32, MachineError> {
        let mut buf = [0u8; INT_SIZE];
        buf.copy_from_slice(self.read_bytes(offset, INT_SIZE)?);
        Ok(i32::from_le_bytes(buf))
    }

    fn read_u64(&self, offset: usize) -> Result<u64, MachineError> {
        let mut buf = [0u8; ADDRESS_SIZE];
        buf.copy_from_slice(self.read_bytes(offset, ADDRESS_SIZE)?);
        Ok(u64::from_le_bytes(buf))
    }

    fn read_continuation(&self, base: usize) -> Result<Continuation, MachineError> {
        let tag = self.read_bytes(base + OFFSET_TO_CONTINUATION, 1)?[0];
        Continuation::from_tag(tag).ok_or_else(|| {
            MachineError::invariant(format!(
                "unknown continuation tag 0x{:02x} in frame at 0x{:04x}",
                tag, base
            ))
        })
    }

    fn read_caller(&self, base: usize) -> Result<Option<usize>, MachineError> {
        let raw = self.read_u64(base + OFFSET_TO_CALLER)?;
        if raw == NO_CALLER {
            return Ok(None);
        }
        let offset = usize::try_from(raw).map_err(|_| {
            MachineError::invariant(format!("caller offset 0x{:x} does not fit", raw))
        })?;
        if offset % FRAME_SIZE != 0 || offset >= base {
            return Err(MachineError::invariant(format!(
                "frame at 0x{:04x} links to misplaced caller 0x{:04x}",
                base, offset
            )));
        }
        Ok(Some(offset))
    }

    fn decode(&self, base: usize) -> Result<Frame, MachineError> {
        Ok(Frame {
            disk_count: self.read_u32(base + OFFSET_TO_DISK_COUNT)?,
            source: Peg(self.read_i32(base + OFFSET_TO_SOURCE)?),
            temp: Peg(self.read_i32(base + OFFSET_TO_TEMP)?),
            target: Peg(self.read_i32(base + OFFSET_TO_TARGET)?),
            continuation: self.read_continuation(base)?,
        })
    }

    fn encode(&mut self, base: usize, frame: &Frame, caller: Option<usize>) {
        self.write_bytes(
            base + OFFSET_TO_DISK_COUNT,
            &frame.disk_count.to_le_bytes(),
        );
        self.write_bytes(base + OFFSET_TO_SOURCE, &frame.source.0.to_le_bytes());
        self.write_bytes(base + OFFSET_TO_TEMP, &frame.temp.0.to_le_bytes());
        self.write_bytes(base + OFFSET_TO_TARGET, &frame.target.0.to_le_bytes());

        let mut tag_field = [0u8; ADDRESS_SIZE];
        tag_field[0] = frame.continuation.tag();
        self.write_bytes(base + OFFSET_TO_CONTINUATION, &tag_field);

        let caller = caller.map_or(NO_CALLER, |offset| offset as u64);
        self.write_bytes(base + OFFSET_TO_CALLER, &caller.to_le_bytes());
    }
}

impl FrameStorage for ByteArena {
    fn name(&self) -> &'static str {
        "bytes"
    }

    fn reset(&mut self, _root_disks: u32) -> Result<(), MachineError> {
        self.frame_pointer = None;
        self.depth = 0;
        Ok(())
    }

    fn push(&mut self, frame: Frame) -> Result<(), MachineError> {
        let capacity = self.frame_capacity();
        if self.depth >= capacity {
            return Err(MachineError::ResourceExhausted {
                storage: self.name(),
                requested_depth: self.depth + 1,
                capacity,
            });
        }

        let base = slot_at(0, self.depth, capacity);
        self.encode(base, &frame, self.frame_pointer);
        self.frame_pointer = Some(base);
        self.depth += 1;
        Ok(())
    }

    fn current(&self) -> Result<Frame, MachineError> {
        let base = self
            .frame_pointer
            .ok_or_else(|| MachineError::invariant("no current frame"))?;
        self.decode(base)
    }

    fn pop(&mut self) -> Result<Continuation, MachineError> {
        let base = self
            .frame_pointer
            .ok_or_else(|| MachineError::invariant("no current frame"))?;
        let continuation = self.read_continuation(base)?;
        self.frame_pointer = self.read_caller(base)?;
        self.depth -= 1;
        Ok(continuation)
    }

    fn depth(&self) -> usize {
        self.depth
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.frame_capacity())
    }

    fn chain(&self) -> Result<Vec<FrameView>, MachineError> {
        let mut views = Vec::with_capacity(self.depth);
        let mut cursor = self.frame_pointer;
        while let Some(base) = cursor {
            let caller = self.read_caller(base)?;
            views.push(FrameView {
                depth: base / FRAME_SIZE,
                location: FrameLocation::Offset(base),
                caller: caller.map(FrameLocation::Offset),
                frame: self.decode(base)?,
            });
            cursor = caller;
        }
        views.reverse();
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> Frame {
        Frame::root(2, Peg(1), Peg(2), Peg(3))
    }

    #[test]
    fn test_frames_encoded_at_computed_offsets() {
        let mut arena = ByteArena::with_frames(2);
        arena.reset(2).unwrap();
        arena.push(root()).unwrap();
        arena
            .push(Frame {
                disk_count: 1,
                source: Peg(1),
                temp: Peg(3),
                target: Peg(-7),
                continuation: Continuation::AfterFirstRecursion,
            })
            .unwrap();

        assert_eq!(arena.frame_pointer(), Some(FRAME_SIZE));
        let bytes = arena.bytes();
        assert_eq!(&bytes[0..4], &2u32.to_le_bytes());
        assert_eq!(bytes[OFFSET_TO_CONTINUATION], Continuation::ProgramEnd.tag());
        assert_eq!(&bytes[OFFSET_TO_CALLER..FRAME_SIZE], &NO_CALLER.to_le_bytes());

        let child = FRAME_SIZE;
        assert_eq!(
            &bytes[child + OFFSET_TO_TARGET..child + OFFSET_TO_TARGET + 4],
            &(-7i32).to_le_bytes()
        );
        assert_eq!(
            &bytes[child + OFFSET_TO_CALLER..child + FRAME_SIZE],
            &0u64.to_le_bytes()
        );
    }

    #[test]
    fn test_exhaustion_reported_before_write() {
        let mut arena = ByteArena::with_bytes(FRAME_SIZE + FRAME_SIZE / 2);
        assert_eq!(arena.frame_capacity(), 1);
        arena.reset(2).unwrap();
        arena.push(root()).unwrap();
        let before = arena.bytes().to_vec();
        let err = arena.push(root()).unwrap_err();
        assert!(matches!(
            err,
            MachineError::ResourceExhausted {
                storage: "bytes",
                requested_depth: 2,
                capacity: 1,
            }
        ));
        assert_eq!(arena.bytes(), &before[..]);
    }

    #[test]
    fn test_corrupt_continuation_tag_is_invariant_violation() {
        let mut arena = ByteArena::with_frames(1);
        arena.reset(1).unwrap();
        arena.push(root()).unwrap();
        arena.memory[OFFSET_TO_CONTINUATION] = 0x2a;

        let err = arena.pop().unwrap_err();
        assert!(matches!(
            err,
            MachineError::InternalInvariantViolation { ref message }
                if message.contains("0x2a")
        ));
    }

    #[test]
    fn test_misplaced_caller_is_invariant_violation() {
        let mut arena = ByteArena::with_frames(2);
        arena.reset(2).unwrap();
        arena.push(root()).unwrap();
        arena.push(root()).unwrap();
        let child = FRAME_SIZE;
        arena.memory[child + OFFSET_TO_CALLER..child + FRAME_SIZE]
            .copy_from_slice(&3u64.to_le_bytes());
        assert!(arena.chain().is_err());
        assert!(arena.pop().is_err());
    }
}
