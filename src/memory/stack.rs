//! Frame storage backings
//!
//! This module provides the call stack the machine pushes frames onto:
//! - [`FrameStorage`]: The interface the machine drives
//! - [`FixedSlots`]: Inline array of `N` records, one per depth level
//! - [`FramePool`]: Heap-allocated records sized to the root disk count
//! - [`LinkedFrames`]: Individually boxed frames, each owning its caller
//! - [`StorageKind`]: Selector used by the CLI and the stepper
//!
//! # Caller Links
//!
//! The machine never names the caller itself. Pushing a frame records the
//! current frame as its caller, and popping follows that link back, so the
//! shape of the link (slot index, byte offset, owning box) stays private to
//! each backing.

use super::arena::ByteArena;
use super::frame::{Continuation, Frame, FrameLocation, FrameView};
use super::slot_index;
use crate::machine::constants::{DEFAULT_ARENA_BYTES, FIXED_SLOT_CAPACITY};
use crate::machine::errors::MachineError;
use std::fmt;
use std::str::FromStr;

/// Storage for the chain of live frames
pub trait FrameStorage {
    /// Short name used in errors and the UI
    fn name(&self) -> &'static str;

    /// Drop every frame and prepare for a run rooted at `root_disks`
    fn reset(&mut self, root_disks: u32) -> Result<(), MachineError>;

    /// Push `frame` as the callee of the current frame (or as the root)
    fn push(&mut self, frame: Frame) -> Result<(), MachineError>;

    /// Copy of the current frame
    fn current(&self) -> Result<Frame, MachineError>;

    /// Pop the current frame, making its caller current, and hand back
    /// the continuation the popped frame carried
    fn pop(&mut self) -> Result<Continuation, MachineError>;

    /// Number of live frames
    fn depth(&self) -> usize;

    /// Maximum number of live frames, if bounded
    fn capacity(&self) -> Option<usize>;

    /// Live frames, root first
    fn chain(&self) -> Result<Vec<FrameView>, MachineError>;
}

impl<T: FrameStorage + ?Sized> FrameStorage for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn reset(&mut self, root_disks: u32) -> Result<(), MachineError> {
        (**self).reset(root_disks)
    }

    fn push(&mut self, frame: Frame) -> Result<(), MachineError> {
        (**self).push(frame)
    }

    fn current(&self) -> Result<Frame, MachineError> {
        (**self).current()
    }

    fn pop(&mut self) -> Result<Continuation, MachineError> {
        (**self).pop()
    }

    fn depth(&self) -> usize {
        (**self).depth()
    }

    fn capacity(&self) -> Option<usize> {
        (**self).capacity()
    }

    fn chain(&self) -> Result<Vec<FrameView>, MachineError> {
        (**self).chain()
    }
}

fn no_current_frame() -> MachineError {
    MachineError::invariant("no current frame")
}

/// One record of a slot-addressed stack
#[derive(Debug, Clone, Copy)]
struct Slot {
    frame: Frame,
    caller: Option<usize>,
}

impl Slot {
    const EMPTY: Slot = Slot {
        frame: Frame::BLANK,
        caller: None,
    };
}

/// Depth-indexed frame records over any slice-like backing
#[derive(Debug, Clone)]
struct SlotChain<B> {
    slots: B,
    current: Option<usize>,
}

impl<B: AsRef<[Slot]> + AsMut<[Slot]>> SlotChain<B> {
    fn new(slots: B) -> Self {
        SlotChain {
            slots,
            current: None,
        }
    }

    fn depth(&self) -> usize {
        self.current.map_or(0, |index| index + 1)
    }

    fn push(&mut self, name: &'static str, frame: Frame) -> Result<(), MachineError> {
        let capacity = self.slots.as_ref().len();
        let depth = self.depth();
        let index = slot_index(depth, capacity).ok_or(MachineError::ResourceExhausted {
            storage: name,
            requested_depth: depth + 1,
            capacity,
        })?;

        self.slots.as_mut()[index] = Slot {
            frame,
            caller: self.current,
        };
        self.current = Some(index);
        Ok(())
    }

    fn current(&self) -> Result<Frame, MachineError> {
        let index = self.current.ok_or_else(no_current_frame)?;
        Ok(self.slots.as_ref()[index].frame)
    }

    fn pop(&mut self) -> Result<Continuation, MachineError> {
        let index = self.current.ok_or_else(no_current_frame)?;
        let slot = self.slots.as_ref()[index];
        self.current = slot.caller;
        Ok(slot.frame.continuation)
    }

    fn chain(&self) -> Vec<FrameView> {
        let slots = self.slots.as_ref();
        let mut views = Vec::with_capacity(self.depth());
        let mut cursor = self.current;
        while let Some(index) = cursor {
            let slot = slots[index];
            views.push(FrameView {
                depth: index,
                location: FrameLocation::Slot(index),
                caller: slot.caller.map(FrameLocation::Slot),
                frame: slot.frame,
            });
            cursor = slot.caller;
        }
        views.reverse();
        views
    }
}

/// Preallocated inline array of `N` frame records
///
/// The frame at depth `d` always occupies slot `d`; exceeding `N` frames is
/// reported as [`MachineError::ResourceExhausted`] before anything is written.
#[derive(Debug, Clone)]
pub struct FixedSlots<const N: usize> {
    chain: SlotChain<[Slot; N]>,
}

impl<const N: usize> FixedSlots<N> {
    pub fn new() -> Self {
        FixedSlots {
            chain: SlotChain::new([Slot::EMPTY; N]),
        }
    }
}

impl<const N: usize> Default for FixedSlots<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FrameStorage for FixedSlots<N> {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn reset(&mut self, _root_disks: u32) -> Result<(), MachineError> {
        self.chain.current = None;
        Ok(())
    }

    fn push(&mut self, frame: Frame) -> Result<(), MachineError> {
        let name = self.name();
        self.chain.push(name, frame)
    }

    fn current(&self) -> Result<Frame, MachineError> {
        self.chain.current()
    }

    fn pop(&mut self) -> Result<Continuation, MachineError> {
        self.chain.pop()
    }

    fn depth(&self) -> usize {
        self.chain.depth()
    }

    fn capacity(&self) -> Option<usize> {
        Some(N)
    }

    fn chain(&self) -> Result<Vec<FrameView>, MachineError> {
        Ok(self.chain.chain())
    }
}

/// Heap-allocated pool with one record per depth level
///
/// The pool is allocated on [`FrameStorage::reset`], sized to the root disk
/// count, and released on the next reset or when the pool is dropped. An
/// allocation the system refuses is reported as
/// [`MachineError::ResourceExhausted`].
#[derive(Debug, Clone, Default)]
pub struct FramePool {
    chain: Option<SlotChain<Box<[Slot]>>>,
}

impl FramePool {
    pub fn new() -> Self {
        FramePool { chain: None }
    }

    fn chain_ref(&self) -> Result<&SlotChain<Box<[Slot]>>, MachineError> {
        self.chain
            .as_ref()
            .ok_or_else(|| MachineError::invariant("frame pool used before allocation"))
    }
}

impl FrameStorage for FramePool {
    fn name(&self) -> &'static str {
        "pool"
    }

    fn reset(&mut self, root_disks: u32) -> Result<(), MachineError> {
        // Release the previous run's records before allocating the new ones
        self.chain = None;
        let capacity = root_disks as usize;
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| MachineError::ResourceExhausted {
                storage: self.name(),
                requested_depth: capacity,
                capacity: 0,
            })?;
        slots.resize(capacity, Slot::EMPTY);
        self.chain = Some(SlotChain::new(slots.into_boxed_slice()));
        Ok(())
    }

    fn push(&mut self, frame: Frame) -> Result<(), MachineError> {
        let name = self.name();
        self.chain
            .as_mut()
            .ok_or_else(|| MachineError::invariant("frame pool used before allocation"))?
            .push(name, frame)
    }

    fn current(&self) -> Result<Frame, MachineError> {
        self.chain_ref()?.current()
    }

    fn pop(&mut self) -> Result<Continuation, MachineError> {
        self.chain
            .as_mut()
            .ok_or_else(|| MachineError::invariant("frame pool used before allocation"))?
            .pop()
    }

    fn depth(&self) -> usize {
        self.chain.as_ref().map_or(0, SlotChain::depth)
    }

    fn capacity(&self) -> Option<usize> {
        self.chain.as_ref().map(|chain| chain.slots.len())
    }

    fn chain(&self) -> Result<Vec<FrameView>, MachineError> {
        Ok(self.chain.as_ref().map(SlotChain::chain).unwrap_or_default())
    }
}

/// A frame that owns the frame of its caller
#[derive(Debug)]
struct LinkedFrame {
    frame: Frame,
    caller: Option<Box<LinkedFrame>>,
}

/// Genuine linked chain of frames with no depth bound
#[derive(Debug, Default)]
pub struct LinkedFrames {
    top: Option<Box<LinkedFrame>>,
    depth: usize,
}

impl LinkedFrames {
    pub fn new() -> Self {
        LinkedFrames {
            top: None,
            depth: 0,
        }
    }

    fn clear(&mut self) {
        // Unlink one frame at a time so a deep chain is not dropped recursively
        let mut cursor = self.top.take();
        while let Some(mut node) = cursor {
            cursor = node.caller.take();
        }
        self.depth = 0;
    }
}

impl Drop for LinkedFrames {
    fn drop(&mut self) {
        self.clear();
    }
}

impl FrameStorage for LinkedFrames {
    fn name(&self) -> &'static str {
        "linked"
    }

    fn reset(&mut self, _root_disks: u32) -> Result<(), MachineError> {
        self.clear();
        Ok(())
    }

    fn push(&mut self, frame: Frame) -> Result<(), MachineError> {
        let caller = self.top.take();
        self.top = Some(Box::new(LinkedFrame { frame, caller }));
        self.depth += 1;
        Ok(())
    }

    fn current(&self) -> Result<Frame, MachineError> {
        self.top
            .as_ref()
            .map(|node| node.frame)
            .ok_or_else(no_current_frame)
    }

    fn pop(&mut self) -> Result<Continuation, MachineError> {
        let mut node = self.top.take().ok_or_else(no_current_frame)?;
        self.top = node.caller.take();
        self.depth -= 1;
        Ok(node.frame.continuation)
    }

    fn depth(&self) -> usize {
        self.depth
    }

    fn capacity(&self) -> Option<usize> {
        None
    }

    fn chain(&self) -> Result<Vec<FrameView>, MachineError> {
        let mut views = Vec::with_capacity(self.depth);
        let mut cursor = self.top.as_deref();
        let mut depth = self.depth;
        while let Some(node) = cursor {
            depth -= 1;
            views.push(FrameView {
                depth,
                location: FrameLocation::Linked,
                caller: node.caller.as_ref().map(|_| FrameLocation::Linked),
                frame: node.frame,
            });
            cursor = node.caller.as_deref();
        }
        views.reverse();
        Ok(views)
    }
}

/// Selects one of the frame storage backings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    Fixed,
    Pool,
    Linked,
    Bytes,
}

impl StorageKind {
    pub const ALL: [StorageKind; 4] = [
        StorageKind::Fixed,
        StorageKind::Pool,
        StorageKind::Linked,
        StorageKind::Bytes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StorageKind::Fixed => "fixed",
            StorageKind::Pool => "pool",
            StorageKind::Linked => "linked",
            StorageKind::Bytes => "bytes",
        }
    }

    /// Build a backing with the default sizes
    pub fn build(self) -> Box<dyn FrameStorage> {
        match self {
            StorageKind::Fixed => Box::new(FixedSlots::<FIXED_SLOT_CAPACITY>::new()),
            StorageKind::Pool => Box::new(FramePool::new()),
            StorageKind::Linked => Box::new(LinkedFrames::new()),
            StorageKind::Bytes => Box::new(ByteArena::with_bytes(DEFAULT_ARENA_BYTES)),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StorageKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| {
                format!(
                    "unknown storage '{}' (expected fixed, pool, linked or bytes)",
                    s
                )
            })
    }
}
