//! Activation record types
//!
//! A [`Frame`] holds one simulated call of the Hanoi procedure: its disk count,
//! the three peg parameters and the [`Continuation`] to resume once the call
//! returns. The link to the caller's frame belongs to the storage that holds
//! the frame, since its shape (slot index, byte offset, owning box) depends on
//! the backing.

use std::fmt;

/// Opaque identifier of one of the three towers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Peg(pub i32);

impl From<i32> for Peg {
    fn from(label: i32) -> Self {
        Peg(label)
    }
}

impl fmt::Display for Peg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single disk move between two pegs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Peg,
    pub to: Peg,
}

impl Move {
    pub fn new(from: impl Into<Peg>, to: impl Into<Peg>) -> Self {
        Move {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move from {} to {}", self.from, self.to)
    }
}

/// Resume point recorded in a frame, read back when the frame returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Continuation {
    AfterLeafMove = 1,
    AfterFirstRecursion = 2,
    AfterMiddleMove = 3,
    AfterSecondRecursion = 4,
    ProgramEnd = 5,
}

impl Continuation {
    pub const ALL: [Continuation; 5] = [
        Continuation::AfterLeafMove,
        Continuation::AfterFirstRecursion,
        Continuation::AfterMiddleMove,
        Continuation::AfterSecondRecursion,
        Continuation::ProgramEnd,
    ];

    /// Byte tag used in the raw frame encoding
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Decode a byte tag; anything outside the closed set is rejected
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.tag() == tag)
    }

    pub fn label(self) -> &'static str {
        match self {
            Continuation::AfterLeafMove => "after-leaf-move",
            Continuation::AfterFirstRecursion => "after-first-recursion",
            Continuation::AfterMiddleMove => "after-middle-move",
            Continuation::AfterSecondRecursion => "after-second-recursion",
            Continuation::ProgramEnd => "program-end",
        }
    }
}

impl fmt::Display for Continuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Activation record for one call of the Hanoi procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub disk_count: u32,
    pub source: Peg,
    pub temp: Peg,
    pub target: Peg,
    pub continuation: Continuation,
}

impl Frame {
    /// The frame for the top-level call; returning from it ends the program
    pub fn root(disk_count: u32, source: Peg, temp: Peg, target: Peg) -> Self {
        Frame {
            disk_count,
            source,
            temp,
            target,
            continuation: Continuation::ProgramEnd,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.disk_count == 1
    }

    pub(crate) const BLANK: Frame = Frame {
        disk_count: 0,
        source: Peg(0),
        temp: Peg(0),
        target: Peg(0),
        continuation: Continuation::ProgramEnd,
    };
}

/// Where a frame lives inside its storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLocation {
    /// Index into a record array
    Slot(usize),
    /// Byte offset into a raw region
    Offset(usize),
    /// Individually boxed, linked to its caller
    Linked,
}

impl fmt::Display for FrameLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameLocation::Slot(index) => write!(f, "slot[{}]", index),
            FrameLocation::Offset(offset) => write!(f, "0x{:04x}", offset),
            FrameLocation::Linked => write!(f, "box"),
        }
    }
}

/// Read-only view of one live frame, used by snapshots and the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameView {
    pub depth: usize,
    pub location: FrameLocation,
    pub caller: Option<FrameLocation>,
    pub frame: Frame,
}
