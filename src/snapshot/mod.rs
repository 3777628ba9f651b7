// Snapshot management for reverse execution

use crate::machine::engine::State;
use crate::machine::errors::MachineError;
use crate::memory::frame::{FrameView, Move};

/// Log of emitted moves, each tagged with the step that produced it
#[derive(Debug, Clone)]
pub struct MoveLog {
    lines: Vec<MoveLine>,
}

impl MoveLog {
    pub fn new() -> Self {
        MoveLog { lines: Vec::new() }
    }

    pub fn record(&mut self, mv: Move, step: usize) {
        self.lines.push(MoveLine { mv, step });
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The first `count` moves
    pub fn moves(&self, count: usize) -> Vec<Move> {
        self.lines.iter().take(count).map(|line| line.mv).collect()
    }

    /// The first `count` lines
    pub fn lines(&self, count: usize) -> &[MoveLine] {
        &self.lines[..count.min(self.lines.len())]
    }
}

impl Default for MoveLog {
    fn default() -> Self {
        Self::new()
    }
}

/// A move with the step that emitted it
#[derive(Debug, Clone, Copy)]
pub struct MoveLine {
    pub mv: Move,
    pub step: usize,
}

/// Snapshot of machine state between two steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub step: usize,
    /// State the next step will execute
    pub state: State,
    /// Live frames, root first
    pub frames: Vec<FrameView>,
    /// Number of moves emitted so far
    pub move_count: usize,
    pub last_move: Option<Move>,
}

impl Snapshot {
    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        std::mem::size_of::<Snapshot>() + self.frames.len() * std::mem::size_of::<FrameView>()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

/// Manages execution history for reverse execution
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), MachineError> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(MachineError::SnapshotLimitExceeded {
                current: self.current_memory + snapshot_size,
                limit: self.max_memory,
            });
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// Get the number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Get current memory usage
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    /// Get max memory limit
    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}
