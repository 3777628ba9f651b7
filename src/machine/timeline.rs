// Recorded execution history with forward/backward navigation

use crate::machine::engine::Machine;
use crate::machine::errors::MachineError;
use crate::memory::frame::{Move, Peg};
use crate::memory::stack::FrameStorage;
use crate::snapshot::{MoveLine, MoveLog, Snapshot, SnapshotManager};

/// A complete run of the machine, snapshotted after every step
///
/// The run happens up front in [`Timeline::record`]; navigation afterwards
/// only moves a cursor through the stored snapshots. A run that fails midway
/// keeps the history up to the failure together with the error.
#[derive(Debug)]
pub struct Timeline {
    snapshots: SnapshotManager,
    log: MoveLog,
    position: usize,
    root_disks: u32,
    pegs: [Peg; 3],
    storage_name: &'static str,
    capacity: Option<usize>,
    error: Option<MachineError>,
}

impl Timeline {
    /// Run the machine over `storage`, recording a snapshot per step.
    ///
    /// Invalid input is returned as an error since there is nothing to show.
    pub fn record<S: FrameStorage>(
        storage: S,
        disk_count: i64,
        source: impl Into<Peg>,
        temp: impl Into<Peg>,
        target: impl Into<Peg>,
        memory_limit: usize,
    ) -> Result<Self, MachineError> {
        let pegs = [source.into(), temp.into(), target.into()];
        let mut machine = Machine::new(storage);
        machine.start(disk_count, pegs[0], pegs[1], pegs[2])?;

        let mut timeline = Timeline {
            snapshots: SnapshotManager::new(memory_limit),
            log: MoveLog::new(),
            position: 0,
            root_disks: machine.root_disks(),
            pegs,
            storage_name: machine.storage().name(),
            capacity: machine.storage().capacity(),
            error: None,
        };

        if let Err(e) = timeline.capture(&machine, None) {
            timeline.error = Some(e);
            return Ok(timeline);
        }

        while !machine.is_halted() {
            let outcome = machine
                .step()
                .and_then(|emitted| timeline.capture(&machine, emitted));
            if let Err(e) = outcome {
                log::warn!("history stopped at step {}: {}", machine.steps(), e);
                timeline.error = Some(e);
                break;
            }
        }

        Ok(timeline)
    }

    fn capture<S: FrameStorage>(
        &mut self,
        machine: &Machine<S>,
        emitted: Option<Move>,
    ) -> Result<(), MachineError> {
        if let Some(mv) = emitted {
            self.log.record(mv, machine.steps());
        }
        self.snapshots.push(Snapshot {
            step: machine.steps(),
            state: machine.state(),
            frames: machine.chain()?,
            move_count: machine.moves().len(),
            last_move: emitted,
        })
    }

    /// Step backward in execution (restore previous snapshot)
    pub fn step_backward(&mut self) -> Result<(), MachineError> {
        if self.position == 0 {
            return Err(MachineError::HistoryOperationFailed {
                message: "Already at the beginning of execution".to_string(),
            });
        }
        self.position -= 1;
        Ok(())
    }

    /// Step forward in execution (restore next snapshot)
    pub fn step_forward(&mut self) -> Result<(), MachineError> {
        if self.position + 1 >= self.snapshots.len() {
            return Err(MachineError::HistoryOperationFailed {
                message: "No more snapshots available (execution finished)".to_string(),
            });
        }
        self.position += 1;
        Ok(())
    }

    /// Rewind to the beginning of execution history
    pub fn rewind_to_start(&mut self) -> Result<(), MachineError> {
        if self.snapshots.is_empty() {
            return Err(MachineError::HistoryOperationFailed {
                message: "No snapshots available".to_string(),
            });
        }
        self.position = 0;
        Ok(())
    }

    /// Jump to the last recorded snapshot
    pub fn jump_to_end(&mut self) -> Result<(), MachineError> {
        if self.snapshots.is_empty() {
            return Err(MachineError::HistoryOperationFailed {
                message: "No snapshots available".to_string(),
            });
        }
        self.position = self.snapshots.len() - 1;
        Ok(())
    }

    // ========== Getter methods for UI ==========

    /// Snapshot at the cursor
    pub fn current(&self) -> Option<&Snapshot> {
        self.snapshots.get(self.position)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Total number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    fn move_count(&self) -> usize {
        self.current().map_or(0, |snapshot| snapshot.move_count)
    }

    /// Moves emitted up to the cursor
    pub fn moves_so_far(&self) -> Vec<Move> {
        self.log.moves(self.move_count())
    }

    /// Moves emitted up to the cursor, with the step that emitted each
    pub fn move_lines_so_far(&self) -> &[MoveLine] {
        self.log.lines(self.move_count())
    }

    pub fn root_disks(&self) -> u32 {
        self.root_disks
    }

    /// Source, temp and target pegs of the root call
    pub fn pegs(&self) -> [Peg; 3] {
        self.pegs
    }

    pub fn storage_name(&self) -> &'static str {
        self.storage_name
    }

    /// Frame capacity of the storage, if bounded
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// The error that cut the run short, if any
    pub fn error(&self) -> Option<&MachineError> {
        self.error.as_ref()
    }

    /// Bytes held by recorded snapshots
    pub fn memory_usage(&self) -> usize {
        self.snapshots.memory_usage()
    }

    pub fn memory_limit(&self) -> usize {
        self.snapshots.memory_limit()
    }
}
