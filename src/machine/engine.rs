// Dispatch loop for the Hanoi stack machine

use crate::machine::errors::MachineError;
use crate::memory::frame::{Continuation, Frame, FrameView, Move, Peg};
use crate::memory::stack::{FramePool, FrameStorage};
use rustc_hash::FxHashMap;
use std::fmt;

/// Labeled position in the machine's straight-line program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Entry point of a call: inspect the disk count
    Apply,
    /// Single-disk call: emit the move
    LeafMove,
    /// Call for the top `n - 1` disks, source onto temp
    Recurse1,
    /// Call for the single bottom disk
    AfterFirstRecursion,
    /// Call for the `n - 1` disks, temp onto target
    AfterMiddleMove,
    /// Nothing left to do in this frame
    AfterSecondRecursion,
    /// Pop the frame and resume the caller at its continuation
    Return,
    /// The root frame returned
    Halted,
}

impl State {
    pub const ALL: [State; 8] = [
        State::Apply,
        State::LeafMove,
        State::Recurse1,
        State::AfterFirstRecursion,
        State::AfterMiddleMove,
        State::AfterSecondRecursion,
        State::Return,
        State::Halted,
    ];

    /// State to resume in after a frame carrying `continuation` returns
    pub fn resume(continuation: Continuation) -> State {
        match continuation {
            // A leaf call has no work left after its move
            Continuation::AfterLeafMove => State::Return,
            Continuation::AfterFirstRecursion => State::AfterFirstRecursion,
            Continuation::AfterMiddleMove => State::AfterMiddleMove,
            Continuation::AfterSecondRecursion => State::AfterSecondRecursion,
            Continuation::ProgramEnd => State::Halted,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            State::Apply => "apply",
            State::LeafMove => "leaf-move",
            State::Recurse1 => "not-one",
            State::AfterFirstRecursion => "move-one",
            State::AfterMiddleMove => "move-n-minus-1",
            State::AfterSecondRecursion => "after-second",
            State::Return => "return",
            State::Halted => "halted",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validate a requested disk count before any frame is created
pub fn validate_disk_count(disk_count: i64) -> Result<u32, MachineError> {
    if disk_count < 1 {
        return Err(MachineError::invalid_disk_count(disk_count));
    }
    u32::try_from(disk_count).map_err(|_| MachineError::InvalidArgument {
        message: format!("disk count {} is too large", disk_count),
    })
}

/// Iterative Towers of Hanoi over an explicit, caller-managed frame stack
///
/// Each [`Machine::step`] executes exactly one [`State`]. Calls push a fully
/// populated frame and jump to [`State::Apply`]; returns pop the current frame
/// and jump to the state named by its [`Continuation`].
#[derive(Debug)]
pub struct Machine<S: FrameStorage> {
    storage: S,
    state: State,
    root_disks: u32,
    moves: Vec<Move>,
    steps: usize,
    max_depth: usize,
    visits: FxHashMap<State, usize>,
}

impl<S: FrameStorage> Machine<S> {
    /// Create a halted machine over the given frame storage
    pub fn new(storage: S) -> Self {
        Machine {
            storage,
            state: State::Halted,
            root_disks: 0,
            moves: Vec::new(),
            steps: 0,
            max_depth: 0,
            visits: FxHashMap::default(),
        }
    }

    /// Validate the input and install the root frame
    pub fn start(
        &mut self,
        disk_count: i64,
        source: impl Into<Peg>,
        temp: impl Into<Peg>,
        target: impl Into<Peg>,
    ) -> Result<(), MachineError> {
        let disks = validate_disk_count(disk_count)?;

        self.state = State::Halted;
        self.root_disks = disks;
        self.moves.clear();
        self.steps = 0;
        self.max_depth = 0;
        self.visits.clear();

        self.storage.reset(disks)?;
        self.storage
            .push(Frame::root(disks, source.into(), temp.into(), target.into()))?;
        self.max_depth = self.storage.depth();
        self.state = State::Apply;

        log::debug!(
            "starting run: {} disk(s) on {} storage",
            disks,
            self.storage.name()
        );
        Ok(())
    }

    /// Execute the current state. Returns the move emitted, if any.
    ///
    /// Stepping a halted machine does nothing.
    pub fn step(&mut self) -> Result<Option<Move>, MachineError> {
        let executing = self.state;
        let mut emitted = None;

        match executing {
            State::Apply => {
                let frame = self.storage.current()?;
                self.state = if frame.is_leaf() {
                    State::LeafMove
                } else {
                    State::Recurse1
                };
            }
            State::LeafMove => {
                let frame = self.storage.current()?;
                if !frame.is_leaf() {
                    return Err(MachineError::invariant(format!(
                        "leaf move on frame holding {} disks",
                        frame.disk_count
                    )));
                }
                let mv = Move {
                    from: frame.source,
                    to: frame.target,
                };
                self.moves.push(mv);
                emitted = Some(mv);
                self.state = State::Return;
            }
            State::Recurse1 => {
                let frame = self.storage.current()?;
                self.call(Frame {
                    disk_count: frame.disk_count.wrapping_sub(1),
                    source: frame.source,
                    temp: frame.target,
                    target: frame.temp,
                    continuation: Continuation::AfterFirstRecursion,
                })?;
            }
            State::AfterFirstRecursion => {
                let frame = self.storage.current()?;
                self.call(Frame {
                    disk_count: 1,
                    source: frame.source,
                    temp: frame.temp,
                    target: frame.target,
                    continuation: Continuation::AfterMiddleMove,
                })?;
            }
            State::AfterMiddleMove => {
                let frame = self.storage.current()?;
                self.call(Frame {
                    disk_count: frame.disk_count.wrapping_sub(1),
                    source: frame.temp,
                    temp: frame.source,
                    target: frame.target,
                    continuation: Continuation::AfterSecondRecursion,
                })?;
            }
            State::AfterSecondRecursion => {
                self.state = State::Return;
            }
            State::Return => {
                let continuation = self.storage.pop()?;
                self.state = State::resume(continuation);
                if self.state == State::Halted {
                    if self.storage.depth() != 0 {
                        return Err(MachineError::invariant(format!(
                            "program end reached with {} frame(s) still live",
                            self.storage.depth()
                        )));
                    }
                    log::debug!(
                        "run complete: {} move(s) in {} step(s), max depth {}",
                        self.moves.len(),
                        self.steps + 1,
                        self.max_depth
                    );
                }
            }
            State::Halted => return Ok(None),
        }

        self.steps += 1;
        *self.visits.entry(executing).or_insert(0) += 1;
        Ok(emitted)
    }

    /// Step until the root frame returns
    pub fn run(&mut self) -> Result<(), MachineError> {
        while self.state != State::Halted {
            if let Err(e) = self.step() {
                log::warn!("run aborted in state {}: {}", self.state, e);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Push `callee` as a new frame above the current one and enter it
    fn call(&mut self, callee: Frame) -> Result<(), MachineError> {
        if callee.disk_count < 1 || callee.disk_count > self.root_disks {
            return Err(MachineError::invariant(format!(
                "callee frame with {} disks (root has {})",
                callee.disk_count, self.root_disks
            )));
        }
        let depth = self.storage.depth() + 1;
        if depth > self.root_disks as usize {
            return Err(MachineError::invariant(format!(
                "frame chain depth {} exceeds root disk count {}",
                depth, self.root_disks
            )));
        }

        self.storage.push(callee)?;
        self.max_depth = self.max_depth.max(depth);
        self.state = State::Apply;
        Ok(())
    }

    // ========== Getter methods for UI ==========

    /// State the next step will execute
    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_halted(&self) -> bool {
        self.state == State::Halted
    }

    /// Current frame chain length
    pub fn depth(&self) -> usize {
        self.storage.depth()
    }

    /// Longest frame chain seen since the run started
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn root_disks(&self) -> u32 {
        self.root_disks
    }

    /// Number of states executed since the run started
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// How many times `state` has been executed
    pub fn visits(&self, state: State) -> usize {
        self.visits.get(&state).copied().unwrap_or(0)
    }

    /// Moves emitted so far
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn into_moves(self) -> Vec<Move> {
        self.moves
    }

    /// Live frames, root first
    pub fn chain(&self) -> Result<Vec<FrameView>, MachineError> {
        self.storage.chain()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

/// Run the machine to completion on the given storage
pub fn run_with<S: FrameStorage>(
    storage: S,
    disk_count: i64,
    source: impl Into<Peg>,
    temp: impl Into<Peg>,
    target: impl Into<Peg>,
) -> Result<Vec<Move>, MachineError> {
    let mut machine = Machine::new(storage);
    machine.start(disk_count, source, temp, target)?;
    machine.run()?;
    Ok(machine.into_moves())
}

/// Run the machine to completion on a heap-allocated frame pool
pub fn run(
    disk_count: i64,
    source: impl Into<Peg>,
    temp: impl Into<Peg>,
    target: impl Into<Peg>,
) -> Result<Vec<Move>, MachineError> {
    run_with(FramePool::new(), disk_count, source, temp, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::errors::ErrorKind;
    use crate::memory::stack::{FixedSlots, LinkedFrames};

    /// Linked storage that lies about its depth or the current disk count
    struct Misreporting {
        inner: LinkedFrames,
        extra_depth: usize,
        disk_count: Option<u32>,
    }

    impl Misreporting {
        fn new(extra_depth: usize, disk_count: Option<u32>) -> Self {
            Misreporting {
                inner: LinkedFrames::new(),
                extra_depth,
                disk_count,
            }
        }
    }

    impl FrameStorage for Misreporting {
        fn name(&self) -> &'static str {
            "misreporting"
        }

        fn reset(&mut self, root_disks: u32) -> Result<(), MachineError> {
            self.inner.reset(root_disks)
        }

        fn push(&mut self, frame: Frame) -> Result<(), MachineError> {
            self.inner.push(frame)
        }

        fn current(&self) -> Result<Frame, MachineError> {
            let mut frame = self.inner.current()?;
            if let Some(disk_count) = self.disk_count {
                frame.disk_count = disk_count;
            }
            Ok(frame)
        }

        fn pop(&mut self) -> Result<Continuation, MachineError> {
            self.inner.pop()
        }

        fn depth(&self) -> usize {
            self.inner.depth() + self.extra_depth
        }

        fn capacity(&self) -> Option<usize> {
            None
        }

        fn chain(&self) -> Result<Vec<FrameView>, MachineError> {
            self.inner.chain()
        }
    }

    #[test]
    fn test_call_past_root_depth_is_invariant_violation() {
        let mut machine = Machine::new(Misreporting::new(5, None));
        machine.start(3, 1, 2, 3).unwrap();
        assert_eq!(machine.step().unwrap(), None);
        assert_eq!(machine.state(), State::Recurse1);
        let err = machine.step().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalInvariantViolation);
        assert!(err.to_string().contains("exceeds root disk count"));
        assert_eq!(machine.storage().inner.depth(), 1);
    }

    #[test]
    fn test_callee_without_disks_is_invariant_violation() {
        // A zero disk count wraps when the child count is computed
        let mut machine = Machine::new(Misreporting::new(0, Some(0)));
        machine.start(3, 1, 2, 3).unwrap();
        machine.step().unwrap();
        let err = machine.step().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalInvariantViolation);
        assert!(err.to_string().contains("callee frame"));
    }

    #[test]
    fn test_callee_larger_than_root_is_invariant_violation() {
        let mut machine = Machine::new(Misreporting::new(0, Some(9)));
        machine.start(3, 1, 2, 3).unwrap();
        machine.step().unwrap();
        let err = machine.run().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalInvariantViolation);
    }

    #[test]
    fn test_return_on_empty_chain_is_invariant_violation() {
        let mut machine = Machine::new(LinkedFrames::new());
        machine.start(1, 1, 2, 3).unwrap();
        machine.step().unwrap();
        machine.step().unwrap();
        assert_eq!(machine.state(), State::Return);
        machine.storage.pop().unwrap();
        let err = machine.step().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalInvariantViolation);
    }

    #[test]
    fn test_single_disk_uses_only_root() {
        let mut machine = Machine::new(LinkedFrames::new());
        machine.start(1, 1, 2, 3).unwrap();
        assert_eq!(machine.state(), State::Apply);
        assert_eq!(machine.step().unwrap(), None);
        assert_eq!(machine.state(), State::LeafMove);
        assert_eq!(machine.step().unwrap(), Some(Move::new(1, 3)));
        assert_eq!(machine.state(), State::Return);
        assert_eq!(machine.step().unwrap(), None);
        assert!(machine.is_halted());
        assert_eq!(machine.max_depth(), 1);
        assert_eq!(machine.steps(), 3);
        assert_eq!(machine.visits(State::Recurse1), 0);
    }

    #[test]
    fn test_two_disk_transitions() {
        let mut machine = Machine::new(FixedSlots::<2>::new());
        machine.start(2, 1, 2, 3).unwrap();
        let mut trace = vec![machine.state()];
        while !machine.is_halted() {
            machine.step().unwrap();
            trace.push(machine.state());
        }
        use State::*;
        assert_eq!(
            trace,
            vec![
                Apply,
                Recurse1,
                Apply,
                LeafMove,
                Return,
                AfterFirstRecursion,
                Apply,
                LeafMove,
                Return,
                AfterMiddleMove,
                Apply,
                LeafMove,
                Return,
                AfterSecondRecursion,
                Return,
                Halted,
            ]
        );
        assert_eq!(
            machine.moves(),
            &[Move::new(1, 2), Move::new(1, 3), Move::new(2, 3)]
        );
    }

    #[test]
    fn test_step_after_halt_is_noop() {
        let mut machine = Machine::new(FramePool::new());
        machine.start(1, 1, 2, 3).unwrap();
        machine.run().unwrap();
        let steps = machine.steps();
        assert_eq!(machine.step().unwrap(), None);
        assert_eq!(machine.steps(), steps);
    }

    #[test]
    fn test_restart_clears_previous_run() {
        let mut machine = Machine::new(FramePool::new());
        machine.start(3, 1, 2, 3).unwrap();
        machine.run().unwrap();
        machine.start(2, 1, 2, 3).unwrap();
        machine.run().unwrap();
        assert_eq!(machine.moves().len(), 3);
        assert_eq!(machine.max_depth(), 2);
    }

    #[test]
    fn test_invalid_disk_count_creates_no_frame() {
        let mut machine = Machine::new(LinkedFrames::new());
        let err = machine.start(0, 1, 2, 3).unwrap_err();
        assert!(matches!(err, MachineError::InvalidArgument { .. }));
        assert_eq!(machine.depth(), 0);
        assert!(machine.is_halted());
    }

    #[test]
    fn test_validate_disk_count_bounds() {
        assert_eq!(validate_disk_count(1), Ok(1));
        assert!(validate_disk_count(-1).is_err());
        assert!(validate_disk_count(i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn test_state_labels_unique() {
        let mut labels: Vec<&str> = State::ALL.iter().map(|s| s.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), State::ALL.len());
    }
}
