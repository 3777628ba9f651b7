// Integration tests for the Hanoi stack machine

use hanoi_stack::machine::engine::{run, run_with, Machine, State};
use hanoi_stack::machine::errors::{ErrorKind, MachineError};
use hanoi_stack::machine::reference;
use hanoi_stack::memory::frame::{Move, Peg};
use hanoi_stack::memory::stack::{FixedSlots, FramePool, FrameStorage, LinkedFrames, StorageKind};
use hanoi_stack::memory::arena::ByteArena;
use hanoi_stack::towers::Towers;
use pretty_assertions::assert_eq;

fn moves(pairs: &[(i32, i32)]) -> Vec<Move> {
    pairs.iter().map(|&(from, to)| Move::new(from, to)).collect()
}

#[test]
fn test_matches_recursive_reference_up_to_twelve() {
    for n in 1..=12 {
        let expected = reference::hanoi(n, 1, 2, 3).expect("reference failed");
        let actual = run(n, 1, 2, 3).expect("machine failed");
        assert_eq!(actual, expected, "sequences differ for {} disks", n);
    }
}

#[test]
fn test_move_count_law() {
    for n in 1..=12u32 {
        let produced = run(i64::from(n), 1, 2, 3).unwrap();
        assert_eq!(produced.len(), (1usize << n) - 1);
    }
}

#[test]
fn test_depth_never_exceeds_disk_count() {
    for n in 1..=10 {
        let mut machine = Machine::new(LinkedFrames::new());
        machine.start(n, 1, 2, 3).unwrap();
        let mut observed = machine.depth();
        while !machine.is_halted() {
            machine.step().unwrap();
            observed = observed.max(machine.depth());
            assert!(machine.depth() <= n as usize);
        }
        assert_eq!(observed, n as usize);
        assert_eq!(machine.max_depth(), n as usize);
        assert_eq!(machine.depth(), 0);
    }
}

#[test]
fn test_every_storage_produces_identical_output() {
    for n in 1..=9 {
        let expected = run_with(FramePool::new(), n, 1, 2, 3).unwrap();
        assert_eq!(run_with(FixedSlots::<9>::new(), n, 1, 2, 3).unwrap(), expected);
        assert_eq!(run_with(LinkedFrames::new(), n, 1, 2, 3).unwrap(), expected);
        assert_eq!(run_with(ByteArena::with_frames(9), n, 1, 2, 3).unwrap(), expected);
        for kind in StorageKind::ALL {
            assert_eq!(run_with(kind.build(), n, 1, 2, 3).unwrap(), expected);
        }
    }
}

#[test]
fn test_single_disk_is_one_move_from_root() {
    let mut machine = Machine::new(FixedSlots::<1>::new());
    machine.start(1, 1, 2, 3).unwrap();
    machine.run().unwrap();
    assert_eq!(machine.moves(), &[Move::new(1, 3)]);
    assert_eq!(machine.max_depth(), 1);
    assert_eq!(machine.visits(State::Recurse1), 0);
}

#[test]
fn test_zero_and_negative_disks_rejected() {
    for n in [0, -1] {
        let err = run(n, 1, 2, 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        for kind in StorageKind::ALL {
            let mut machine = Machine::new(kind.build());
            assert!(machine.start(n, 1, 2, 3).is_err());
            assert!(machine.moves().is_empty());
            assert_eq!(machine.depth(), 0);
        }
    }
}

#[test]
fn test_three_disk_scenario() {
    // Three disks from peg 1 to peg 2, with peg 3 as the spare
    let produced = run(3, 1, 3, 2).unwrap();
    assert_eq!(
        produced,
        moves(&[(1, 2), (1, 3), (2, 3), (1, 2), (3, 1), (3, 2), (1, 2)])
    );
}

#[test]
fn test_three_disk_classic_target() {
    let produced = run(3, 1, 2, 3).unwrap();
    assert_eq!(
        produced,
        moves(&[(1, 3), (1, 2), (3, 2), (1, 3), (2, 1), (2, 3), (1, 3)])
    );
}

#[test]
fn test_fixed_slots_too_small_is_exhausted() {
    let err = run_with(FixedSlots::<3>::new(), 4, 1, 2, 3).unwrap_err();
    assert_eq!(
        err,
        MachineError::ResourceExhausted {
            storage: "fixed",
            requested_depth: 4,
            capacity: 3,
        }
    );
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_byte_arena_too_small_is_exhausted() {
    let err = run_with(ByteArena::with_frames(2), 5, 1, 2, 3).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
}

#[test]
fn test_fixed_slots_exact_fit() {
    assert_eq!(run_with(FixedSlots::<5>::new(), 5, 1, 2, 3).unwrap().len(), 31);
    assert_eq!(run_with(ByteArena::with_frames(5), 5, 1, 2, 3).unwrap().len(), 31);
}

#[test]
fn test_pool_released_between_runs() {
    let mut machine = Machine::new(FramePool::new());
    machine.start(6, 1, 2, 3).unwrap();
    assert_eq!(machine.storage().capacity(), Some(6));
    machine.run().unwrap();
    machine.start(2, 1, 2, 3).unwrap();
    assert_eq!(machine.storage().capacity(), Some(2));
}

#[test]
fn test_output_replays_legally() {
    for n in 1..=10u32 {
        let produced = run(i64::from(n), 1, 2, 3).unwrap();
        let towers = Towers::replay(n, [Peg(1), Peg(2), Peg(3)], &produced).unwrap();
        assert!(towers.is_solved(), "{} disks not solved", n);
    }
}

#[test]
fn test_chain_links_back_to_root() {
    for kind in StorageKind::ALL {
        let mut machine = Machine::new(kind.build());
        machine.start(4, 1, 2, 3).unwrap();
        while machine.depth() < 4 {
            machine.step().unwrap();
        }
        let chain = machine.chain().unwrap();
        assert_eq!(chain.len(), 4);
        assert_eq!(chain[0].caller, None, "{} root has a caller", kind);
        for pair in chain.windows(2) {
            assert_eq!(pair[1].caller, Some(pair[0].location));
            assert_eq!(pair[1].frame.disk_count + 1, pair[0].frame.disk_count);
        }
    }
}

#[test]
fn test_move_lines_render() {
    let lines: Vec<String> = run(2, 1, 2, 3)
        .unwrap()
        .iter()
        .map(|m| m.to_string())
        .collect();
    assert_eq!(
        lines,
        vec!["Move from 1 to 2", "Move from 1 to 3", "Move from 2 to 3"]
    );
}

#[test]
fn test_unallocatable_pool_reports_exhaustion() {
    let err = run(3_000_000_000, 1, 2, 3).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_machine_accepts_repeated_labels() {
    assert_eq!(
        run(2, 1, 1, 1).unwrap(),
        moves(&[(1, 1), (1, 1), (1, 1)])
    );
}
