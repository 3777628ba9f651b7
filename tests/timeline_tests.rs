// Time-travel tests over recorded runs

use hanoi_stack::machine::engine::State;
use hanoi_stack::machine::errors::MachineError;
use hanoi_stack::machine::timeline::Timeline;
use hanoi_stack::machine::run;
use hanoi_stack::memory::arena::ByteArena;
use hanoi_stack::memory::frame::FrameLocation;
use hanoi_stack::memory::stack::{FramePool, LinkedFrames};
use pretty_assertions::assert_eq;

const LIMIT: usize = 64 * 1024 * 1024;

#[test]
fn test_backward_then_forward_restores_same_snapshot() {
    let mut timeline = Timeline::record(LinkedFrames::new(), 4, 1, 2, 3, LIMIT).unwrap();
    for _ in 0..20 {
        timeline.step_forward().unwrap();
    }
    let before = timeline.current().unwrap().clone();

    for _ in 0..7 {
        timeline.step_backward().unwrap();
    }
    for _ in 0..7 {
        timeline.step_forward().unwrap();
    }
    assert_eq!(timeline.current().unwrap(), &before);
}

#[test]
fn test_final_snapshot_holds_full_output() {
    let mut timeline = Timeline::record(FramePool::new(), 5, 1, 2, 3, LIMIT).unwrap();
    timeline.jump_to_end().unwrap();
    let last = timeline.current().unwrap();
    assert_eq!(last.state, State::Halted);
    assert!(last.frames.is_empty());
    assert_eq!(timeline.moves_so_far(), run(5, 1, 2, 3).unwrap());
}

#[test]
fn test_depth_tracks_snapshots() {
    let mut timeline = Timeline::record(FramePool::new(), 3, 1, 2, 3, LIMIT).unwrap();
    let mut deepest = 0;
    loop {
        let snapshot = timeline.current().unwrap();
        deepest = deepest.max(snapshot.depth());
        if timeline.step_forward().is_err() {
            break;
        }
    }
    assert_eq!(deepest, 3);
}

#[test]
fn test_byte_arena_frames_report_offsets() {
    let mut timeline = Timeline::record(ByteArena::with_frames(4), 3, 1, 2, 3, LIMIT).unwrap();
    while timeline.current().unwrap().depth() < 2 {
        timeline.step_forward().unwrap();
    }
    let frames = &timeline.current().unwrap().frames;
    assert_eq!(frames[0].location, FrameLocation::Offset(0));
    assert_eq!(frames[1].location, FrameLocation::Offset(32));
    assert_eq!(frames[1].caller, Some(FrameLocation::Offset(0)));
}

#[test]
fn test_exhausted_run_is_navigable() {
    let mut timeline = Timeline::record(ByteArena::with_frames(2), 3, 1, 2, 3, LIMIT).unwrap();
    assert!(matches!(
        timeline.error(),
        Some(MachineError::ResourceExhausted { capacity: 2, .. })
    ));
    timeline.jump_to_end().unwrap();
    assert_eq!(timeline.current().unwrap().depth(), 2);
    timeline.rewind_to_start().unwrap();
    assert_eq!(timeline.current().unwrap().state, State::Apply);
}
