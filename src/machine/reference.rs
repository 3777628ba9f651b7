//! Natively recursive Hanoi, used as the oracle for the stack machine
//!
//! [`hanoi`] is the textbook recurrence. [`hanoi1`] through [`hanoi4`] are the
//! same procedure unrolled to a fixed disk count, each built from the one
//! below it; they show the shape the general recursion abstracts over.
//!
//! Dropping the base case (recursing on `hanoi(n, ...)` without ever reaching
//! a single-disk call) never terminates; that variant is deliberately absent.

use crate::machine::engine::validate_disk_count;
use crate::machine::errors::MachineError;
use crate::memory::frame::{Move, Peg};

/// All moves for `disk_count` disks, computed with native recursion
pub fn hanoi(
    disk_count: i64,
    source: impl Into<Peg>,
    temp: impl Into<Peg>,
    target: impl Into<Peg>,
) -> Result<Vec<Move>, MachineError> {
    let disks = validate_disk_count(disk_count)?;
    let mut moves = Vec::new();
    recurse(disks, source.into(), temp.into(), target.into(), &mut moves);
    Ok(moves)
}

fn recurse(disks: u32, source: Peg, temp: Peg, target: Peg, moves: &mut Vec<Move>) {
    if disks == 1 {
        moves.push(Move {
            from: source,
            to: target,
        });
    } else {
        recurse(disks - 1, source, target, temp, moves);
        recurse(1, source, temp, target, moves);
        recurse(disks - 1, temp, source, target, moves);
    }
}

pub fn hanoi1(source: Peg, _temp: Peg, target: Peg, moves: &mut Vec<Move>) {
    moves.push(Move {
        from: source,
        to: target,
    });
}

pub fn hanoi2(source: Peg, temp: Peg, target: Peg, moves: &mut Vec<Move>) {
    hanoi1(source, target, temp, moves);
    hanoi1(source, temp, target, moves);
    hanoi1(temp, source, target, moves);
}

pub fn hanoi3(source: Peg, temp: Peg, target: Peg, moves: &mut Vec<Move>) {
    hanoi2(source, target, temp, moves);
    hanoi1(source, temp, target, moves);
    hanoi2(temp, source, target, moves);
}

pub fn hanoi4(source: Peg, temp: Peg, target: Peg, moves: &mut Vec<Move>) {
    hanoi3(source, target, temp, moves);
    hanoi1(source, temp, target, moves);
    hanoi3(temp, source, target, moves);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrolled_variants_match_recursion() {
        let unrolled: [fn(Peg, Peg, Peg, &mut Vec<Move>); 4] = [hanoi1, hanoi2, hanoi3, hanoi4];
        for (i, f) in unrolled.iter().enumerate() {
            let mut moves = Vec::new();
            f(Peg(1), Peg(2), Peg(3), &mut moves);
            assert_eq!(moves, hanoi(i as i64 + 1, 1, 2, 3).unwrap());
        }
    }

    #[test]
    fn test_reference_rejects_zero() {
        assert!(hanoi(0, 1, 2, 3).is_err());
    }
}
