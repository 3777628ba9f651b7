//! Three-peg model used to check and display move sequences
//!
//! [`Towers`] starts with every disk on the source peg and applies moves one
//! at a time, refusing any move the puzzle forbids.

use crate::machine::errors::MachineError;
use crate::memory::frame::{Move, Peg};

/// Disks on each peg, bottom first; disk `1` is the smallest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Towers {
    pegs: [(Peg, Vec<u32>); 3],
    disks: u32,
}

impl Towers {
    pub fn new(disks: u32, source: Peg, temp: Peg, target: Peg) -> Result<Self, MachineError> {
        if source == temp || source == target || temp == target {
            return Err(MachineError::InvalidArgument {
                message: format!(
                    "peg labels must be distinct, got {}, {} and {}",
                    source, temp, target
                ),
            });
        }
        Ok(Towers {
            pegs: [
                (source, (1..=disks).rev().collect()),
                (temp, Vec::new()),
                (target, Vec::new()),
            ],
            disks,
        })
    }

    /// Replay `moves` from the starting position
    pub fn replay(
        disks: u32,
        [source, temp, target]: [Peg; 3],
        moves: &[Move],
    ) -> Result<Self, MachineError> {
        let mut towers = Towers::new(disks, source, temp, target)?;
        for mv in moves {
            towers.apply(*mv)?;
        }
        Ok(towers)
    }

    fn index_of(&self, peg: Peg) -> Result<usize, MachineError> {
        self.pegs
            .iter()
            .position(|(label, _)| *label == peg)
            .ok_or_else(|| MachineError::invariant(format!("move names unknown peg {}", peg)))
    }

    pub fn apply(&mut self, mv: Move) -> Result<(), MachineError> {
        let from = self.index_of(mv.from)?;
        let to = self.index_of(mv.to)?;

        let disk = *self.pegs[from].1.last().ok_or_else(|| {
            MachineError::invariant(format!("{}: peg {} is empty", mv, mv.from))
        })?;
        if let Some(&top) = self.pegs[to].1.last() {
            if top < disk {
                return Err(MachineError::invariant(format!(
                    "{}: disk {} cannot go on disk {}",
                    mv, disk, top
                )));
            }
        }

        self.pegs[from].1.pop();
        self.pegs[to].1.push(disk);
        Ok(())
    }

    /// Source, temp and target pegs with their disks, bottom first
    pub fn pegs(&self) -> &[(Peg, Vec<u32>); 3] {
        &self.pegs
    }

    pub fn disks(&self) -> u32 {
        self.disks
    }

    /// Every disk sits on the target peg
    pub fn is_solved(&self) -> bool {
        self.pegs[2].1.len() == self.disks as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pegs() -> [Peg; 3] {
        [Peg(1), Peg(2), Peg(3)]
    }

    #[test]
    fn test_replay_solves_two_disks() {
        let moves = [Move::new(1, 2), Move::new(1, 3), Move::new(2, 3)];
        let towers = Towers::replay(2, pegs(), &moves).unwrap();
        assert!(towers.is_solved());
        assert_eq!(towers.pegs()[2].1, vec![2, 1]);
    }

    #[test]
    fn test_rejects_larger_on_smaller() {
        let moves = [Move::new(1, 2), Move::new(1, 2)];
        assert!(Towers::replay(2, pegs(), &moves).is_err());
    }

    #[test]
    fn test_rejects_empty_and_unknown_pegs() {
        let mut towers = Towers::new(1, Peg(1), Peg(2), Peg(3)).unwrap();
        assert!(towers.apply(Move::new(2, 3)).is_err());
        assert!(towers.apply(Move::new(1, 9)).is_err());
    }

    #[test]
    fn test_duplicate_labels_rejected() {
        assert!(Towers::new(3, Peg(1), Peg(1), Peg(3)).is_err());
    }
}
