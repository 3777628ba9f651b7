//! # Introduction
//!
//! hanoi-stack solves the Towers of Hanoi without using the host call stack
//! for the recursion. The recursive procedure is compiled by hand into a
//! straight-line program of labeled states, and every "call" allocates, links
//! and later tears down an explicit activation record. Each step of that
//! machine can be recorded and navigated forward and backward through a
//! terminal UI built with [ratatui](https://docs.rs/ratatui).
//!
//! ## Execution pipeline
//!
//! ```text
//! Disk count → Root frame → State dispatch loop → Moves
//!                                 ↓
//!                           Snapshots → TUI
//! ```
//!
//! 1. [`memory`]: frame records, the byte layout, and the storage backings
//!    (inline slot array, heap pool, linked chain, raw byte arena).
//! 2. [`machine`]: the dispatch loop, its errors, the recursive oracle, and
//!    the recorded [`machine::timeline::Timeline`].
//! 3. [`snapshot`]: snapshot history with a configurable memory limit and the
//!    [`snapshot::MoveLog`] of emitted moves.
//! 4. [`towers`]: three-peg model that checks move legality.
//! 5. [`cli`]: command-line option parsing.
//! 6. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use hanoi_stack::machine::run;
//!
//! let moves = run(2, 1, 2, 3).unwrap();
//! let lines: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
//! assert_eq!(lines, ["Move from 1 to 2", "Move from 1 to 3", "Move from 2 to 3"]);
//! ```

pub mod cli;
pub mod machine;
pub mod memory;
pub mod snapshot;
pub mod towers;
pub mod ui;
