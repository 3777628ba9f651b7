//! Hanoi stack machine
//!
//! This module provides the execution logic:
//! - [`engine`]: The state-dispatch loop and the `run` entry points
//! - [`errors`]: Machine error types
//! - [`reference`]: Natively recursive oracle
//! - [`timeline`]: Snapshotted run with time-travel navigation
//! - [`constants`]: Default sizes and peg labels
//!
//! # Execution Model
//!
//! The machine never uses the host call stack for the recursion. Each call is
//! a frame pushed onto a [`crate::memory::stack::FrameStorage`], each return
//! pops it and resumes at the continuation the frame recorded.

pub mod constants;
pub mod engine;
pub mod errors;
pub mod reference;
pub mod timeline;

pub use engine::{run, run_with, Machine, State};
pub use errors::{ErrorKind, MachineError};
