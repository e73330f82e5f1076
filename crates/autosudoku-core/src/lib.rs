//! Core engine for the Sudoku auto-completion app.
//!
//! The library owns everything that is not presentation: the 9x9 board,
//! clue validation, the backtracking solver, the step trace it records
//! (every assignment and every undo), and the line-oriented text form the
//! trace is exported to for the graph viewer. Progress reporting goes
//! through the [`ProgressSink`] capability so the engine never touches a
//! terminal or window handle.

mod board;
mod progress;
mod solver;
mod trace;
mod validate;

pub use board::{Board, OriginalMask, Position};
pub use progress::{NullProgress, ProgressSink};
pub use solver::{Solution, SolveError, SolveResult, Solver};
pub use trace::{StepTrace, TraceError, TraceResult};
