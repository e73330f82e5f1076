use crate::board::{Board, OriginalMask};
use crate::progress::{NullProgress, ProgressSink};
use crate::trace::StepTrace;
use std::fmt;

/// Result type for solve operations
pub type SolveResult<T> = Result<T, SolveError>;

/// Why a solve produced no solution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    /// The clues already conflict with each other; solving was not attempted
    InvalidPuzzle,
    /// The clues are consistent but admit no completion
    Unsolvable,
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPuzzle => write!(f, "puzzle contains conflicting clues"),
            Self::Unsolvable => write!(f, "puzzle has no solution"),
        }
    }
}

impl std::error::Error for SolveError {}

/// A completed solve: the filled board, the clue mask taken at solve
/// start, and the full trace of every assignment and backtrack.
#[derive(Debug, Clone)]
pub struct Solution {
    pub board: Board,
    pub mask: OriginalMask,
    pub trace: StepTrace,
}

/// Naive backtracking solver: fills the first empty cell (row-major) with
/// the lowest workable digit and recurses, undoing on dead ends. Always
/// returns the first solution in that deterministic order.
#[derive(Debug, Default)]
pub struct Solver;

impl Solver {
    pub fn new() -> Self {
        Self
    }

    /// Validate the clues, then search for the first completion
    pub fn solve(&self, board: &Board) -> SolveResult<Solution> {
        self.solve_with_progress(board, &mut NullProgress)
    }

    /// Like `solve`, reporting completion percentage after every assignment
    pub fn solve_with_progress<P: ProgressSink>(
        &self,
        board: &Board,
        progress: &mut P,
    ) -> SolveResult<Solution> {
        if !board.check_initial_validity() {
            return Err(SolveError::InvalidPuzzle);
        }
        let mask = OriginalMask::of(board);
        let mut working = board.clone();
        let mut trace = StepTrace::new();
        if self.solve_in_place(&mut working, &mut trace, progress) {
            Ok(Solution {
                board: working,
                mask,
                trace,
            })
        } else {
            Err(SolveError::Unsolvable)
        }
    }

    /// Low-level entry: fill `board` in place, recording a snapshot after
    /// every assignment and every undo. The caller must have already run
    /// `check_initial_validity`; a false return means the puzzle is
    /// unsolvable, not that an error occurred. Clue cells are never
    /// touched: the search space is exactly the cells that are empty on
    /// entry.
    pub fn solve_in_place<P: ProgressSink>(
        &self,
        board: &mut Board,
        trace: &mut StepTrace,
        progress: &mut P,
    ) -> bool {
        let pos = match board.find_next_empty() {
            Some(pos) => pos,
            None => return true,
        };

        for value in 1..=9 {
            if !board.is_valid_placement(pos, value) {
                continue;
            }

            board.set(pos, Some(value));
            trace.record(board);
            progress.report(percent_filled(board));

            if self.solve_in_place(board, trace, progress) {
                return true;
            }

            board.set(pos, None);
            trace.record(board);
        }

        false
    }
}

fn percent_filled(board: &Board) -> u8 {
    (board.filled_count() * 100 / 81) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;

    const PUZZLE: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
    const SOLVED: &str =
        "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

    /// Sink that keeps every reported percentage
    struct Recorder(Vec<u8>);

    impl ProgressSink for Recorder {
        fn report(&mut self, percent: u8) {
            self.0.push(percent);
        }
    }

    #[test]
    fn test_solve_classic_puzzle() {
        let board = Board::from_string(PUZZLE).unwrap();
        let solution = Solver::new().solve(&board).unwrap();

        assert!(solution.board.is_complete());
        assert!(solution.board.check_initial_validity());
        assert_eq!(solution.board.to_string_compact(), SOLVED);
    }

    #[test]
    fn test_solve_does_not_touch_clues() {
        let board = Board::from_string(PUZZLE).unwrap();
        let solution = Solver::new().solve(&board).unwrap();

        for row in 0..9 {
            for col in 0..9 {
                let pos = Position::new(row, col);
                if let Some(clue) = board.get(pos) {
                    assert!(solution.mask.is_given(pos));
                    assert_eq!(solution.board.get(pos), Some(clue));
                }
            }
        }
    }

    #[test]
    fn test_solve_all_empty_board() {
        let solution = Solver::new().solve(&Board::empty()).unwrap();
        assert!(solution.board.is_complete());
        assert!(solution.board.check_initial_validity());
        assert_eq!(solution.mask.given_count(), 0);
    }

    #[test]
    fn test_invalid_puzzle_rejected_before_solving() {
        let mut board = Board::empty();
        board.set(Position::new(0, 0), Some(5));
        board.set(Position::new(0, 1), Some(5));

        assert_eq!(
            Solver::new().solve(&board).unwrap_err(),
            SolveError::InvalidPuzzle
        );
    }

    #[test]
    fn test_unsolvable_puzzle() {
        // Row 0 holds 1..8 and column 8 holds 9, so (0, 8) has no
        // candidate. No clue conflicts with another, so the board passes
        // the initial validity check.
        let mut board = Board::empty();
        for col in 0..8 {
            board.set(Position::new(0, col), Some(col as u8 + 1));
        }
        board.set(Position::new(1, 8), Some(9));

        assert!(board.check_initial_validity());
        assert_eq!(
            Solver::new().solve(&board).unwrap_err(),
            SolveError::Unsolvable
        );
    }

    #[test]
    fn test_unique_completion_fills_missing_value() {
        // A solved grid with one hole admits exactly one completion and
        // the solver must find it in a single step.
        let mut board = Board::from_string(SOLVED).unwrap();
        board.set(Position::new(4, 4), None);

        let solution = Solver::new().solve(&board).unwrap();
        assert_eq!(solution.board.get(Position::new(4, 4)), Some(5));
        assert_eq!(solution.trace.len(), 1);
    }

    #[test]
    fn test_first_progress_update_on_empty_board() {
        let mut recorder = Recorder(Vec::new());
        Solver::new()
            .solve_with_progress(&Board::empty(), &mut recorder)
            .unwrap();

        // One filled cell out of 81 truncates to 1 percent
        assert_eq!(recorder.0.first(), Some(&1));
        assert_eq!(recorder.0.last(), Some(&100));
        assert!(recorder.0.iter().all(|p| *p <= 100));
    }

    #[test]
    fn test_trace_records_assignments_and_undos() {
        let board = Board::from_string(PUZZLE).unwrap();
        let solution = Solver::new().solve(&board).unwrap();

        // Every snapshot differs from its predecessor by exactly one cell
        let empties = board.empty_count();
        assert!(solution.trace.len() >= empties);
        let counts = solution.trace.filled_counts();
        assert_eq!(counts.last(), Some(&81));
        let mut prev = board.filled_count();
        for count in counts {
            assert!(count == prev + 1 || count == prev - 1);
            prev = count;
        }
    }
}
