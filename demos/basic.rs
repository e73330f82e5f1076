//! Basic example of using the auto-completion engine

use autosudoku_core::{Board, ProgressSink, Solver};

/// Print a progress line at every 20% milestone
struct PrintProgress(Option<u8>);

impl ProgressSink for PrintProgress {
    fn report(&mut self, percent: u8) {
        if self.0 != Some(percent) {
            self.0 = Some(percent);
            if percent % 20 == 0 {
                println!("  ...{}%", percent);
            }
        }
    }
}

fn main() {
    // Parse a puzzle from a string
    let puzzle_string =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
    let puzzle = Board::from_string(puzzle_string).expect("valid puzzle string");

    println!("Puzzle ({} clues):", puzzle.filled_count());
    println!("{}", puzzle);

    // The clues must be conflict-free before solving is attempted
    println!("Clues consistent: {}", puzzle.check_initial_validity());

    // Solve it
    println!("\nSolving...");
    let solver = Solver::new();
    match solver.solve_with_progress(&puzzle, &mut PrintProgress(None)) {
        Ok(solution) => {
            println!("\nSolution:");
            println!("{}", solution.board);
            println!("Steps recorded: {}", solution.trace.len());

            // The trace captures backtracking: filled counts move both ways
            let counts = solution.trace.filled_counts();
            let undos = counts.windows(2).filter(|w| w[1] < w[0]).count();
            println!("Backtracked {} times", undos);

            // Export the trace for the graph viewer
            if let Err(e) = solution.trace.save("puzzle_steps.txt") {
                eprintln!("could not save trace: {}", e);
            } else {
                println!("Trace written to puzzle_steps.txt");
            }
        }
        Err(e) => println!("No solution: {}", e),
    }
}
