mod app;
mod graph;
mod render;
mod session;
mod theme;

use app::{App, AppAction};
use autosudoku_core::Board;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use session::Session;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

/// Enter a Sudoku puzzle, auto-complete it, and replay the solve as a
/// filled-cells-over-time graph
#[derive(Parser)]
#[command(name = "autosudoku", version, about)]
struct Cli {
    /// File the solving steps are written to
    #[arg(long, default_value = "puzzle_steps.txt")]
    trace_file: PathBuf,

    /// Start from this puzzle instead of the saved session
    /// (81 characters, digits with '0' or '.' for empty)
    #[arg(long)]
    puzzle: Option<String>,

    /// Print the graph for an existing trace file and exit
    #[arg(long)]
    graph: bool,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if cli.graph {
        return graph::print_graph(&cli.trace_file);
    }

    let start = match cli.puzzle {
        Some(ref puzzle) => match Board::from_string(puzzle) {
            Some(board) => Some(board),
            None => {
                eprintln!("invalid --puzzle: expected 81 digits with '0' or '.' for empty");
                std::process::exit(1);
            }
        },
        None => Session::load().board(),
    };
    let app = App::new(start, cli.trace_file);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Run the app
    let result = run_app(&mut stdout, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app(stdout: &mut io::Stdout, mut app: App) -> io::Result<()> {
    loop {
        render::render(stdout, &app)?;
        stdout.flush()?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Handle Ctrl+C
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    break;
                }

                match app.handle_key(key) {
                    AppAction::Continue => {}
                    AppAction::Solve => app.run_solve(stdout)?,
                    AppAction::Quit => break,
                }
            }
        } else {
            app.tick();
        }
    }

    app.save_session();
    Ok(())
}
