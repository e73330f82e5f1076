use crate::graph::GraphView;
use crate::render;
use crate::session::Session;
use crate::theme::Theme;
use autosudoku_core::{Board, OriginalMask, Position, SolveError, Solver};
use crossterm::event::{KeyCode, KeyEvent};
use crossterm::terminal;
use std::io;
use std::path::PathBuf;

/// Result of handling a key press
pub enum AppAction {
    Continue,
    /// Run the solver (needs terminal access, so the main loop drives it)
    Solve,
    Quit,
}

/// Current screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Entering or reviewing the puzzle grid
    Editing,
    /// Viewing the filled-cells-over-time graph
    Graph,
}

/// How a status message should be colored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

/// A transient status message
#[derive(Debug, Clone)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
}

/// The main application state
pub struct App {
    /// The grid being edited; holds the solution after a successful solve
    pub board: Board,
    /// Clue mask from the last solve; None while the grid is being edited
    pub given: Option<OriginalMask>,
    /// Currently selected cell
    pub cursor: Position,
    /// Color theme
    pub theme: Theme,
    /// Index into the theme cycle
    theme_index: usize,
    /// Current screen state
    pub screen_state: ScreenState,
    /// Loaded graph data, present while on the graph screen
    pub graph: Option<GraphView>,
    /// Message to display
    pub message: Option<Message>,
    /// Message timer
    message_timer: u32,
    /// File the solve trace is written to and read back from
    pub trace_file: PathBuf,
}

impl App {
    /// Create the app, optionally starting from a restored or supplied board
    pub fn new(start: Option<Board>, trace_file: PathBuf) -> Self {
        Self {
            board: start.unwrap_or_default(),
            given: None,
            cursor: Position::new(0, 0),
            theme: Theme::dark(),
            theme_index: 0,
            screen_state: ScreenState::Editing,
            graph: None,
            message: None,
            message_timer: 0,
            trace_file,
        }
    }

    /// Update timers (called on every poll timeout)
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }
    }

    /// Show a temporary message
    pub fn show_message(&mut self, kind: MessageKind, text: &str) {
        self.message = Some(Message {
            text: text.to_string(),
            kind,
        });
        self.message_timer = 40; // ~4 seconds at 100ms poll
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match self.screen_state {
            ScreenState::Graph => self.handle_graph_key(key),
            ScreenState::Editing => self.handle_editing_key(key),
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return AppAction::Quit,

            // Navigation
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, 0),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(0, 1),

            // Digit entry advances to the next cell
            KeyCode::Char(c @ '1'..='9') => {
                let value = c.to_digit(10).unwrap() as u8;
                self.board.set(self.cursor, Some(value));
                self.given = None;
                self.advance_cursor();
            }

            // Backspace clears, or steps back when already empty
            KeyCode::Backspace => {
                if self.board.get(self.cursor).is_none() {
                    self.retreat_cursor();
                } else {
                    self.board.set(self.cursor, None);
                    self.given = None;
                }
            }

            // Clear the cell in place
            KeyCode::Char('0') | KeyCode::Delete => {
                self.board.set(self.cursor, None);
                self.given = None;
            }

            // Solve
            KeyCode::Enter | KeyCode::Char('s') => return AppAction::Solve,

            // Show the solving process graph
            KeyCode::Char('g') => self.open_graph(),

            // Reset the grid
            KeyCode::Char('r') => {
                self.board = Board::empty();
                self.given = None;
                self.cursor = Position::new(0, 0);
                self.show_message(MessageKind::Info, "Grid cleared");
            }

            // Cycle theme
            KeyCode::Char('t') => {
                self.theme_index = (self.theme_index + 1) % 3;
                self.theme = match self.theme_index {
                    0 => Theme::dark(),
                    1 => Theme::light(),
                    _ => Theme::high_contrast(),
                };
            }

            _ => {}
        }
        AppAction::Continue
    }

    fn handle_graph_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => return AppAction::Quit,
            KeyCode::Esc | KeyCode::Char('g') | KeyCode::Enter => {
                self.screen_state = ScreenState::Editing;
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn open_graph(&mut self) {
        match GraphView::load(&self.trace_file) {
            Ok(view) if view.counts.is_empty() => {
                self.show_message(MessageKind::Info, "Trace file is empty, solve a puzzle first");
            }
            Ok(view) => {
                self.graph = Some(view);
                self.screen_state = ScreenState::Graph;
            }
            Err(e) => {
                self.show_message(MessageKind::Error, &format!("Cannot show process: {}", e));
            }
        }
    }

    /// Run the solver on the current grid, drawing a progress bar below it.
    /// On success the solution is shown and the step trace written out.
    pub fn run_solve(&mut self, stdout: &mut io::Stdout) -> io::Result<()> {
        let (term_width, term_height) = terminal::size()?;
        let (grid_x, grid_y) = render::grid_origin(term_width, term_height);
        let mut bar = render::SolveProgressBar::new(
            stdout,
            grid_x,
            grid_y + render::GRID_HEIGHT + 1,
            render::GRID_WIDTH,
            self.theme.success,
            self.theme.info,
        );

        let board = self.board.clone();
        match Solver::new().solve_with_progress(&board, &mut bar) {
            Ok(solution) => {
                let steps = solution.trace.len();
                self.board = solution.board;
                self.given = Some(solution.mask);
                match solution.trace.save(&self.trace_file) {
                    Ok(()) => self.show_message(
                        MessageKind::Success,
                        &format!("Solved in {} steps, press g for the graph", steps),
                    ),
                    Err(e) => self.show_message(
                        MessageKind::Error,
                        &format!("Solved, but trace not saved: {}", e),
                    ),
                }
            }
            Err(SolveError::InvalidPuzzle) => {
                self.show_message(MessageKind::Error, "This puzzle contains conflicts");
            }
            Err(SolveError::Unsolvable) => {
                self.show_message(MessageKind::Error, "This puzzle is unsolvable");
            }
        }
        Ok(())
    }

    /// The clue cells only: what the user typed, without solver output
    pub fn clue_board(&self) -> Board {
        match &self.given {
            None => self.board.clone(),
            Some(mask) => {
                let mut clues = Board::empty();
                for row in 0..9 {
                    for col in 0..9 {
                        let pos = Position::new(row, col);
                        if mask.is_given(pos) {
                            clues.set(pos, self.board.get(pos));
                        }
                    }
                }
                clues
            }
        }
    }

    /// Persist the entered clues for the next run
    pub fn save_session(&self) {
        Session::from_board(&self.clue_board()).save();
    }

    fn move_cursor(&mut self, dr: isize, dc: isize) {
        let row = (self.cursor.row as isize + dr).clamp(0, 8) as usize;
        let col = (self.cursor.col as isize + dc).clamp(0, 8) as usize;
        self.cursor = Position::new(row, col);
    }

    fn advance_cursor(&mut self) {
        if self.cursor.col < 8 {
            self.cursor.col += 1;
        } else if self.cursor.row < 8 {
            self.cursor.row += 1;
            self.cursor.col = 0;
        }
    }

    fn retreat_cursor(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
        } else if self.cursor.row > 0 {
            self.cursor.row -= 1;
            self.cursor.col = 8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn app() -> App {
        App::new(None, PathBuf::from("puzzle_steps.txt"))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_cursor_navigation() {
        let mut app = app();
        assert_eq!(app.cursor, Position::new(0, 0));

        press(&mut app, KeyCode::Down);
        assert_eq!(app.cursor, Position::new(1, 0));
        press(&mut app, KeyCode::Right);
        assert_eq!(app.cursor, Position::new(1, 1));
        press(&mut app, KeyCode::Up);
        assert_eq!(app.cursor, Position::new(0, 1));
        press(&mut app, KeyCode::Left);
        assert_eq!(app.cursor, Position::new(0, 0));

        // Clamped at the edges
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.cursor, Position::new(0, 0));
    }

    #[test]
    fn test_digit_entry_advances() {
        let mut app = app();
        press(&mut app, KeyCode::Char('5'));
        assert_eq!(app.board.get(Position::new(0, 0)), Some(5));
        assert_eq!(app.cursor, Position::new(0, 1));
    }

    #[test]
    fn test_digit_entry_wraps_to_next_row() {
        let mut app = app();
        app.cursor = Position::new(0, 8);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.board.get(Position::new(0, 8)), Some(3));
        assert_eq!(app.cursor, Position::new(1, 0));
    }

    #[test]
    fn test_backspace_clears_then_steps_back() {
        let mut app = app();
        press(&mut app, KeyCode::Char('7'));
        assert_eq!(app.cursor, Position::new(0, 1));

        // Empty cell: backspace moves to the previous cell
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.cursor, Position::new(0, 0));
        assert_eq!(app.board.get(Position::new(0, 0)), Some(7));

        // Filled cell: backspace clears in place
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.cursor, Position::new(0, 0));
        assert_eq!(app.board.get(Position::new(0, 0)), None);
    }

    #[test]
    fn test_backspace_steps_back_across_rows() {
        let mut app = app();
        app.cursor = Position::new(1, 0);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.cursor, Position::new(0, 8));
    }

    #[test]
    fn test_reset_clears_grid() {
        let mut app = app();
        press(&mut app, KeyCode::Char('9'));
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.board, Board::empty());
        assert_eq!(app.cursor, Position::new(0, 0));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert!(matches!(
            app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)),
            AppAction::Quit
        ));
        assert!(matches!(
            app.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
            AppAction::Quit
        ));
    }

    #[test]
    fn test_solve_requested_from_keys() {
        let mut app = app();
        assert!(matches!(
            app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE)),
            AppAction::Solve
        ));
        assert!(matches!(
            app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
            AppAction::Solve
        ));
    }

    #[test]
    fn test_editing_invalidates_solved_coloring() {
        let mut app = app();
        app.board.set(Position::new(0, 0), Some(1));
        app.given = Some(OriginalMask::of(&app.board));

        press(&mut app, KeyCode::Char('2'));
        assert!(app.given.is_none());
    }

    #[test]
    fn test_clue_board_strips_solver_cells() {
        let mut clues = Board::empty();
        clues.set(Position::new(0, 0), Some(4));
        let mask = OriginalMask::of(&clues);

        let mut app = app();
        app.board = clues.clone();
        app.board.set(Position::new(5, 5), Some(8)); // solver-filled
        app.given = Some(mask);

        assert_eq!(app.clue_board(), clues);
    }
}
