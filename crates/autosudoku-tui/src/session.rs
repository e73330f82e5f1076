use autosudoku_core::Board;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// The clues the user had entered when the app last quit, restored on the
/// next start. Solver output is never saved here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    /// Compact 81-character board form, empty string when no session exists
    pub puzzle: String,
}

impl Session {
    /// Where the session file lives
    fn save_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("autosudoku_session.json")
    }

    /// Load the saved session, or an empty one if missing or unreadable
    pub fn load() -> Self {
        match fs::read_to_string(Self::save_path()) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Best-effort save; a failure only costs the next restore
    pub fn save(&self) {
        if let Ok(json) = serde_json::to_string_pretty(self) {
            let _ = fs::write(Self::save_path(), json);
        }
    }

    pub fn from_board(board: &Board) -> Self {
        Self {
            puzzle: board.to_string_compact(),
        }
    }

    /// The saved board, if the session holds a parseable one
    pub fn board(&self) -> Option<Board> {
        Board::from_string(&self.puzzle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autosudoku_core::Position;

    #[test]
    fn test_session_board_round_trip() {
        let mut board = Board::empty();
        board.set(Position::new(0, 0), Some(5));
        board.set(Position::new(8, 8), Some(9));

        let session = Session::from_board(&board);
        assert_eq!(session.board(), Some(board));
    }

    #[test]
    fn test_empty_session_has_no_board() {
        assert_eq!(Session::default().board(), None);
    }
}
