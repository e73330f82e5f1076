use crate::board::{Board, Position};
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Result type for trace export and import
pub type TraceResult<T> = Result<T, TraceError>;

/// Errors raised while reading or writing a step trace
#[derive(Debug)]
pub enum TraceError {
    /// Underlying file or stream error
    Io(io::Error),
    /// The text form could not be parsed; `line` is 1-based
    Malformed { line: usize, reason: String },
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "trace i/o error: {}", e),
            Self::Malformed { line, reason } => {
                write!(f, "malformed trace at line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Malformed { .. } => None,
        }
    }
}

impl From<io::Error> for TraceError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Chronological board snapshots recorded during a solve. One snapshot is
/// pushed after every assignment and after every undo, so the sequence
/// captures backtracking, not just forward progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepTrace {
    snapshots: Vec<Board>,
}

impl StepTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot of the board's current state
    pub fn record(&mut self, board: &Board) {
        self.snapshots.push(board.clone());
    }

    pub fn snapshots(&self) -> &[Board] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Non-empty cell count per snapshot, the series the graph viewer plots
    pub fn filled_counts(&self) -> Vec<usize> {
        self.snapshots.iter().map(Board::filled_count).collect()
    }

    /// Write the text form: each snapshot is 9 lines of 9 space-separated
    /// tokens ('1'-'9' or '.' for empty) followed by one blank line.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for board in &self.snapshots {
            for row in 0..9 {
                let mut line = String::with_capacity(18);
                for col in 0..9 {
                    if col > 0 {
                        line.push(' ');
                    }
                    match board.get(Position::new(row, col)) {
                        Some(value) => {
                            line.push(char::from_digit(value as u32, 10).unwrap())
                        }
                        None => line.push('.'),
                    }
                }
                writeln!(writer, "{}", line)?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Parse the text form back into the same sequence of snapshots
    pub fn read_from<R: BufRead>(reader: R) -> TraceResult<Self> {
        let mut snapshots = Vec::new();
        let mut rows: Vec<[Option<u8>; 9]> = Vec::new();
        let mut row_start_line = 1;

        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line?;
            let line = line.trim();

            if line.is_empty() {
                if !rows.is_empty() {
                    snapshots.push(assemble(&rows, row_start_line)?);
                    rows.clear();
                }
                continue;
            }

            if rows.is_empty() {
                row_start_line = line_no;
            }
            rows.push(parse_row(line, line_no)?);
            if rows.len() > 9 {
                return Err(TraceError::Malformed {
                    line: line_no,
                    reason: "snapshot has more than 9 rows".to_string(),
                });
            }
        }

        if !rows.is_empty() {
            snapshots.push(assemble(&rows, row_start_line)?);
        }

        Ok(Self { snapshots })
    }

    /// Write the text form to a file, replacing any previous content
    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()
    }

    /// Read the text form from a file
    pub fn load<P: AsRef<Path>>(path: P) -> TraceResult<Self> {
        Self::read_from(BufReader::new(File::open(path)?))
    }
}

fn parse_row(line: &str, line_no: usize) -> TraceResult<[Option<u8>; 9]> {
    let mut row = [None; 9];
    let mut tokens = line.split_whitespace();
    for cell in row.iter_mut() {
        let token = tokens.next().ok_or_else(|| TraceError::Malformed {
            line: line_no,
            reason: "expected 9 tokens per row".to_string(),
        })?;
        *cell = match token {
            "." => None,
            "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9" => {
                Some(token.parse::<u8>().unwrap())
            }
            other => {
                return Err(TraceError::Malformed {
                    line: line_no,
                    reason: format!("unexpected token '{}'", other),
                })
            }
        };
    }
    if tokens.next().is_some() {
        return Err(TraceError::Malformed {
            line: line_no,
            reason: "expected 9 tokens per row".to_string(),
        });
    }
    Ok(row)
}

fn assemble(rows: &[[Option<u8>; 9]], start_line: usize) -> TraceResult<Board> {
    if rows.len() != 9 {
        return Err(TraceError::Malformed {
            line: start_line,
            reason: format!("snapshot has {} rows, expected 9", rows.len()),
        });
    }
    let mut board = Board::empty();
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            board.set(Position::new(r, c), *cell);
        }
    }
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Solver;

    const PUZZLE: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";

    fn sample_trace() -> StepTrace {
        let board = Board::from_string(PUZZLE).unwrap();
        Solver::new().solve(&board).unwrap().trace
    }

    #[test]
    fn test_round_trip_preserves_snapshots() {
        let trace = sample_trace();
        let mut buf = Vec::new();
        trace.write_to(&mut buf).unwrap();

        let back = StepTrace::read_from(buf.as_slice()).unwrap();
        assert_eq!(back, trace);
    }

    #[test]
    fn test_text_form_shape() {
        let mut trace = StepTrace::new();
        let mut board = Board::empty();
        board.set(Position::new(0, 0), Some(7));
        trace.record(&board);

        let mut buf = Vec::new();
        trace.write_to(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("7 . . . . . . . ."));
        for _ in 0..8 {
            assert_eq!(lines.next(), Some(". . . . . . . . ."));
        }
        assert_eq!(lines.next(), Some(""));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_missing_trailing_blank_line_still_parses() {
        let trace = sample_trace();
        let mut buf = Vec::new();
        trace.write_to(&mut buf).unwrap();
        while buf.last() == Some(&b'\n') {
            buf.pop();
        }

        let back = StepTrace::read_from(buf.as_slice()).unwrap();
        assert_eq!(back, trace);
    }

    #[test]
    fn test_rejects_bad_token() {
        let mut text = String::new();
        for _ in 0..8 {
            text.push_str(". . . . . . . . .\n");
        }
        text.push_str(". . . . x . . . .\n\n");

        match StepTrace::read_from(text.as_bytes()) {
            Err(TraceError::Malformed { line, .. }) => assert_eq!(line, 9),
            other => panic!("expected malformed error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_short_row() {
        let text = "1 2 3\n";
        assert!(matches!(
            StepTrace::read_from(text.as_bytes()),
            Err(TraceError::Malformed { line: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_truncated_snapshot() {
        let mut text = String::new();
        for _ in 0..5 {
            text.push_str(". . . . . . . . .\n");
        }

        assert!(matches!(
            StepTrace::read_from(text.as_bytes()),
            Err(TraceError::Malformed { .. })
        ));
    }

    #[test]
    fn test_filled_counts() {
        let mut trace = StepTrace::new();
        let mut board = Board::empty();
        trace.record(&board);
        board.set(Position::new(0, 0), Some(1));
        trace.record(&board);
        board.set(Position::new(0, 1), Some(2));
        trace.record(&board);
        board.set(Position::new(0, 1), None);
        trace.record(&board);

        assert_eq!(trace.filled_counts(), vec![0, 1, 2, 1]);
    }
}
