use crate::board::{Board, Position};

impl Board {
    /// Whether `value` can be placed at `pos` without clashing with its
    /// row, column, or 3x3 box. The cell at `pos` must be empty: the scan
    /// covers the whole row/column/box and does not exempt the cell itself.
    pub fn is_valid_placement(&self, pos: Position, value: u8) -> bool {
        for col in 0..9 {
            if self.get(Position::new(pos.row, col)) == Some(value) {
                return false;
            }
        }
        for row in 0..9 {
            if self.get(Position::new(row, pos.col)) == Some(value) {
                return false;
            }
        }
        let origin = pos.box_origin();
        for row in origin.row..origin.row + 3 {
            for col in origin.col..origin.col + 3 {
                if self.get(Position::new(row, col)) == Some(value) {
                    return false;
                }
            }
        }
        true
    }

    /// Whether every clue is consistent with its peers. Each filled cell is
    /// probed against the rest of the grid with itself cleared, so a clue
    /// never conflicts with its own value. Returns false on the first
    /// conflict found. The board itself is never modified.
    pub fn check_initial_validity(&self) -> bool {
        let mut probe = self.clone();
        for row in 0..9 {
            for col in 0..9 {
                let pos = Position::new(row, col);
                if let Some(value) = probe.get(pos) {
                    probe.set(pos, None);
                    let ok = probe.is_valid_placement(pos, value);
                    probe.set(pos, Some(value));
                    if !ok {
                        return false;
                    }
                }
            }
        }
        true
    }
}
