//! Board positions addressed by row and column.

use serde::{Deserialize, Serialize};

/// A position on the tic-tac-toe board.
///
/// Rows and columns are zero-based; row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
pub enum Position {
    /// Row 0, column 0
    TopLeft,
    /// Row 0, column 1
    TopCenter,
    /// Row 0, column 2
    TopRight,
    /// Row 1, column 0
    MiddleLeft,
    /// Row 1, column 1
    Center,
    /// Row 1, column 2
    MiddleRight,
    /// Row 2, column 0
    BottomLeft,
    /// Row 2, column 1
    BottomCenter,
    /// Row 2, column 2
    BottomRight,
}

impl Position {
    /// All 9 positions in row-major order.
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// Creates a position from coordinates, or `None` when either is outside `0..=2`.
    ///
    /// Coordinates are signed because they arrive straight from clients.
    pub fn from_coords(row: i64, col: i64) -> Option<Self> {
        if !(0..3).contains(&row) || !(0..3).contains(&col) {
            return None;
        }
        Self::from_index((row * 3 + col) as usize)
    }

    /// Creates position from a row-major board index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Converts position to a row-major board index (0-8).
    pub fn to_index(self) -> usize {
        self as usize
    }

    /// Zero-based row.
    pub fn row(self) -> usize {
        self.to_index() / 3
    }

    /// Zero-based column.
    pub fn col(self) -> usize {
        self.to_index() % 3
    }

    /// Get label for this position (for display).
    pub fn label(&self) -> &'static str {
        match self {
            Position::TopLeft => "Top-left",
            Position::TopCenter => "Top-center",
            Position::TopRight => "Top-right",
            Position::MiddleLeft => "Middle-left",
            Position::Center => "Center",
            Position::MiddleRight => "Middle-right",
            Position::BottomLeft => "Bottom-left",
            Position::BottomCenter => "Bottom-center",
            Position::BottomRight => "Bottom-right",
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, {})", self.label(), self.row(), self.col())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0, Position::TopLeft)]
    #[case(0, 2, Position::TopRight)]
    #[case(1, 1, Position::Center)]
    #[case(2, 1, Position::BottomCenter)]
    #[case(2, 2, Position::BottomRight)]
    fn test_from_coords(#[case] row: i64, #[case] col: i64, #[case] expected: Position) {
        let pos = Position::from_coords(row, col).expect("in bounds");
        assert_eq!(pos, expected);
        assert_eq!(pos.row() as i64, row);
        assert_eq!(pos.col() as i64, col);
    }

    #[rstest]
    #[case(-1, 0)]
    #[case(0, -1)]
    #[case(3, 0)]
    #[case(0, 3)]
    #[case(i64::MAX, i64::MIN)]
    fn test_from_coords_out_of_bounds(#[case] row: i64, #[case] col: i64) {
        assert_eq!(Position::from_coords(row, col), None);
    }

    #[test]
    fn test_index_roundtrip_covers_board() {
        for (index, pos) in Position::ALL.iter().enumerate() {
            assert_eq!(pos.to_index(), index);
            assert_eq!(Position::from_index(index), Some(*pos));
        }
        assert_eq!(Position::from_index(9), None);
    }
}
