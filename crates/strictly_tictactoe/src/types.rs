//! Core domain types for tic-tac-toe.

use super::Position;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Mark placed on the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum Mark {
    /// Mark X (always moves first).
    X,
    /// Mark O (moves second).
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Mark placed by the move with the given zero-based sequence number.
    pub fn for_move(sequence: usize) -> Self {
        if sequence % 2 == 0 { Mark::X } else { Mark::O }
    }
}

/// A square on the tic-tac-toe board.
///
/// Serialized as `""`, `"X"` or `"O"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Square {
    /// Empty square.
    #[default]
    Empty,
    /// Square occupied by a mark.
    Occupied(Mark),
}

impl Square {
    /// Returns the wire symbol of the square.
    pub fn symbol(self) -> &'static str {
        match self {
            Square::Empty => "",
            Square::Occupied(Mark::X) => "X",
            Square::Occupied(Mark::O) => "O",
        }
    }

    /// Swaps X and O, leaving empty squares alone.
    pub fn relabeled(self) -> Self {
        match self {
            Square::Empty => Square::Empty,
            Square::Occupied(mark) => Square::Occupied(mark.opponent()),
        }
    }
}

impl Serialize for Square {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for Square {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let symbol = String::deserialize(deserializer)?;
        match symbol.as_str() {
            "" => Ok(Square::Empty),
            "X" => Ok(Square::Occupied(Mark::X)),
            "O" => Ok(Square::Occupied(Mark::O)),
            other => Err(serde::de::Error::custom(format!(
                "invalid square '{}', expected \"\", \"X\" or \"O\"",
                other
            ))),
        }
    }
}

/// 3x3 tic-tac-toe board, serialized as three rows of three symbols.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    rows: [[Square; 3]; 3],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.rows[pos.row()][pos.col()]
    }

    /// Sets the square at the given position.
    pub fn set(&mut self, pos: Position, square: Square) {
        self.rows[pos.row()][pos.col()] = square;
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns the rows of the board.
    pub fn rows(&self) -> &[[Square; 3]; 3] {
        &self.rows
    }

    /// Iterates over all squares in row-major order.
    pub fn squares(&self) -> impl Iterator<Item = Square> + '_ {
        self.rows.iter().flat_map(|row| row.iter().copied())
    }

    /// Number of squares holding the given mark.
    pub fn count(&self, mark: Mark) -> usize {
        self.squares()
            .filter(|s| *s == Square::Occupied(mark))
            .count()
    }

    /// Number of occupied squares.
    pub fn occupied(&self) -> usize {
        self.squares().filter(|s| *s != Square::Empty).count()
    }

    /// Returns a copy of the board with X and O swapped.
    pub fn relabeled(&self) -> Self {
        let mut rows = self.rows;
        for square in rows.iter_mut().flat_map(|row| row.iter_mut()) {
            *square = square.relabeled();
        }
        Self { rows }
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for pos in Position::ALL {
            let symbol = match self.get(pos) {
                Square::Empty => ".",
                other => other.symbol(),
            };
            result.push_str(symbol);
            if pos.col() < 2 {
                result.push('|');
            } else if pos.row() < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Game is ongoing.
    InProgress,
    /// A mark completed a line.
    Won(Mark),
    /// Board is full with no line.
    Draw,
}

impl Outcome {
    /// Whether the outcome ends the game.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    /// Swaps the winning mark, leaving draw and in-progress alone.
    pub fn relabeled(self) -> Self {
        match self {
            Outcome::Won(mark) => Outcome::Won(mark.opponent()),
            other => other,
        }
    }
}
