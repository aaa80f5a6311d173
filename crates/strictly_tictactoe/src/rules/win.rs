//! Win detection logic for tic-tac-toe.

use super::super::{Board, Mark, Position, Square};

/// The eight lines that win the game.
pub const LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [Position::MiddleLeft, Position::Center, Position::MiddleRight],
    [Position::BottomLeft, Position::BottomCenter, Position::BottomRight],
    // Columns
    [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
    [Position::TopCenter, Position::Center, Position::BottomCenter],
    [Position::TopRight, Position::MiddleRight, Position::BottomRight],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Checks if there is a winner on the board.
///
/// Returns `Some(mark)` for the first line holding three equal marks,
/// `None` otherwise.
pub fn check_winner(board: &Board) -> Option<Mark> {
    LINES.iter().find_map(|[a, b, c]| {
        let sq = board.get(*a);
        match sq {
            Square::Occupied(mark) if sq == board.get(*b) && sq == board.get(*c) => Some(mark),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new();
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_winner_top_row() {
        let mut board = Board::new();
        board.set(Position::TopLeft, Square::Occupied(Mark::X));
        board.set(Position::TopCenter, Square::Occupied(Mark::X));
        board.set(Position::TopRight, Square::Occupied(Mark::X));
        assert_eq!(check_winner(&board), Some(Mark::X));
    }

    #[test]
    fn test_winner_diagonal() {
        let mut board = Board::new();
        board.set(Position::TopLeft, Square::Occupied(Mark::O));
        board.set(Position::Center, Square::Occupied(Mark::O));
        board.set(Position::BottomRight, Square::Occupied(Mark::O));
        assert_eq!(check_winner(&board), Some(Mark::O));
    }

    #[test]
    fn test_no_winner_mixed_line() {
        let mut board = Board::new();
        board.set(Position::TopLeft, Square::Occupied(Mark::X));
        board.set(Position::TopCenter, Square::Occupied(Mark::O));
        board.set(Position::TopRight, Square::Occupied(Mark::X));
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_no_winner_incomplete() {
        let mut board = Board::new();
        board.set(Position::TopLeft, Square::Occupied(Mark::X));
        board.set(Position::TopCenter, Square::Occupied(Mark::X));
        assert_eq!(check_winner(&board), None);
    }
}
