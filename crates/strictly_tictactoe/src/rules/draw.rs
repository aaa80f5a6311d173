//! Board fullness, the precondition for a draw.

use super::super::{Board, Square};

/// Whether every square holds a mark.
///
/// Only meaningful after the win check: a full board with a line is a win.
pub fn is_full(board: &Board) -> bool {
    board.squares().all(|s| s != Square::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Participant, ParticipantId, Room, RoomId, apply_move};

    const ALICE: ParticipantId = ParticipantId::new(1);
    const BOB: ParticipantId = ParticipantId::new(2);

    fn play(cells: &[(i64, i64)]) -> Room {
        let mut room = Room::open(RoomId::new("draw"), Participant::new(ALICE, "alice"))
            .seat(Participant::new(BOB, "bob"))
            .expect("seat");
        for (turn, &(row, col)) in cells.iter().enumerate() {
            let who = if turn % 2 == 0 { ALICE } else { BOB };
            room = apply_move(&room, who, row, col).expect("legal");
        }
        room
    }

    #[test]
    fn test_fresh_room_board_has_space() {
        assert!(!is_full(play(&[]).board()));
    }

    #[test]
    fn test_eight_moves_leave_one_square() {
        let room = play(&[(0, 0), (0, 1), (0, 2), (1, 1), (1, 0), (1, 2), (2, 1), (2, 0)]);
        assert!(!is_full(room.board()));
        assert!(!room.is_finished());
    }

    #[test]
    fn test_ninth_move_without_line_fills_board_and_draws() {
        // X O X / X O O / O X X
        let room = play(&[
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 1),
            (1, 0),
            (1, 2),
            (2, 1),
            (2, 0),
            (2, 2),
        ]);
        assert!(is_full(room.board()));
        assert!(room.is_finished());
        assert_eq!(room.winner(), None);
    }

    #[test]
    fn test_ninth_move_completing_line_is_full_but_won() {
        // X O X / O X O / O X X, the last X closes the main diagonal
        let room = play(&[
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 0),
            (1, 1),
            (1, 2),
            (2, 1),
            (2, 0),
            (2, 2),
        ]);
        assert!(is_full(room.board()));
        assert_eq!(room.winner(), Some(ALICE));
    }
}
