//! Mark balance invariant: X leads O by zero or one.

use super::super::{Mark, Room};
use super::Invariant;

/// Invariant: `count(X) - count(O)` is 0 or 1.
///
/// X always moves first and marks alternate, so O never leads and X is
/// never more than one ahead.
pub struct MarkBalanceInvariant;

impl Invariant<Room> for MarkBalanceInvariant {
    fn holds(room: &Room) -> bool {
        let x = room.board().count(Mark::X);
        let o = room.board().count(Mark::O);
        x >= o && x - o <= 1
    }

    fn description() -> &'static str {
        "X count equals O count or exceeds it by one"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Participant, ParticipantId, Position, RoomId, Square};

    fn room() -> Room {
        Room::open(RoomId::new("r"), Participant::new(ParticipantId::new(1), "alice"))
    }

    #[test]
    fn test_empty_board_holds() {
        assert!(MarkBalanceInvariant::holds(&room()));
    }

    #[test]
    fn test_o_leading_violates() {
        let mut room = room();
        room.board_mut().set(Position::Center, Square::Occupied(Mark::O));
        assert!(!MarkBalanceInvariant::holds(&room));
    }

    #[test]
    fn test_x_two_ahead_violates() {
        let mut room = room();
        room.board_mut().set(Position::Center, Square::Occupied(Mark::X));
        room.board_mut().set(Position::TopLeft, Square::Occupied(Mark::X));
        assert!(!MarkBalanceInvariant::holds(&room));
    }
}
