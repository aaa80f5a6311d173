//! History consistency invariant: the move log matches the board.

use super::super::{Room, Square};
use super::Invariant;

/// Invariant: every logged move points at an occupied square, and the log
/// length equals the number of occupied squares.
pub struct HistoryConsistentInvariant;

impl Invariant<Room> for HistoryConsistentInvariant {
    fn holds(room: &Room) -> bool {
        let every_move_landed = room.moves().iter().all(|m| {
            m.position()
                .is_some_and(|pos| room.board().get(pos) != Square::Empty)
        });
        every_move_landed && room.moves().len() == room.board().occupied()
    }

    fn description() -> &'static str {
        "Move log length matches number of occupied squares"
    }
}
