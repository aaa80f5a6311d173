//! Turn consistency invariant: turn pointer, finished flag and winner agree.

use super::super::Room;
use super::Invariant;

/// Invariant: a finished room has no next mover; a running room's next mover
/// is seated; a winner is seated and only exists once finished; one or two
/// participants are seated.
pub struct TurnConsistentInvariant;

impl Invariant<Room> for TurnConsistentInvariant {
    fn holds(room: &Room) -> bool {
        let seats_ok = (1..=2).contains(&room.participants().len());
        let turn_ok = match (room.is_finished(), room.next_turn()) {
            (true, None) => true,
            (false, Some(next)) => room.is_participant(next),
            _ => false,
        };
        let winner_ok = match room.winner() {
            Some(winner) => room.is_finished() && room.is_participant(winner),
            None => true,
        };
        seats_ok && turn_ok && winner_ok
    }

    fn description() -> &'static str {
        "Next turn is cleared exactly when finished and winner is a seated participant"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Participant, ParticipantId, RoomId};

    fn room() -> Room {
        Room::open(RoomId::new("r"), Participant::new(ParticipantId::new(1), "alice"))
    }

    #[test]
    fn test_open_room_holds() {
        assert!(TurnConsistentInvariant::holds(&room()));
    }

    #[test]
    fn test_finished_with_next_turn_violates() {
        let mut room = room();
        room.finished = true;
        assert!(!TurnConsistentInvariant::holds(&room));
    }

    #[test]
    fn test_unseated_winner_violates() {
        let mut room = room();
        room.finished = true;
        room.next_turn = None;
        room.winner = Some(ParticipantId::new(7));
        assert!(!TurnConsistentInvariant::holds(&room));
    }
}
