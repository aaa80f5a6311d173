//! First-class invariants for rooms.
//!
//! Each invariant is a logical property of a committed room. The engine runs
//! [`check_room`] on every candidate room before handing it back.

use super::Room;

/// A property that holds for every committed state.
pub trait Invariant<S> {
    /// Whether `state` satisfies the property.
    fn holds(state: &S) -> bool;

    /// Text reported when the property fails.
    fn description() -> &'static str;
}

/// A failed invariant.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{description}")]
pub struct InvariantViolation {
    /// What failed.
    pub description: String,
}

impl InvariantViolation {
    /// Records a failure.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

pub mod history_consistent;
pub mod mark_balance;
pub mod turn_consistent;

pub use history_consistent::HistoryConsistentInvariant;
pub use mark_balance::MarkBalanceInvariant;
pub use turn_consistent::TurnConsistentInvariant;

type RoomCheck = (fn(&Room) -> bool, fn() -> &'static str);

const ROOM_CHECKS: [RoomCheck; 3] = [
    (
        <MarkBalanceInvariant as Invariant<Room>>::holds,
        <MarkBalanceInvariant as Invariant<Room>>::description,
    ),
    (
        <HistoryConsistentInvariant as Invariant<Room>>::holds,
        <HistoryConsistentInvariant as Invariant<Room>>::description,
    ),
    (
        <TurnConsistentInvariant as Invariant<Room>>::holds,
        <TurnConsistentInvariant as Invariant<Room>>::description,
    ),
];

/// Checks every room invariant, collecting each violation.
pub fn check_room(room: &Room) -> Result<(), Vec<InvariantViolation>> {
    let violations: Vec<_> = ROOM_CHECKS
        .iter()
        .filter(|(holds, _)| !holds(room))
        .map(|(_, description)| InvariantViolation::new(description()))
        .collect();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Mark, Participant, ParticipantId, Position, RoomId, Square, apply_move};

    fn room() -> Room {
        let alice = Participant::new(ParticipantId::new(1), "alice");
        let bob = Participant::new(ParticipantId::new(2), "bob");
        Room::open(RoomId::new("r"), alice).seat(bob).expect("seat")
    }

    #[test]
    fn test_new_room_passes() {
        assert!(check_room(&room()).is_ok());
    }

    #[test]
    fn test_room_passes_after_moves() {
        let room = room();
        let room = apply_move(&room, ParticipantId::new(1), 0, 0).expect("legal");
        let room = apply_move(&room, ParticipantId::new(2), 1, 1).expect("legal");
        assert!(check_room(&room).is_ok());
    }

    #[test]
    fn test_stray_mark_reports_every_broken_invariant() {
        // an O with no logged move breaks both balance and history
        let mut room = room();
        room.board_mut().set(Position::Center, Square::Occupied(Mark::O));
        let violations = check_room(&room).expect_err("tampered board");
        assert_eq!(violations.len(), 2);
        assert_eq!(
            violations[0].description,
            <MarkBalanceInvariant as Invariant<Room>>::description()
        );
    }
}
