//! Move application: the turn-based state machine over a [`Room`].

use super::invariants::check_room;
use super::rules::evaluate;
use super::{Mark, MoveRecord, Outcome, ParticipantId, Position, Room, Square};
use tracing::{debug, instrument, warn};

/// Error that can occur when applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The game is already over.
    #[display("Game already finished")]
    GameFinished,

    /// The caller is not seated in the room.
    #[display("Participant {_0} is not a player in this room")]
    NotParticipant(ParticipantId),

    /// It's not this participant's turn.
    #[display("Not your turn")]
    OutOfTurn(ParticipantId),

    /// Row or column outside `0..=2`.
    #[display("Invalid board position ({row}, {col})")]
    OutOfBounds {
        /// Requested row.
        row: i64,
        /// Requested column.
        col: i64,
    },

    /// The square at the position is already occupied.
    #[display("Cell already occupied: {_0}")]
    CellOccupied(Position),

    /// A room invariant failed after the move was computed.
    #[display("Invariant violation: {_0}")]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}

/// Applies a move by `participant` at (`row`, `col`) and returns the new room.
///
/// Pure: the input room is never modified, and the same input always yields
/// the same output. Preconditions are checked in order: finished game, seat,
/// turn, bounds, occupancy.
///
/// The placed mark follows move parity (X on even moves, O on odd), which is
/// the first participant's mark for X in regular two-player play. When only one
/// participant is seated the turn stays with them.
#[instrument(skip(room), fields(room_id = %room.id(), version = room.version()))]
pub fn apply_move(
    room: &Room,
    participant: ParticipantId,
    row: i64,
    col: i64,
) -> Result<Room, MoveError> {
    if room.is_finished() {
        return Err(MoveError::GameFinished);
    }
    if !room.is_participant(participant) {
        return Err(MoveError::NotParticipant(participant));
    }
    if room.next_turn() != Some(participant) {
        return Err(MoveError::OutOfTurn(participant));
    }
    let pos = Position::from_coords(row, col).ok_or(MoveError::OutOfBounds { row, col })?;
    if !room.board().is_empty(pos) {
        return Err(MoveError::CellOccupied(pos));
    }

    let mut next = room.clone();
    let mark = Mark::for_move(next.moves().len());
    next.board_mut().set(pos, Square::Occupied(mark));
    next.moves_mut().push(MoveRecord::new(participant, pos));
    next.version += 1;

    match evaluate(next.board()) {
        Outcome::InProgress => {
            let following = next
                .opponent_of(participant)
                .map(|p| *p.id())
                .unwrap_or(participant);
            next.next_turn = Some(following);
        }
        Outcome::Won(_) => {
            next.finished = true;
            next.winner = Some(participant);
            next.next_turn = None;
        }
        Outcome::Draw => {
            next.finished = true;
            next.winner = None;
            next.next_turn = None;
        }
    }

    if let Err(violations) = check_room(&next) {
        let description = violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        warn!(%description, "Move rejected by room invariants");
        return Err(MoveError::InvariantViolation(description));
    }

    debug!(%pos, ?mark, finished = next.is_finished(), "Move applied");
    Ok(next)
}
