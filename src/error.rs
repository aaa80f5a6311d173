//! Error types for room operations.

use derive_more::Display;
use strictly_tictactoe::{MoveError, RoomId, SeatError};

/// Transport-independent category of a rejected command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Room or entity absent.
    NotFound,
    /// Room full, already joined, cell occupied, out of turn.
    Conflict,
    /// Coordinates out of range.
    InvalidInput,
    /// Command aimed at a finished game.
    AlreadyTerminal,
    /// Caller is not seated in the room.
    Forbidden,
}

/// Rejection reported by the room registry.
///
/// Every variant is detected before the stored room changes, so a rejected
/// command leaves the room exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum RoomError {
    /// No room with this id.
    #[display("Room {room_id} not found")]
    NotFound {
        /// Requested room.
        room_id: RoomId,
    },
    /// The rule engine rejected the move.
    #[display("{_0}")]
    Move(MoveError),
    /// The room refused the participant.
    #[display("{_0}")]
    Seat(SeatError),
}

impl RoomError {
    /// Creates a not-found error for `room_id`.
    pub fn not_found(room_id: &RoomId) -> Self {
        Self::NotFound {
            room_id: room_id.clone(),
        }
    }

    /// Category used by transports to pick a response.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Move(MoveError::GameFinished) => ErrorKind::AlreadyTerminal,
            Self::Move(MoveError::NotParticipant(_)) => ErrorKind::Forbidden,
            Self::Move(MoveError::OutOfBounds { .. }) => ErrorKind::InvalidInput,
            Self::Move(
                MoveError::OutOfTurn(_)
                | MoveError::CellOccupied(_)
                | MoveError::InvariantViolation(_),
            ) => ErrorKind::Conflict,
            Self::Seat(SeatError::RoomFull | SeatError::AlreadyJoined) => ErrorKind::Conflict,
            Self::Seat(SeatError::RoomFinished) => ErrorKind::AlreadyTerminal,
        }
    }
}

impl std::error::Error for RoomError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound { .. } => None,
            Self::Move(err) => Some(err),
            Self::Seat(err) => Some(err),
        }
    }
}

impl From<MoveError> for RoomError {
    fn from(err: MoveError) -> Self {
        Self::Move(err)
    }
}

impl From<SeatError> for RoomError {
    fn from(err: SeatError) -> Self {
        Self::Seat(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use strictly_tictactoe::{ParticipantId, Position};

    #[rstest]
    #[case(RoomError::not_found(&RoomId::new("x")), ErrorKind::NotFound)]
    #[case(RoomError::Move(MoveError::GameFinished), ErrorKind::AlreadyTerminal)]
    #[case(RoomError::Move(MoveError::OutOfTurn(ParticipantId::new(1))), ErrorKind::Conflict)]
    #[case(RoomError::Move(MoveError::CellOccupied(Position::Center)), ErrorKind::Conflict)]
    #[case(RoomError::Move(MoveError::OutOfBounds { row: 3, col: 0 }), ErrorKind::InvalidInput)]
    #[case(RoomError::Move(MoveError::NotParticipant(ParticipantId::new(9))), ErrorKind::Forbidden)]
    #[case(RoomError::Seat(SeatError::RoomFull), ErrorKind::Conflict)]
    #[case(RoomError::Seat(SeatError::AlreadyJoined), ErrorKind::Conflict)]
    #[case(RoomError::Seat(SeatError::RoomFinished), ErrorKind::AlreadyTerminal)]
    fn test_kind_taxonomy(#[case] err: RoomError, #[case] kind: ErrorKind) {
        assert_eq!(err.kind(), kind);
    }

    #[test]
    fn test_display_passes_through_rule_message() {
        let err = RoomError::from(MoveError::GameFinished);
        assert_eq!(err.to_string(), "Game already finished");
        assert_eq!(
            RoomError::not_found(&RoomId::new("abc")).to_string(),
            "Room abc not found"
        );
    }
}
