//! Room value type: participants, board, turn pointer and move log.

use super::{Board, Position};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Stable identifier of a participant, issued by the user directory.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct ParticipantId(u64);

impl ParticipantId {
    /// Wraps a raw identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A seated player: stable id plus unique display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct Participant {
    /// Stable identifier.
    id: ParticipantId,
    /// Unique display name.
    name: String,
}

impl Participant {
    /// Creates a participant reference.
    pub fn new(id: ParticipantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Opaque, globally unique room identifier.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Wraps an identifier string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One applied move in the room's log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct MoveRecord {
    /// Who moved.
    participant: ParticipantId,
    /// Zero-based row.
    row: usize,
    /// Zero-based column.
    col: usize,
}

impl MoveRecord {
    /// Records a move by `participant` at `pos`.
    pub fn new(participant: ParticipantId, pos: Position) -> Self {
        Self {
            participant,
            row: pos.row(),
            col: pos.col(),
        }
    }

    /// The board position this move occupied.
    pub fn position(&self) -> Option<Position> {
        Position::from_coords(self.row as i64, self.col as i64)
    }
}

/// Lifecycle stage of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RoomStatus {
    /// One participant waiting for an opponent.
    Open,
    /// Two participants seated, game running.
    Active,
    /// Game ended in a win or a draw.
    Finished,
}

/// Reasons a participant cannot take a seat.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SeatError {
    /// The room already has two participants.
    #[display("Game already has two players")]
    RoomFull,
    /// The participant is already seated.
    #[display("Player already in game")]
    AlreadyJoined,
    /// The game has ended.
    #[display("Game already finished")]
    RoomFinished,
}

impl std::error::Error for SeatError {}

/// One game room from creation to completion.
///
/// Values are immutable from the outside; transitions go through
/// [`Room::seat`] and [`crate::apply_move`], both of which return a new room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Room {
    id: RoomId,
    participants: Vec<Participant>,
    board: Board,
    #[getter(skip)]
    pub(crate) next_turn: Option<ParticipantId>,
    #[getter(skip)]
    pub(crate) finished: bool,
    #[getter(skip)]
    pub(crate) winner: Option<ParticipantId>,
    moves: Vec<MoveRecord>,
    created_at: DateTime<Utc>,
    #[getter(skip)]
    pub(crate) version: u64,
}

impl Room {
    /// Opens a room with a single participant who moves first.
    pub fn open(id: RoomId, owner: Participant) -> Self {
        Self::open_at(id, owner, Utc::now())
    }

    /// Opens a room with an explicit creation time.
    pub fn open_at(id: RoomId, owner: Participant, created_at: DateTime<Utc>) -> Self {
        let next_turn = Some(*owner.id());
        Self {
            id,
            participants: vec![owner],
            board: Board::new(),
            next_turn,
            finished: false,
            winner: None,
            moves: Vec::new(),
            created_at,
            version: 0,
        }
    }

    /// Participant whose turn is next; `None` once finished.
    pub fn next_turn(&self) -> Option<ParticipantId> {
        self.next_turn
    }

    /// Whether the game has ended.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Winner, absent on draw or while in progress.
    pub fn winner(&self) -> Option<ParticipantId> {
        self.winner
    }

    /// Number of commits applied since creation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Current lifecycle stage.
    pub fn status(&self) -> RoomStatus {
        if self.finished {
            RoomStatus::Finished
        } else if self.participants.len() < 2 {
            RoomStatus::Open
        } else {
            RoomStatus::Active
        }
    }

    /// Looks up a seated participant by id.
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Whether `id` is seated in this room.
    pub fn is_participant(&self, id: ParticipantId) -> bool {
        self.participant(id).is_some()
    }

    /// The seated participant other than `id`, if any.
    pub fn opponent_of(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id != id)
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub(crate) fn moves_mut(&mut self) -> &mut Vec<MoveRecord> {
        &mut self.moves
    }

    /// Seats a second participant, returning the updated room.
    ///
    /// # Errors
    ///
    /// Checked in order: [`SeatError::RoomFull`], [`SeatError::AlreadyJoined`],
    /// [`SeatError::RoomFinished`].
    pub fn seat(&self, participant: Participant) -> Result<Room, SeatError> {
        if self.participants.len() >= 2 {
            return Err(SeatError::RoomFull);
        }
        if self.is_participant(participant.id) {
            return Err(SeatError::AlreadyJoined);
        }
        if self.finished {
            return Err(SeatError::RoomFinished);
        }
        let mut next = self.clone();
        next.participants.push(participant);
        next.version += 1;
        Ok(next)
    }

    /// Snapshot of the board and turn pointers.
    pub fn state(&self) -> RoomState {
        RoomState {
            room_id: self.id.clone(),
            board: self.board.clone(),
            next_turn: self.next_turn.and_then(|id| self.participant(id).cloned()),
            winner: self.winner.and_then(|id| self.participant(id).cloned()),
            finished: self.finished,
            version: self.version,
        }
    }

    /// Result of a finished game, or `None` while it is still running.
    pub fn outcome(&self) -> Option<GameOutcome> {
        if !self.finished {
            return None;
        }
        Some(GameOutcome {
            winner: self.winner.and_then(|id| self.participant(id).cloned()),
            participants: self.participants.clone(),
            is_draw: self.winner.is_none(),
        })
    }

    /// Compact summary for history listings.
    pub fn summary(&self) -> GameSummary {
        GameSummary {
            room_id: self.id.clone(),
            players: self.participants.iter().map(|p| p.name.clone()).collect(),
            winner: self
                .winner
                .and_then(|id| self.participant(id))
                .map(|p| p.name.clone()),
            finished: self.finished,
        }
    }
}

/// Board snapshot published after every commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct RoomState {
    /// Room the snapshot belongs to.
    room_id: RoomId,
    /// Board after the commit.
    board: Board,
    /// Next mover, `None` once finished.
    next_turn: Option<Participant>,
    /// Winner, `None` on draw or while in progress.
    winner: Option<Participant>,
    /// Whether the game has ended.
    finished: bool,
    /// Commit number the snapshot reflects.
    version: u64,
}

/// Emitted once per room when it becomes finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GameOutcome {
    /// Winner, `None` on a draw.
    winner: Option<Participant>,
    /// Everyone seated when the game ended.
    participants: Vec<Participant>,
    /// Whether the game was drawn.
    is_draw: bool,
}

/// High-level summary of a room for history listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GameSummary {
    /// Room identifier.
    room_id: RoomId,
    /// Display names in seating order.
    players: Vec<String>,
    /// Winner's display name, if any.
    winner: Option<String>,
    /// Whether the game has ended.
    finished: bool,
}
