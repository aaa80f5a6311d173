//! Pure tic-tac-toe rules.
//!
//! This crate holds everything about a game room that does not need shared
//! state: the board, move validation and application, win/draw evaluation, and
//! the invariants every committed room satisfies.
//!
//! # Example
//!
//! ```
//! use strictly_tictactoe::{Participant, ParticipantId, Room, RoomId, apply_move};
//!
//! let alice = Participant::new(ParticipantId::new(1), "alice");
//! let bob = Participant::new(ParticipantId::new(2), "bob");
//! let room = Room::open(RoomId::new("demo"), alice).seat(bob)?;
//!
//! let room = apply_move(&room, ParticipantId::new(1), 1, 1)?;
//! assert_eq!(room.next_turn(), Some(ParticipantId::new(2)));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

mod engine;
pub mod invariants;
mod position;
mod room;
pub mod rules;
mod types;

pub use engine::{MoveError, apply_move};
pub use position::Position;
pub use room::{
    GameOutcome, GameSummary, MoveRecord, Participant, ParticipantId, Room, RoomId, RoomState,
    RoomStatus, SeatError,
};
pub use rules::evaluate;
pub use types::{Board, Mark, Outcome, Square};
