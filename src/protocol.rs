//! Messages exchanged with live room subscribers.

use serde::{Deserialize, Serialize};
use strictly_tictactoe::RoomState;

/// Command sent by a live client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LiveCommand {
    /// Place a mark at (`row`, `col`) as `participant`.
    Move {
        /// Row, expected in `0..=2`.
        row: i64,
        /// Column, expected in `0..=2`.
        col: i64,
        /// Display name of the mover; must match the connection's identity.
        participant: String,
    },
}

/// Message pushed to a live client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveMessage {
    /// Committed room state, broadcast to every subscriber of the room.
    State {
        /// Snapshot after the commit.
        state: RoomState,
    },
    /// Rejection, delivered only to the connection that caused it.
    Error {
        /// Human-readable reason.
        message: String,
    },
}

impl LiveMessage {
    /// Wraps a committed state.
    pub fn state(state: RoomState) -> Self {
        Self::State { state }
    }

    /// Builds an error reply.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}
