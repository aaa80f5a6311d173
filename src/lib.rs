//! Strictly Rooms - authoritative tic-tac-toe room server
//!
//! Clients create rooms, join them, submit moves and watch committed state
//! live. The server is the only writer of room state.
//!
//! # Architecture
//!
//! - **Rules**: pure move validation and outcome evaluation ([`strictly_tictactoe`])
//! - **Registry**: every room behind its own lock ([`RoomRegistry`])
//! - **Hub**: per-room fan-out to live subscribers ([`SubscriptionHub`])
//! - **Service**: the façade transports call ([`GameService`])
//! - **API**: axum routes and the WebSocket live channel ([`api`])
//!
//! # Example
//!
//! ```
//! use strictly_rooms::GameService;
//!
//! let service = GameService::default();
//! let alice = service.register("alice")?.participant().clone();
//! let bob = service.register("bob")?.participant().clone();
//!
//! let room = service.create_room(&alice);
//! service.join_room(room.id(), &bob)?;
//! let state = service.make_move(room.id(), &alice, 1, 1)?;
//! assert_eq!(state.next_turn().as_ref(), Some(&bob));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod error;
mod hub;
mod protocol;
mod registry;
mod scoreboard;
mod service;
mod users;

pub mod api;

// Crate-level exports - Configuration
pub use config::{ConfigError, HOST_ENV, PORT_ENV, ServerConfig};

// Crate-level exports - Errors
pub use error::{ErrorKind, RoomError};

// Crate-level exports - Rooms and fan-out
pub use hub::{Deliver, DeliveryError, SubscriberHandle, SubscriberId, SubscriptionHub};
pub use protocol::{LiveCommand, LiveMessage};
pub use registry::RoomRegistry;

// Crate-level exports - Façade
pub use scoreboard::{LeaderboardEntry, Scoreboard};
pub use service::GameService;
pub use users::{MAX_USERNAME_LEN, MIN_USERNAME_LEN, Registration, UserDirectory, UserError};
