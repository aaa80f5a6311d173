//! HTTP and WebSocket transport over [`GameService`].

mod auth;
mod error;
mod live;
mod routes;

pub use auth::Identity;
pub use error::ApiError;
pub use live::handle_command;
pub use routes::{JoinRequest, MoveRequest, RegisterRequest};

use crate::GameService;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    service: Arc<GameService>,
    subscriber_buffer: usize,
}

impl AppState {
    /// Wraps `service`; live connections get queues of `subscriber_buffer`.
    pub fn new(service: GameService, subscriber_buffer: usize) -> Self {
        Self {
            service: Arc::new(service),
            subscriber_buffer: subscriber_buffer.max(1),
        }
    }

    /// The façade handlers call into.
    pub fn service(&self) -> &GameService {
        &self.service
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::health))
        .route("/auth/register", post(routes::register))
        .route("/game/create", post(routes::create_game))
        .route("/game/join", post(routes::join_game))
        .route("/game/move", post(routes::make_move))
        .route("/game/list", get(routes::list_games))
        .route("/game/history", get(routes::history))
        .route("/game/state/{room_id}", get(routes::game_state))
        .route("/game/{room_id}", get(routes::get_game))
        .route("/scoreboard", get(routes::scoreboard))
        .route("/scoreboard/{username}", get(routes::player_record))
        .route("/ws/game/{room_id}", get(live::upgrade))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
