//! REST handlers.

use super::{ApiError, AppState, Identity};
use crate::{LeaderboardEntry, Registration};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use strictly_tictactoe::{GameSummary, Room, RoomId, RoomState};
use tracing::{Span, instrument};

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Desired display name.
    pub username: String,
}

/// Body of `POST /game/join`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequest {
    /// Room to join.
    pub room_id: RoomId,
}

/// Body of `POST /game/move`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Target room.
    pub room_id: RoomId,
    /// Row, expected in `0..=2`.
    pub row: i64,
    /// Column, expected in `0..=2`.
    pub col: i64,
}

pub(super) async fn health() -> Json<Value> {
    Json(json!({ "message": "Healthy" }))
}

#[instrument(skip_all, fields(username))]
pub(super) async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Registration>), ApiError> {
    let Json(request) = body?;
    Span::current().record("username", request.username.as_str());
    let registration = state.service().register(&request.username)?;
    Ok((StatusCode::CREATED, Json(registration)))
}

#[instrument(skip_all, fields(participant = %identity.name()))]
pub(super) async fn create_game(
    State(state): State<AppState>,
    Identity(identity): Identity,
) -> (StatusCode, Json<Room>) {
    (StatusCode::CREATED, Json(state.service().create_room(&identity)))
}

#[instrument(skip_all, fields(participant = %identity.name(), room_id))]
pub(super) async fn join_game(
    State(state): State<AppState>,
    Identity(identity): Identity,
    body: Result<Json<JoinRequest>, JsonRejection>,
) -> Result<Json<Room>, ApiError> {
    let Json(request) = body?;
    Span::current().record("room_id", request.room_id.as_str());
    let room = state.service().join_room(&request.room_id, &identity)?;
    Ok(Json(room))
}

#[instrument(skip_all, fields(participant = %identity.name(), room_id, row, col))]
pub(super) async fn make_move(
    State(state): State<AppState>,
    Identity(identity): Identity,
    body: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<RoomState>, ApiError> {
    let Json(request) = body?;
    let span = Span::current();
    span.record("room_id", request.room_id.as_str());
    span.record("row", request.row);
    span.record("col", request.col);
    let snapshot =
        state
            .service()
            .make_move(&request.room_id, &identity, request.row, request.col)?;
    Ok(Json(snapshot))
}

pub(super) async fn list_games(State(state): State<AppState>) -> Json<Vec<Room>> {
    Json(state.service().list_rooms())
}

pub(super) async fn history(State(state): State<AppState>) -> Json<Vec<GameSummary>> {
    Json(state.service().history())
}

pub(super) async fn game_state(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomState>, ApiError> {
    let snapshot = state.service().room_state(&RoomId::new(room_id))?;
    Ok(Json(snapshot))
}

pub(super) async fn get_game(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<Room>, ApiError> {
    let room = state.service().get_room(&RoomId::new(room_id))?;
    Ok(Json(room))
}

pub(super) async fn scoreboard(State(state): State<AppState>) -> Json<Vec<LeaderboardEntry>> {
    Json(state.service().leaderboard())
}

pub(super) async fn player_record(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<LeaderboardEntry>, ApiError> {
    let entry = state.service().player_record(&username)?;
    Ok(Json(entry))
}
