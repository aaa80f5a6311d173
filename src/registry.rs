//! Room registry: the single source of truth for room state.
//!
//! The registry map is only write-locked to insert a new room. Each room sits
//! behind its own mutex, which is the critical section for joins and moves:
//! unrelated rooms never contend, and two movers racing on the same room are
//! serialized so exactly one of them sees the turn.

use crate::RoomError;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use strictly_tictactoe::{Participant, ParticipantId, Room, RoomId, apply_move};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

type RoomSlot = Arc<Mutex<Room>>;

#[derive(Debug, Default)]
struct Rooms {
    /// Insertion order for listings.
    order: Vec<RoomId>,
    by_id: HashMap<RoomId, RoomSlot>,
}

/// Concurrency-safe registry of game rooms.
///
/// Cloning is cheap and yields a handle to the same rooms.
#[derive(Debug, Clone, Default)]
pub struct RoomRegistry {
    rooms: Arc<RwLock<Rooms>>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating room registry");
        Self::default()
    }

    /// Opens a room owned by `owner`, who moves first.
    #[instrument(skip(self), fields(owner = %owner.name()))]
    pub fn create(&self, owner: Participant) -> Room {
        let mut rooms = self.rooms.write();
        let id = loop {
            let candidate = RoomId::new(Uuid::new_v4().simple().to_string());
            if !rooms.by_id.contains_key(&candidate) {
                break candidate;
            }
        };
        let room = Room::open(id.clone(), owner);
        rooms.order.push(id.clone());
        rooms.by_id.insert(id.clone(), Arc::new(Mutex::new(room.clone())));
        info!(room_id = %id, total = rooms.order.len(), "Room created");
        room
    }

    fn slot(&self, room_id: &RoomId) -> Result<RoomSlot, RoomError> {
        self.rooms
            .read()
            .by_id
            .get(room_id)
            .cloned()
            .ok_or_else(|| {
                debug!(room_id = %room_id, "Room not found");
                RoomError::not_found(room_id)
            })
    }

    /// Seats `participant` as the second player.
    ///
    /// # Errors
    ///
    /// [`RoomError::NotFound`], or a [`RoomError::Seat`] rejection; the stored
    /// room is unchanged on error.
    pub fn join(&self, room_id: &RoomId, participant: Participant) -> Result<Room, RoomError> {
        self.join_then(room_id, participant, |_| {})
    }

    /// Like [`RoomRegistry::join`], running `on_commit` with the committed room
    /// before the critical section is released.
    #[instrument(skip(self, on_commit), fields(room_id = %room_id, participant = %participant.name()))]
    pub fn join_then<F>(
        &self,
        room_id: &RoomId,
        participant: Participant,
        on_commit: F,
    ) -> Result<Room, RoomError>
    where
        F: FnOnce(&Room),
    {
        let slot = self.slot(room_id)?;
        let mut room = slot.lock();
        let next = room.seat(participant).map_err(|e| {
            warn!(error = %e, "Join rejected");
            RoomError::from(e)
        })?;
        *room = next;
        info!(version = room.version(), "Participant joined");
        on_commit(&room);
        Ok(room.clone())
    }

    /// Applies a move under the room's critical section and commits it.
    ///
    /// # Errors
    ///
    /// [`RoomError::NotFound`], or a [`RoomError::Move`] rejection; the stored
    /// room is unchanged on error.
    pub fn apply_move(
        &self,
        room_id: &RoomId,
        participant: ParticipantId,
        row: i64,
        col: i64,
    ) -> Result<Room, RoomError> {
        self.apply_move_then(room_id, participant, row, col, |_| {})
    }

    /// Like [`RoomRegistry::apply_move`], running `on_commit` with the committed
    /// room before the critical section is released.
    ///
    /// Hooks run in commit order for a given room. They must not block and must
    /// not call back into the registry.
    #[instrument(skip(self, on_commit), fields(room_id = %room_id, participant = %participant))]
    pub fn apply_move_then<F>(
        &self,
        room_id: &RoomId,
        participant: ParticipantId,
        row: i64,
        col: i64,
        on_commit: F,
    ) -> Result<Room, RoomError>
    where
        F: FnOnce(&Room),
    {
        let slot = self.slot(room_id)?;
        let mut room = slot.lock();
        let next = apply_move(&room, participant, row, col).map_err(|e| {
            warn!(row, col, error = %e, "Move rejected");
            RoomError::from(e)
        })?;
        *room = next;
        info!(
            row,
            col,
            version = room.version(),
            finished = room.is_finished(),
            "Move committed"
        );
        on_commit(&room);
        Ok(room.clone())
    }

    /// Returns the committed state of a room.
    ///
    /// # Errors
    ///
    /// [`RoomError::NotFound`] if no such room exists.
    #[instrument(skip(self), fields(room_id = %room_id))]
    pub fn get(&self, room_id: &RoomId) -> Result<Room, RoomError> {
        let slot = self.slot(room_id)?;
        let room = slot.lock().clone();
        Ok(room)
    }

    /// Lists every room in creation order.
    #[instrument(skip(self))]
    pub fn list(&self) -> Vec<Room> {
        let rooms = self.rooms.read();
        let listed: Vec<Room> = rooms
            .order
            .iter()
            .filter_map(|id| rooms.by_id.get(id))
            .map(|slot| slot.lock().clone())
            .collect();
        debug!(count = listed.len(), "Listed rooms");
        listed
    }

    /// Number of rooms ever created.
    pub fn len(&self) -> usize {
        self.rooms.read().order.len()
    }

    /// Whether no room has been created yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
