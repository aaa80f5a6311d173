//! Session façade: the operations transports call.

use crate::{
    Deliver, LeaderboardEntry, LiveMessage, Registration, RoomError, RoomRegistry, Scoreboard,
    SubscriberHandle, SubscriptionHub, UserDirectory, UserError,
};
use derive_new::new;
use strictly_tictactoe::{GameSummary, Participant, Room, RoomId, RoomState};
use tracing::{debug, info, instrument};

/// Handle onto the room runtime.
///
/// Holds the registry, hub, scoreboard and user directory it was built with.
/// Cloning shares them.
#[derive(Debug, Clone, Default, new)]
pub struct GameService {
    registry: RoomRegistry,
    hub: SubscriptionHub<LiveMessage>,
    scoreboard: Scoreboard,
    users: UserDirectory,
}

impl GameService {
    /// Registers a new user.
    pub fn register(&self, username: &str) -> Result<Registration, UserError> {
        self.users.register(username)
    }

    /// Resolves a bearer token to its participant.
    pub fn authenticate(&self, token: &str) -> Option<Participant> {
        self.users.authenticate(token)
    }

    /// Opens a room owned by `identity`.
    pub fn create_room(&self, identity: &Participant) -> Room {
        self.registry.create(identity.clone())
    }

    /// Seats `identity` in an existing room and notifies its subscribers.
    #[instrument(skip(self, identity), fields(room_id = %room_id, participant = %identity.name()))]
    pub fn join_room(&self, room_id: &RoomId, identity: &Participant) -> Result<Room, RoomError> {
        self.registry.join_then(room_id, identity.clone(), |committed| {
            self.broadcast(committed);
        })
    }

    /// Applies a move and notifies the room's subscribers.
    ///
    /// The broadcast and, on the finishing move, the scoreboard update happen
    /// before the room accepts its next command.
    #[instrument(skip(self, identity), fields(room_id = %room_id, participant = %identity.name()))]
    pub fn make_move(
        &self,
        room_id: &RoomId,
        identity: &Participant,
        row: i64,
        col: i64,
    ) -> Result<RoomState, RoomError> {
        let room = self
            .registry
            .apply_move_then(room_id, *identity.id(), row, col, |committed| {
                self.broadcast(committed);
                if let Some(outcome) = committed.outcome() {
                    self.scoreboard.record(&outcome);
                    info!(draw = *outcome.is_draw(), "Game finished");
                }
            })?;
        Ok(room.state())
    }

    fn broadcast(&self, committed: &Room) {
        let delivered = self
            .hub
            .publish(committed.id(), &LiveMessage::state(committed.state()));
        debug!(delivered, version = committed.version(), "State broadcast");
    }

    /// Every room in creation order.
    pub fn list_rooms(&self) -> Vec<Room> {
        self.registry.list()
    }

    /// One room.
    pub fn get_room(&self, room_id: &RoomId) -> Result<Room, RoomError> {
        self.registry.get(room_id)
    }

    /// Published snapshot of one room.
    pub fn room_state(&self, room_id: &RoomId) -> Result<RoomState, RoomError> {
        self.registry.get(room_id).map(|room| room.state())
    }

    /// Summaries of finished rooms, oldest first.
    pub fn history(&self) -> Vec<GameSummary> {
        self.registry
            .list()
            .iter()
            .filter(|room| room.is_finished())
            .map(Room::summary)
            .collect()
    }

    /// Scoreboard, best first.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.scoreboard.leaderboard()
    }

    /// Scoreboard record of one registered user.
    ///
    /// # Errors
    ///
    /// [`UserError::UnknownUser`] if nobody registered `username`.
    pub fn player_record(&self, username: &str) -> Result<LeaderboardEntry, UserError> {
        let participant = self.users.by_name(username)?;
        Ok(self.scoreboard.entry(&participant))
    }

    /// Subscribes `sink` to a room's committed states.
    ///
    /// # Errors
    ///
    /// [`RoomError::NotFound`] if the room does not exist.
    pub fn subscribe<S>(
        &self,
        room_id: &RoomId,
        sink: S,
    ) -> Result<SubscriberHandle<LiveMessage>, RoomError>
    where
        S: Deliver<LiveMessage> + 'static,
    {
        self.registry.get(room_id)?;
        Ok(self.hub.subscribe(room_id, sink))
    }

    /// Ends a subscription. Idempotent.
    pub fn unsubscribe(&self, handle: &SubscriberHandle<LiveMessage>) {
        self.hub.unsubscribe(handle);
    }

    /// Live subscriber count for a room.
    pub fn subscriber_count(&self, room_id: &RoomId) -> usize {
        self.hub.subscriber_count(room_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use tokio::sync::mpsc;

    fn two_players(service: &GameService) -> (Participant, Participant, RoomId) {
        let alice = service.register("alice").expect("alice").participant().clone();
        let bob = service.register("bob").expect("bob").participant().clone();
        let room = service.create_room(&alice);
        service.join_room(room.id(), &bob).expect("join");
        (alice, bob, room.id().clone())
    }

    #[test]
    fn test_move_broadcasts_state() {
        let service = GameService::default();
        let (alice, _bob, room_id) = two_players(&service);
        let (tx, mut rx) = mpsc::channel::<LiveMessage>(8);
        service.subscribe(&room_id, tx).expect("subscribe");

        let state = service.make_move(&room_id, &alice, 1, 1).expect("move");
        assert_eq!(rx.try_recv().expect("broadcast"), LiveMessage::state(state));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_join_broadcasts_state() {
        let service = GameService::default();
        let alice = service.register("alice").expect("alice").participant().clone();
        let bob = service.register("bob").expect("bob").participant().clone();
        let room = service.create_room(&alice);
        let (tx, mut rx) = mpsc::channel::<LiveMessage>(8);
        service.subscribe(room.id(), tx).expect("subscribe");

        let joined = service.join_room(room.id(), &bob).expect("join");
        assert_eq!(rx.try_recv().expect("broadcast"), LiveMessage::state(joined.state()));
        assert_eq!(joined.version(), 1);

        // a refused seat is not a commit
        let carol = service.register("carol").expect("carol").participant().clone();
        assert!(service.join_room(room.id(), &carol).is_err());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_player_record() {
        let service = GameService::default();
        let (alice, bob, room_id) = two_players(&service);
        assert_eq!(*service.player_record("bob").expect("bob").games_played(), 0);
        for (who, r, c) in [(&alice, 0, 0), (&bob, 1, 0), (&alice, 0, 1), (&bob, 1, 1), (&alice, 0, 2)] {
            service.make_move(&room_id, who, r, c).expect("legal");
        }

        let record = service.player_record("bob").expect("bob");
        assert_eq!((*record.losses(), *record.games_played()), (1, 1));
        assert_eq!(
            service.player_record("nobody"),
            Err(UserError::UnknownUser("nobody".to_string()))
        );
    }

    #[test]
    fn test_rejected_move_broadcasts_nothing() {
        let service = GameService::default();
        let (_alice, bob, room_id) = two_players(&service);
        let (tx, mut rx) = mpsc::channel::<LiveMessage>(8);
        service.subscribe(&room_id, tx).expect("subscribe");

        let err = service.make_move(&room_id, &bob, 0, 0).expect_err("out of turn");
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_subscribe_unknown_room() {
        let service = GameService::default();
        let (tx, _rx) = mpsc::channel::<LiveMessage>(1);
        let err = service.subscribe(&RoomId::new("missing"), tx).expect_err("missing");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_finished_game_lands_in_history_and_scoreboard() {
        let service = GameService::default();
        let (alice, bob, room_id) = two_players(&service);
        service.create_room(&alice);
        for (who, r, c) in [(&alice, 0, 0), (&bob, 1, 0), (&alice, 0, 1), (&bob, 1, 1), (&alice, 0, 2)] {
            service.make_move(&room_id, who, r, c).expect("legal");
        }

        let history = service.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].winner().as_deref(), Some("alice"));

        let board = service.leaderboard();
        assert_eq!(board[0].username(), "alice");
        assert_eq!(*board[0].wins(), 1);
        assert_eq!(*board[1].losses(), 1);
    }
}
