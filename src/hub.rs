//! Per-room fan-out of committed state to live subscribers.
//!
//! The hub knows nothing about game rules: it maps a [`RoomId`] to a set of
//! sinks and hands each published message to every sink of that room. Sinks
//! must accept or refuse immediately ([`Deliver`] never blocks), so a slow or
//! vanished subscriber cannot hold up a commit or its peers. A refusing sink is
//! dropped from the room.

use derive_more::{Display, Error};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use strictly_tictactoe::RoomId;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Why a sink refused a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum DeliveryError {
    /// The receiving side is gone.
    #[display("subscriber closed")]
    Closed,
    /// The receiving side stopped draining its queue.
    #[display("subscriber queue full")]
    Full,
}

/// Non-blocking destination for published messages.
pub trait Deliver<M>: Send + Sync {
    /// Enqueues `message`, or reports why it cannot.
    fn deliver(&self, message: &M) -> Result<(), DeliveryError>;
}

impl<M> Deliver<M> for mpsc::Sender<M>
where
    M: Clone + Send,
{
    fn deliver(&self, message: &M) -> Result<(), DeliveryError> {
        self.try_send(message.clone()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DeliveryError::Full,
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }
}

/// Unique identifier of one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub struct SubscriberId(u64);

/// A live subscription: its room plus a way to reach the subscriber directly.
pub struct SubscriberHandle<M> {
    id: SubscriberId,
    room_id: RoomId,
    sink: Arc<dyn Deliver<M>>,
}

impl<M> SubscriberHandle<M> {
    /// Subscription identifier.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Room this subscription listens to.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Delivers `message` to this subscriber only.
    ///
    /// # Errors
    ///
    /// Propagates the sink's [`DeliveryError`].
    pub fn send(&self, message: &M) -> Result<(), DeliveryError> {
        self.sink.deliver(message)
    }
}

impl<M> Clone for SubscriberHandle<M> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            room_id: self.room_id.clone(),
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<M> fmt::Debug for SubscriberHandle<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberHandle")
            .field("id", &self.id)
            .field("room_id", &self.room_id)
            .finish_non_exhaustive()
    }
}

struct HubState<M> {
    rooms: HashMap<RoomId, Vec<SubscriberHandle<M>>>,
}

/// Registry of live subscribers keyed by room.
///
/// Cloning yields a handle to the same subscriber set.
pub struct SubscriptionHub<M> {
    state: Arc<Mutex<HubState<M>>>,
    next_id: Arc<AtomicU64>,
}

impl<M> Clone for SubscriptionHub<M> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

impl<M> Default for SubscriptionHub<M> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(HubState {
                rooms: HashMap::new(),
            })),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl<M> fmt::Debug for SubscriptionHub<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("SubscriptionHub")
            .field("rooms", &state.rooms.len())
            .finish_non_exhaustive()
    }
}

impl<M> SubscriptionHub<M> {
    /// Creates a hub with no subscribers.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating subscription hub");
        Self::default()
    }

    /// Registers `sink` for messages published to `room_id`.
    #[instrument(skip(self, sink), fields(room_id = %room_id))]
    pub fn subscribe<S>(&self, room_id: &RoomId, sink: S) -> SubscriberHandle<M>
    where
        S: Deliver<M> + 'static,
    {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let handle = SubscriberHandle {
            id,
            room_id: room_id.clone(),
            sink: Arc::new(sink),
        };
        let mut state = self.state.lock();
        let subscribers = state.rooms.entry(room_id.clone()).or_default();
        subscribers.push(handle.clone());
        info!(subscriber = %id, count = subscribers.len(), "Subscribed");
        handle
    }

    /// Removes a subscription. Removing one twice, or one already pruned, is a
    /// no-op.
    #[instrument(skip(self, handle), fields(room_id = %handle.room_id, subscriber = %handle.id))]
    pub fn unsubscribe(&self, handle: &SubscriberHandle<M>) {
        let mut state = self.state.lock();
        let Some(subscribers) = state.rooms.get_mut(&handle.room_id) else {
            return;
        };
        let before = subscribers.len();
        subscribers.retain(|s| s.id != handle.id);
        let removed = before != subscribers.len();
        if subscribers.is_empty() {
            state.rooms.remove(&handle.room_id);
        }
        if removed {
            info!("Unsubscribed");
        }
    }

    /// Delivers `message` to every current subscriber of `room_id`.
    ///
    /// Subscribers whose sink refuses are removed. Returns how many accepted.
    #[instrument(skip(self, message), fields(room_id = %room_id))]
    pub fn publish(&self, room_id: &RoomId, message: &M) -> usize {
        let targets: Vec<SubscriberHandle<M>> = self
            .state
            .lock()
            .rooms
            .get(room_id)
            .cloned()
            .unwrap_or_default();

        let mut delivered = 0;
        let mut dead = Vec::new();
        for target in &targets {
            match target.send(message) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!(subscriber = %target.id, error = %e, "Dropping subscriber");
                    dead.push(target.id);
                }
            }
        }

        if !dead.is_empty() {
            let mut state = self.state.lock();
            if let Some(subscribers) = state.rooms.get_mut(room_id) {
                subscribers.retain(|s| !dead.contains(&s.id));
                if subscribers.is_empty() {
                    state.rooms.remove(room_id);
                }
            }
        }

        debug!(delivered, dropped = dead.len(), "Published");
        delivered
    }

    /// Number of live subscriptions for `room_id`.
    pub fn subscriber_count(&self, room_id: &RoomId) -> usize {
        self.state
            .lock()
            .rooms
            .get(room_id)
            .map_or(0, Vec::len)
    }
}
