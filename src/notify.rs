use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;
use ulid::Ulid;

use crate::hooks::PostCommitHook;
use crate::model::Event;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Broadcast hub keyed by user. Teachers hear about their own intervals,
/// students about their reservations and about intervals deleted under them.
pub struct NotifyHub {
    channels: DashMap<Ulid, broadcast::Sender<Event>>,
    channel_capacity: usize,
}

impl Default for NotifyHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyHub {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(channel_capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            channel_capacity: channel_capacity.max(1),
        }
    }

    /// Subscribe to notifications for a user. Creates the channel if needed.
    pub fn subscribe(&self, user_id: Ulid) -> broadcast::Receiver<Event> {
        let sender = self
            .channels
            .entry(user_id)
            .or_insert_with(|| broadcast::channel(self.channel_capacity).0);
        sender.subscribe()
    }

    /// Send a notification. No-op if nobody is listening; a channel whose
    /// receivers are all gone is dropped.
    pub fn send(&self, user_id: Ulid, event: &Event) {
        let abandoned = match self.channels.get(&user_id) {
            Some(sender) => sender.send(event.clone()).is_err(),
            None => return,
        };
        if abandoned {
            self.channels
                .remove_if(&user_id, |_, sender| sender.receiver_count() == 0);
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Users an event should reach.
    fn recipients(event: &Event) -> Vec<Ulid> {
        match event {
            Event::IntervalCreated { teacher_id, .. } | Event::IntervalUpdated { teacher_id, .. } => {
                vec![*teacher_id]
            }
            Event::IntervalDeleted { teacher_id, released, .. } => {
                let mut to = Vec::with_capacity(released.len() + 1);
                to.push(*teacher_id);
                to.extend(released.iter().copied());
                to
            }
            Event::ReservationAdded { teacher_id, student_id, .. }
            | Event::ReservationRemoved { teacher_id, student_id, .. } => {
                vec![*teacher_id, *student_id]
            }
        }
    }
}

#[async_trait]
impl PostCommitHook for NotifyHub {
    async fn on_commit(&self, event: &Event) {
        for user in Self::recipients(event) {
            self.send(user, event);
        }
    }
}
