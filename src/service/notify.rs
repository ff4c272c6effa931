//! Change notifications: a registry of broadcast channels keyed by tournament id.

use crate::models::TournamentId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

/// Sent to subscribers after every successful mutation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TournamentChanged {
    pub id: TournamentId,
}

type Channels = HashMap<TournamentId, broadcast::Sender<TournamentChanged>>;

/// Subscriber channels per tournament. A channel is created by the first subscription for
/// an id and removed when the last subscription for it is dropped.
#[derive(Clone, Debug)]
pub struct SubscriberRegistry {
    channels: Arc<Mutex<Channels>>,
    capacity: usize,
}

impl SubscriberRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Arc::new(Mutex::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    fn channels(&self) -> MutexGuard<'_, Channels> {
        self.channels.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn subscribe(&self, id: &str) -> Subscription {
        let receiver = self
            .channels()
            .entry(id.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe();
        Subscription {
            id: id.to_string(),
            receiver,
            registry: self.clone(),
        }
    }

    /// Fire-and-forget; returns how many subscribers were reached.
    pub fn notify(&self, id: &str) -> usize {
        match self.channels().get(id) {
            Some(tx) => tx
                .send(TournamentChanged { id: id.to_string() })
                .unwrap_or(0),
            None => 0,
        }
    }

    pub fn has_subscribers(&self, id: &str) -> bool {
        self.channels().contains_key(id)
    }

    /// Number of tournament ids with at least one live subscription.
    pub fn tracked(&self) -> usize {
        self.channels().len()
    }

    fn release(&self, id: &str) {
        let mut channels = self.channels();
        // The departing receiver is still counted.
        if channels.get(id).map_or(false, |tx| tx.receiver_count() <= 1) {
            channels.remove(id);
            log::debug!("no subscribers left for tournament {}", id);
        }
    }
}

/// A live subscription to one tournament's changes.
#[derive(Debug)]
pub struct Subscription {
    id: TournamentId,
    receiver: broadcast::Receiver<TournamentChanged>,
    registry: SubscriberRegistry,
}

impl Subscription {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Wait for the next change. Missed notices collapse into the next one.
    pub async fn changed(&mut self) -> Option<TournamentChanged> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next change if one is already queued.
    pub fn try_changed(&mut self) -> Option<TournamentChanged> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.release(&self.id);
    }
}
