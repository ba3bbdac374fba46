//! Change notifications for listeners that want to follow the product
//! collection live.
//!
//! Managers publish after a mutation has landed. Publishing is fire-and-forget:
//! it never blocks, never fails, and a listener that went away never undoes
//! anything.

use crate::record::Product;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::mpsc;

/// Something that happened to the product collection.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum Event {
    /// A product was created. Carries the stored record.
    ProductAdded(Product),
    /// A product was removed.
    ProductDeleted {
        /// Id of the removed product.
        id: u64,
    },
}

/// Receives events from a manager.
pub trait Publisher: Send + Sync {
    /// Deliver `event`. Must not block on slow listeners.
    fn publish(&self, event: &Event);
}

/// Fans every event out to all current subscribers.
#[derive(Default)]
pub struct Broadcaster {
    listeners: Mutex<Vec<mpsc::Sender<Event>>>,
}

impl Broadcaster {
    /// A broadcaster with nobody listening yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start listening. Events published from now on show up on the receiver,
    /// in publish order. Drop the receiver to unsubscribe.
    pub fn subscribe(&self) -> mpsc::Receiver<Event> {
        let (tx, rx) = mpsc::channel();
        self.listeners.lock().push(tx);
        rx
    }

    /// Number of subscribers that were still connected at the last publish.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }
}

impl Publisher for Broadcaster {
    fn publish(&self, event: &Event) {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|tx| tx.send(event.clone()).is_ok());
        let gone = before - listeners.len();
        if gone > 0 {
            log::warn!("dropped {gone} disconnected listener(s)");
        }
    }
}

impl std::fmt::Debug for Broadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcaster")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
