//! Topic-based event bus implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{OfferEvent, PlaybackEvent, ScoreEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Topic {
    /// View changes, module lifecycle, overlay
    Playback,
    /// Point credits and debits
    Score,
    /// Conversion screen state
    Offers,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Playback, Topic::Score, Topic::Offers];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Playback(PlaybackEvent),
    Score(ScoreEvent),
    Offers(OfferEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Playback(_) => Topic::Playback,
            Event::Score(_) => Topic::Score,
            Event::Offers(_) => Topic::Offers,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing is best-effort: events sent while a
/// topic has no subscribers are dropped.
#[derive(Clone)]
pub struct EventBus {
    playback: broadcast::Sender<Event>,
    score: broadcast::Sender<Event>,
    offers: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            playback: broadcast::channel(capacity).0,
            score: broadcast::channel(capacity).0,
            offers: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Playback => &self.playback,
            Topic::Score => &self.score,
            Topic::Offers => &self.offers,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!(target: "runtime::events", %topic, "no subscribers");
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
