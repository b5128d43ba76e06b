//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! driving playback or streaming events from specific topics.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use macrogame_core::{EndScreen, InstanceId, PlaybackSnapshot, Points, RestartScope};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Enter the first view of the macrogame.
    pub async fn start(&self) -> Result<()> {
        self.request(|reply| Command::Start { reply }).await?
    }

    /// Click-to-continue on the intro or promo screen.
    pub async fn click(&self) -> Result<()> {
        self.request(|reply| Command::Click { reply }).await?
    }

    pub async fn restart(&self, scope: RestartScope) -> Result<()> {
        self.request(|reply| Command::Restart { scope, reply }).await?
    }

    /// Close the session: pending timers are dropped and the mounted module is unmounted.
    pub async fn teardown(&self) -> Result<()> {
        self.request(|reply| Command::Teardown { reply }).await
    }

    pub async fn redeem_points(&self, amount: Points) -> Result<()> {
        self.request(|reply| Command::RedeemPoints { amount, reply })
            .await?
    }

    /// Buy a point-gated offer on the end screen.
    pub async fn purchase_offer(&self, instance: InstanceId) -> Result<()> {
        self.request(|reply| Command::PurchaseOffer { instance, reply })
            .await?
    }

    /// Report that the reward renderer completed an unlocked offer.
    pub async fn notify_success(&self, instance: InstanceId) -> Result<()> {
        self.request(|reply| Command::NotifySuccess { instance, reply })
            .await?
    }

    /// Query the current session (read-only snapshot)
    pub async fn snapshot(&self) -> Result<PlaybackSnapshot> {
        self.request(|reply| Command::QuerySnapshot { reply }).await
    }

    /// Query the terminal screen, `None` before playback reaches it.
    pub async fn end_screen(&self) -> Result<Option<EndScreen>> {
        self.request(|reply| Command::QueryEndScreen { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Playback` - View changes, module mounts, overlay and lifecycle
    /// - `Topic::Score` - Ledger credits and debits
    /// - `Topic::Offers` - Resolved end screen and offer completions
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut score_rx = handle.subscribe(Topic::Score);
    /// while let Ok(event) = score_rx.recv().await {
    ///     // Handle score events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub(crate) async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }
}
