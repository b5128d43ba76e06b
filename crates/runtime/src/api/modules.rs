//! Minigame module contract.
//!
//! Every microgame is played by a [`MinigameModule`] mounted by the playback
//! worker. The module talks back through its [`ModuleBridge`], which is bound
//! to a single mount: once the game has ended (or playback moved on), signals
//! sent through an old bridge are dropped by the worker.
use std::collections::BTreeMap;

use async_trait::async_trait;
use macrogame_core::{EventId, MicrogameId, MicrogameResult, SkinConfig};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::errors::{Result, RuntimeError};
use crate::workers::Command;

/// Everything a module receives when it is mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleProps {
    pub flow_index: usize,
    pub microgame_id: MicrogameId,
    /// Identifies this mount; matches the bridge's `play_id`.
    pub play_id: u64,
    pub skin: Option<SkinConfig>,
    pub game_data: BTreeMap<String, String>,
    pub controls: String,
    /// Whether the title/controls overlay is drawn over the game right now.
    pub is_overlay_visible: bool,
}

/// Callback from a mounted module to playback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleSignal {
    /// A trackable event happened.
    Event(EventId),
    /// First user input.
    Interaction,
    /// The game is over.
    End(MicrogameResult),
}

/// Channel back to the playback worker, scoped to one mount.
#[derive(Clone, Debug)]
pub struct ModuleBridge {
    play_id: u64,
    command_tx: mpsc::WeakSender<Command>,
}

impl ModuleBridge {
    pub(crate) fn new(play_id: u64, command_tx: mpsc::WeakSender<Command>) -> Self {
        Self {
            play_id,
            command_tx,
        }
    }

    pub fn play_id(&self) -> u64 {
        self.play_id
    }

    pub async fn send(&self, signal: ModuleSignal) -> Result<()> {
        let command_tx = self
            .command_tx
            .upgrade()
            .ok_or(RuntimeError::CommandChannelClosed)?;

        command_tx
            .send(Command::Module {
                play_id: self.play_id,
                signal,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    pub async fn report_event(&self, event_id: impl Into<EventId>) -> Result<()> {
        self.send(ModuleSignal::Event(event_id.into())).await
    }

    pub async fn interaction(&self) -> Result<()> {
        self.send(ModuleSignal::Interaction).await
    }

    pub async fn end(&self, result: MicrogameResult) -> Result<()> {
        self.send(ModuleSignal::End(result)).await
    }
}

/// A playable microgame.
///
/// Implementations render the game (or simulate it) and drive the bridge.
/// `mount` must return promptly; long-running play belongs in a spawned task
/// that is stopped in `unmount`.
#[async_trait]
pub trait MinigameModule: Send {
    async fn mount(&mut self, props: ModuleProps, bridge: ModuleBridge) -> Result<()>;

    /// The overlay drawn over this game was shown or hidden.
    async fn overlay_changed(&mut self, _visible: bool) {}

    async fn unmount(&mut self) {}
}

/// One step of a [`ScriptedModule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Delay after the previous step.
    pub after_ms: u64,
    pub signal: ModuleSignal,
}

impl ScriptStep {
    pub fn new(after_ms: u64, signal: ModuleSignal) -> Self {
        Self { after_ms, signal }
    }
}

/// Module that replays a fixed list of signals.
///
/// Useful for headless previews and tests.
#[derive(Debug, Default)]
pub struct ScriptedModule {
    steps: Vec<ScriptStep>,
    task: Option<JoinHandle<()>>,
}

impl ScriptedModule {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self { steps, task: None }
    }

    /// Interacts, reports `event_id` once and ends with `result`.
    pub fn single_event(event_id: impl Into<EventId>, result: MicrogameResult, play_ms: u64) -> Self {
        Self::new(vec![
            ScriptStep::new(0, ModuleSignal::Interaction),
            ScriptStep::new(play_ms / 2, ModuleSignal::Event(event_id.into())),
            ScriptStep::new(play_ms - play_ms / 2, ModuleSignal::End(result)),
        ])
    }
}

#[async_trait]
impl MinigameModule for ScriptedModule {
    async fn mount(&mut self, props: ModuleProps, bridge: ModuleBridge) -> Result<()> {
        let steps = self.steps.clone();
        let microgame = props.microgame_id;

        self.task = Some(tokio::spawn(async move {
            for step in steps {
                tokio::time::sleep(std::time::Duration::from_millis(step.after_ms)).await;
                if let Err(error) = bridge.send(step.signal).await {
                    tracing::debug!(
                        target: "runtime::module",
                        microgame = %microgame,
                        error = %error,
                        "scripted module stopped"
                    );
                    break;
                }
            }
        }));
        Ok(())
    }

    async fn unmount(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Module that accepts a mount and never reports anything.
pub struct IdleModule;

#[async_trait]
impl MinigameModule for IdleModule {
    async fn mount(&mut self, _props: ModuleProps, _bridge: ModuleBridge) -> Result<()> {
        Ok(())
    }
}
