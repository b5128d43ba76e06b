//! Playback worker that owns the authoritative [`PlaybackState`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle) and module
//! bridges, runs them through [`PlaybackEngine`], and applies the returned
//! effects: arming the single timer deadline, mounting and unmounting
//! modules, and publishing events. Commands and the deadline are polled from
//! one `select!` loop, so every transition is serialized.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use macrogame_core::{
    EndScreen, EngineConfig, ErrorSeverity, InstanceId, MacrogameError, MethodOracle,
    MicrogameId, MicrogameResult, PlaybackEffect, PlaybackEngine, PlaybackError, PlaybackScript,
    PlaybackSnapshot, PlaybackState, PlaybackView, Points, RestartScope, TimerId,
};
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::api::{
    MinigameModule, ModuleBridge, ModuleProps, ModuleRegistry, ModuleSignal, Result,
    RuntimeError,
};
use crate::events::{Event, EventBus, OfferEvent, PlaybackEvent, ScoreEvent};

/// Commands that can be sent to the playback worker
pub enum Command {
    Start {
        reply: oneshot::Sender<Result<()>>,
    },
    Click {
        reply: oneshot::Sender<Result<()>>,
    },
    Restart {
        scope: RestartScope,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Idempotent; always succeeds.
    Teardown {
        reply: oneshot::Sender<()>,
    },
    RedeemPoints {
        amount: Points,
        reply: oneshot::Sender<Result<()>>,
    },
    PurchaseOffer {
        instance: InstanceId,
        reply: oneshot::Sender<Result<()>>,
    },
    NotifySuccess {
        instance: InstanceId,
        reply: oneshot::Sender<Result<()>>,
    },
    QuerySnapshot {
        reply: oneshot::Sender<PlaybackSnapshot>,
    },
    QueryEndScreen {
        reply: oneshot::Sender<Option<EndScreen>>,
    },
    /// Callback from the module mounted as `play_id`.
    Module {
        play_id: u64,
        signal: ModuleSignal,
    },
    /// Stop the worker loop.
    Shutdown,
}

struct ArmedTimer {
    id: TimerId,
    deadline: Instant,
}

struct ActiveModule {
    play_id: u64,
    microgame_id: MicrogameId,
    module: Box<dyn MinigameModule>,
}

/// Background task that processes playback commands.
pub struct PlaybackWorker {
    state: PlaybackState,
    script: PlaybackScript,
    config: EngineConfig,
    methods: Arc<dyn MethodOracle>,
    modules: ModuleRegistry,
    command_rx: mpsc::Receiver<Command>,
    bridge_tx: mpsc::WeakSender<Command>,
    event_bus: EventBus,
    timer: Option<ArmedTimer>,
    active: Option<ActiveModule>,
}

impl PlaybackWorker {
    /// Creates a new playback worker.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        state: PlaybackState,
        script: PlaybackScript,
        config: EngineConfig,
        methods: Arc<dyn MethodOracle>,
        modules: ModuleRegistry,
        command_rx: mpsc::Receiver<Command>,
        bridge_tx: mpsc::WeakSender<Command>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            state,
            script,
            config,
            methods,
            modules,
            command_rx,
            bridge_tx,
            event_bus,
            timer: None,
            active: None,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        loop {
            let deadline = self.timer.as_ref().map(|timer| timer.deadline);

            tokio::select! {
                biased;

                cmd = self.command_rx.recv() => match cmd {
                    Some(Command::Shutdown) | None => break,
                    Some(cmd) => self.handle_command(cmd).await,
                },
                () = wait_until(deadline) => self.fire_timer().await,
            }
        }

        self.timer = None;
        self.unmount_active().await;
        debug!(target: "runtime::worker", "playback worker stopped");
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Start { reply } => {
                let result = self.trigger("start", |engine, _| engine.start()).await;
                let _ = reply.send(result);
            }
            Command::Click { reply } => {
                let result = self.trigger("click", |engine, _| engine.click()).await;
                let _ = reply.send(result);
            }
            Command::Restart { scope, reply } => {
                let result = self
                    .trigger("restart", move |engine, _| engine.restart(scope))
                    .await;
                let _ = reply.send(result);
            }
            Command::Teardown { reply } => {
                let effects =
                    PlaybackEngine::new(&mut self.state, &self.script, &self.config).teardown();
                self.apply(effects).await;
                let _ = reply.send(());
            }
            Command::RedeemPoints { amount, reply } => {
                let result = self
                    .trigger("redeem_points", move |engine, _| engine.redeem_points(amount))
                    .await;
                let _ = reply.send(result);
            }
            Command::PurchaseOffer { instance, reply } => {
                let result = self
                    .trigger("purchase_offer", move |engine, methods| {
                        engine.purchase_offer(&instance, methods)
                    })
                    .await;
                let _ = reply.send(result);
            }
            Command::NotifySuccess { instance, reply } => {
                let result = self
                    .trigger("notify_success", move |engine, methods| {
                        engine.notify_success(&instance, methods)
                    })
                    .await;
                let _ = reply.send(result);
            }
            Command::QuerySnapshot { reply } => {
                let _ = reply.send(PlaybackSnapshot::capture(&self.state, &self.script));
            }
            Command::QueryEndScreen { reply } => {
                let _ = reply.send(self.end_screen());
            }
            Command::Module { play_id, signal } => self.handle_signal(play_id, signal).await,
            Command::Shutdown => {}
        }
    }

    /// Runs one engine trigger and applies its effects.
    async fn trigger<F>(&mut self, operation: &'static str, op: F) -> Result<()>
    where
        F: FnOnce(
            &mut PlaybackEngine<'_>,
            &dyn MethodOracle,
        ) -> std::result::Result<Vec<PlaybackEffect>, PlaybackError>,
    {
        let outcome = {
            let mut engine = PlaybackEngine::new(&mut self.state, &self.script, &self.config);
            op(&mut engine, self.methods.as_ref())
        };

        match outcome {
            Ok(effects) => {
                self.apply(effects).await;
                Ok(())
            }
            Err(error) => {
                log_rejection(operation, &error);
                Err(error.into())
            }
        }
    }

    async fn handle_signal(&mut self, play_id: u64, signal: ModuleSignal) {
        let outcome = {
            let mut engine = PlaybackEngine::new(&mut self.state, &self.script, &self.config);
            match &signal {
                ModuleSignal::Event(event_id) => engine.report_event(play_id, event_id),
                ModuleSignal::Interaction => engine.interaction(play_id),
                ModuleSignal::End(result) => engine.end_game(play_id, *result),
            }
        };

        match outcome {
            Ok(effects) if effects.is_empty() => {
                debug!(
                    target: "runtime::worker",
                    play_id,
                    signal = ?signal,
                    current_play = self.state.play_id(),
                    "module signal ignored"
                );
            }
            Ok(effects) => self.apply(effects).await,
            Err(error) => log_rejection("module_signal", &error),
        }
    }

    async fn fire_timer(&mut self) {
        let Some(timer) = self.timer.take() else {
            return;
        };
        trace!(target: "runtime::worker", timer = %timer.id, "timer elapsed");

        let effects =
            PlaybackEngine::new(&mut self.state, &self.script, &self.config).timer_elapsed(timer.id);
        self.apply(effects).await;
    }

    /// Applies effects in order. Follow-up effects (a failed mount ending the
    /// game) are queued behind the current batch.
    async fn apply(&mut self, effects: Vec<PlaybackEffect>) {
        let mut queue: VecDeque<PlaybackEffect> = effects.into();
        let mut refresh_offers = false;

        while let Some(effect) = queue.pop_front() {
            match effect {
                PlaybackEffect::TimerScheduled { id, delay_ms } => {
                    trace!(target: "runtime::worker", timer = %id, delay_ms, "timer armed");
                    self.timer = Some(ArmedTimer {
                        id,
                        deadline: Instant::now() + Duration::from_millis(delay_ms),
                    });
                }
                PlaybackEffect::TimerCancelled { id } => {
                    if self.timer.as_ref().is_some_and(|timer| timer.id == id) {
                        trace!(target: "runtime::worker", timer = %id, "timer cancelled");
                        self.timer = None;
                    }
                }
                PlaybackEffect::ViewEntered { view, flow_index } => {
                    // Leaving the game view always ends the current mount.
                    self.unmount_active().await;
                    let microgame_id = flow_index
                        .and_then(|index| self.script.item(index))
                        .map(|item| item.microgame_id().clone());
                    debug!(
                        target: "runtime::worker",
                        %view,
                        ?flow_index,
                        microgame = ?microgame_id,
                        "view entered"
                    );
                    refresh_offers |= view == PlaybackView::End;
                    self.publish(Event::Playback(PlaybackEvent::ViewChanged {
                        view,
                        flow_index,
                        microgame_id,
                    }));
                }
                PlaybackEffect::OverlayChanged { visible } => {
                    if let Some(active) = self.active.as_mut() {
                        active.module.overlay_changed(visible).await;
                    }
                    self.publish(Event::Playback(PlaybackEvent::OverlayChanged { visible }));
                }
                PlaybackEffect::MicrogameLaunched {
                    flow_index,
                    microgame_id,
                    play_id,
                } => {
                    self.publish(Event::Playback(PlaybackEvent::MicrogameStarted {
                        flow_index,
                        microgame_id: microgame_id.clone(),
                        play_id,
                    }));
                    if let Err(error) = self.mount(flow_index, &microgame_id, play_id).await {
                        warn!(
                            target: "runtime::worker",
                            microgame = %microgame_id,
                            play_id,
                            error = %error,
                            "module unavailable; recording a loss"
                        );
                        self.publish(Event::Playback(PlaybackEvent::ModuleUnavailable {
                            microgame_id,
                            play_id,
                            reason: error.to_string(),
                        }));
                        let follow_up =
                            PlaybackEngine::new(&mut self.state, &self.script, &self.config)
                                .end_game(play_id, MicrogameResult::LOSE);
                        if let Ok(effects) = follow_up {
                            queue.extend(effects);
                        }
                    }
                }
                PlaybackEffect::MicrogameFinished {
                    flow_index,
                    microgame_id,
                    play_id,
                    result,
                } => {
                    self.unmount_active().await;
                    info!(
                        target: "runtime::worker",
                        flow_index,
                        microgame = %microgame_id,
                        win = result.win,
                        total = self.state.session().total_score(),
                        "microgame ended"
                    );
                    self.publish(Event::Playback(PlaybackEvent::MicrogameEnded {
                        flow_index,
                        microgame_id,
                        play_id,
                        result,
                    }));
                }
                PlaybackEffect::InteractionRegistered { play_id } => {
                    self.publish(Event::Playback(PlaybackEvent::InteractionRegistered {
                        play_id,
                    }));
                }
                PlaybackEffect::PointsCredited {
                    event_id,
                    points,
                    total,
                } => {
                    debug!(target: "runtime::worker", event = %event_id, points, total, "points credited");
                    self.publish(Event::Score(ScoreEvent::Credited {
                        event_id,
                        points,
                        total,
                    }));
                }
                PlaybackEffect::PointsDebited { amount, total } => {
                    info!(target: "runtime::worker", amount, total, "points debited");
                    refresh_offers = true;
                    self.publish(Event::Score(ScoreEvent::Debited { amount, total }));
                }
                PlaybackEffect::OfferCompleted { instance_id } => {
                    info!(target: "runtime::worker", instance = %instance_id, "offer completed");
                    refresh_offers = true;
                    self.publish(Event::Offers(OfferEvent::Completed { instance_id }));
                }
                PlaybackEffect::SessionReset => {
                    self.publish(Event::Playback(PlaybackEvent::SessionReset));
                }
                PlaybackEffect::Closed => {
                    self.timer = None;
                    self.unmount_active().await;
                    info!(target: "runtime::worker", "session closed");
                    self.publish(Event::Playback(PlaybackEvent::Closed));
                }
            }
        }

        if refresh_offers && let Some(screen) = self.end_screen() {
            self.publish(Event::Offers(OfferEvent::Resolved(screen)));
        }
    }

    async fn mount(
        &mut self,
        flow_index: usize,
        microgame_id: &MicrogameId,
        play_id: u64,
    ) -> Result<()> {
        let mut module =
            self.modules
                .create(microgame_id)
                .ok_or_else(|| RuntimeError::ModuleNotRegistered {
                    microgame: microgame_id.clone(),
                })?;

        let item = self.script.item(flow_index);
        let props = ModuleProps {
            flow_index,
            microgame_id: microgame_id.clone(),
            play_id,
            skin: item.and_then(|item| item.skin.clone()),
            game_data: item
                .map(|item| item.metadata.game_data.clone())
                .unwrap_or_default(),
            controls: item
                .map(|item| item.metadata.controls.clone())
                .unwrap_or_default(),
            is_overlay_visible: self.state.is_overlay_visible(),
        };
        let bridge = ModuleBridge::new(play_id, self.bridge_tx.clone());

        module
            .mount(props, bridge)
            .await
            .map_err(|error| RuntimeError::ModuleMount {
                microgame: microgame_id.clone(),
                reason: error.to_string(),
            })?;

        debug!(target: "runtime::worker", microgame = %microgame_id, play_id, "module mounted");
        self.active = Some(ActiveModule {
            play_id,
            microgame_id: microgame_id.clone(),
            module,
        });
        Ok(())
    }

    async fn unmount_active(&mut self) {
        if let Some(mut active) = self.active.take() {
            active.module.unmount().await;
            debug!(
                target: "runtime::worker",
                microgame = %active.microgame_id,
                play_id = active.play_id,
                "module unmounted"
            );
        }
    }

    fn end_screen(&mut self) -> Option<EndScreen> {
        PlaybackEngine::new(&mut self.state, &self.script, &self.config)
            .end_screen(self.methods.as_ref())
    }

    fn publish(&self, event: Event) {
        self.event_bus.publish(event);
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn log_rejection(operation: &'static str, error: &PlaybackError) {
    match error.severity() {
        ErrorSeverity::Validation => warn!(
            target: "runtime::worker",
            operation,
            code = error.error_code(),
            error = %error,
            "trigger rejected"
        ),
        ErrorSeverity::Rejected | ErrorSeverity::Closed => debug!(
            target: "runtime::worker",
            operation,
            code = error.error_code(),
            error = %error,
            "trigger rejected"
        ),
    }
}
