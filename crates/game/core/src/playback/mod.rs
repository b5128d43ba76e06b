//! Playback state machine.
//!
//! The [`PlaybackEngine`] is the only reducer for [`PlaybackState`]. Every
//! external trigger (start, click, timer, module callback, offer action) is a
//! method that mutates the state synchronously and returns the resulting
//! [`PlaybackEffect`]s. The engine never sleeps: timed transitions come back
//! in as [`PlaybackEngine::timer_elapsed`] with the id handed out earlier,
//! and any id that is no longer pending is ignored. This is what lets a click
//! and an auto-advance race for the same transition without double-firing.
//!
//! Canonical order for one flow item:
//! `Title → Controls → Game → Result` (`Separate`), `Combined → Game → Result`
//! (`Combined`), `Game → Result` (`Skip`, `Overlay`). The whole flow is
//! wrapped by the optional `Intro` and `Promo` screens and ends on `End`.

mod effect;
mod errors;
mod script;
mod snapshot;
mod state;
mod timer;
mod view;

pub use effect::PlaybackEffect;
pub use errors::PlaybackError;
pub use script::{PlaybackScript, SkipReason, SkippedItem};
pub use snapshot::PlaybackSnapshot;
pub use state::PlaybackState;
pub use timer::{TimerId, TimerPurpose};
pub use view::{MicrogameResult, PlaybackMode, PlaybackView, RestartScope};

use crate::config::EngineConfig;
use crate::definition::{ConversionScreen, EventId, InstanceId, ScreenConfig, ScreenFlowType};
use crate::env::MethodOracle;
use crate::gating::{self, ResolvedScreen};
use crate::ledger::Points;
use crate::session::ItemResult;

/// Effects produced by a single trigger.
pub type Effects = Vec<PlaybackEffect>;

/// What the terminal screen shows.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EndScreen {
    Offers(ResolvedScreen),
    /// Neutral fallback when the macrogame has no conversion screen.
    NoOfferConfigured,
    /// Single-microgame preview: offer to play again.
    Replay,
}

/// Playback reducer borrowing a session and its script.
///
/// Construct one per trigger, the way a host handles one command at a time.
pub struct PlaybackEngine<'a> {
    state: &'a mut PlaybackState,
    script: &'a PlaybackScript,
    config: &'a EngineConfig,
}

impl<'a> PlaybackEngine<'a> {
    pub fn new(
        state: &'a mut PlaybackState,
        script: &'a PlaybackScript,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            state,
            script,
            config,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        self.state
    }

    /// Enters the first view: the intro if enabled, otherwise the first item.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::AlreadyStarted`] when called twice; use
    /// [`restart`](Self::restart) to rewind.
    pub fn start(&mut self) -> Result<Effects, PlaybackError> {
        self.ensure_open()?;
        if self.state.view != PlaybackView::Idle {
            return Err(PlaybackError::AlreadyStarted);
        }

        let mut fx = Effects::new();
        self.enter_first(&mut fx);
        Ok(fx)
    }

    /// Click-to-continue on the intro or promo screen. Ignored elsewhere.
    pub fn click(&mut self) -> Result<Effects, PlaybackError> {
        self.ensure_open()?;

        let mut fx = Effects::new();
        if self.state.view.accepts_click() {
            self.advance(&mut fx);
        }
        Ok(fx)
    }

    /// Reports that timer `id` elapsed.
    ///
    /// A timer that was cancelled, replaced, or belongs to a torn-down
    /// session produces no effects.
    pub fn timer_elapsed(&mut self, id: TimerId) -> Effects {
        let mut fx = Effects::new();
        if self.state.closed {
            return fx;
        }

        match self.state.timers.fire(id) {
            Some(TimerPurpose::Advance) => self.advance(&mut fx),
            Some(TimerPurpose::HideOverlay) => self.set_overlay(false, &mut fx),
            None => {}
        }
        fx
    }

    /// Trackable event reported by the module mounted as `play_id`.
    ///
    /// Credits the ledger when the event is declared by the current
    /// microgame. Unknown events and calls from stale mounts are ignored.
    pub fn report_event(
        &mut self,
        play_id: u64,
        event_id: &EventId,
    ) -> Result<Effects, PlaybackError> {
        self.ensure_open()?;
        if !self.is_current_game(play_id) {
            return Ok(Effects::new());
        }
        let Some(points) = self
            .script
            .item(self.state.flow_index)
            .and_then(|item| item.points_for(event_id))
        else {
            return Ok(Effects::new());
        };

        self.state.session.count_event(event_id);
        let total = self.state.session.ledger.credit(points);
        Ok(vec![PlaybackEffect::PointsCredited {
            event_id: event_id.clone(),
            points,
            total,
        }])
    }

    /// Game over reported by the module mounted as `play_id`; moves to the result banner.
    pub fn end_game(
        &mut self,
        play_id: u64,
        result: MicrogameResult,
    ) -> Result<Effects, PlaybackError> {
        self.ensure_open()?;
        let mut fx = Effects::new();
        if !self.is_current_game(play_id) {
            return Ok(fx);
        }
        let script = self.script;
        let flow_index = self.state.flow_index;
        let Some(item) = script.item(flow_index) else {
            return Ok(fx);
        };

        self.set_overlay(false, &mut fx);
        self.state.awaiting_interaction = false;
        self.state.last_result = Some(result);
        self.state.session.record_result(ItemResult {
            flow_index,
            microgame_id: item.microgame_id().clone(),
            win: result.win,
        });
        fx.push(PlaybackEffect::MicrogameFinished {
            flow_index,
            microgame_id: item.microgame_id().clone(),
            play_id,
            result,
        });

        self.enter_view(PlaybackView::Result, &mut fx);
        self.arm(
            TimerPurpose::Advance,
            self.config.result_screen_duration_ms,
            &mut fx,
        );
        Ok(fx)
    }

    /// First user input in the module mounted as `play_id`.
    ///
    /// Clears the waiting overlay the first time; never affects scoring.
    pub fn interaction(&mut self, play_id: u64) -> Result<Effects, PlaybackError> {
        self.ensure_open()?;
        if !self.is_current_game(play_id) || !self.state.awaiting_interaction {
            return Ok(Effects::new());
        }
        self.state.awaiting_interaction = false;
        Ok(vec![PlaybackEffect::InteractionRegistered { play_id }])
    }

    /// Spends points from the end screen.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::InsufficientFunds`] leaves the balance unchanged.
    pub fn redeem_points(&mut self, amount: Points) -> Result<Effects, PlaybackError> {
        self.ensure_open()?;
        self.ensure_at_end()?;

        let total = self.state.session.ledger.debit(amount)?;
        Ok(vec![PlaybackEffect::PointsDebited { amount, total }])
    }

    /// Buys a point-gated offer slot: `debit(cost)` then mark it completed.
    ///
    /// Buying an already unlocked slot is a no-op. No partial redemption: on
    /// any error neither the balance nor the completion set changes.
    pub fn purchase_offer<M>(
        &mut self,
        instance_id: &InstanceId,
        methods: &M,
    ) -> Result<Effects, PlaybackError>
    where
        M: MethodOracle + ?Sized,
    {
        self.ensure_open()?;
        self.ensure_at_end()?;
        let screen = self.active_screen()?;
        let resolved = self.resolve_screen(screen, methods);
        let offer = resolved
            .get(instance_id)
            .ok_or_else(|| PlaybackError::UnknownOffer {
                instance: instance_id.clone(),
            })?;

        if !offer.locked {
            return Ok(Effects::new());
        }
        let Some(cost) = offer.cost else {
            return Err(PlaybackError::NotPurchasable {
                instance: instance_id.clone(),
                gate: offer.gate,
            });
        };

        let total = self.state.session.ledger.debit(cost)?;
        self.state.session.mark_completed(instance_id.clone());
        Ok(vec![
            PlaybackEffect::PointsDebited {
                amount: cost,
                total,
            },
            PlaybackEffect::OfferCompleted {
                instance_id: instance_id.clone(),
            },
        ])
    }

    /// Success report from a reward renderer: the user completed an unlocked offer.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::OfferLocked`] if the slot is not currently unlocked;
    /// success can only be reported for offers the user could reach.
    pub fn notify_success<M>(
        &mut self,
        instance_id: &InstanceId,
        methods: &M,
    ) -> Result<Effects, PlaybackError>
    where
        M: MethodOracle + ?Sized,
    {
        self.ensure_open()?;
        self.ensure_at_end()?;
        let screen = self.active_screen()?;
        let resolved = self.resolve_screen(screen, methods);
        let offer = resolved
            .get(instance_id)
            .ok_or_else(|| PlaybackError::UnknownOffer {
                instance: instance_id.clone(),
            })?;
        if offer.locked {
            return Err(PlaybackError::OfferLocked {
                instance: instance_id.clone(),
            });
        }

        if self.state.session.mark_completed(instance_id.clone()) {
            Ok(vec![PlaybackEffect::OfferCompleted {
                instance_id: instance_id.clone(),
            }])
        } else {
            Ok(Effects::new())
        }
    }

    /// Rewinds the cursor to the first view, cancelling any pending timer.
    ///
    /// [`RestartScope::Flow`] keeps score and completions;
    /// [`RestartScope::Session`] clears them too.
    pub fn restart(&mut self, scope: RestartScope) -> Result<Effects, PlaybackError> {
        self.ensure_open()?;

        let mut fx = Effects::new();
        self.cancel_timer(&mut fx);
        self.set_overlay(false, &mut fx);
        self.state.flow_index = 0;
        self.state.awaiting_interaction = false;
        self.state.last_result = None;
        if scope == RestartScope::Session {
            self.state.session.reset();
            fx.push(PlaybackEffect::SessionReset);
        }
        self.enter_first(&mut fx);
        Ok(fx)
    }

    /// Closes the session. Pending timers are cancelled and every later
    /// trigger is refused.
    pub fn teardown(&mut self) -> Effects {
        let mut fx = Effects::new();
        if self.state.closed {
            return fx;
        }
        self.cancel_timer(&mut fx);
        self.state.closed = true;
        fx.push(PlaybackEffect::Closed);
        fx
    }

    /// Terminal screen content, or `None` before the end.
    pub fn end_screen<M>(&self, methods: &M) -> Option<EndScreen>
    where
        M: MethodOracle + ?Sized,
    {
        if self.state.view != PlaybackView::End {
            return None;
        }
        Some(match (self.script.mode, &self.script.conversion_screen) {
            (PlaybackMode::MicrogamePreview, _) => EndScreen::Replay,
            (PlaybackMode::Full, Some(screen)) => {
                EndScreen::Offers(self.resolve_screen(screen, methods))
            }
            (PlaybackMode::Full, None) => EndScreen::NoOfferConfigured,
        })
    }

    /// Resolves the conversion screen against the current session, at any view.
    pub fn resolve_offers<M>(&self, methods: &M) -> Option<ResolvedScreen>
    where
        M: MethodOracle + ?Sized,
    {
        self.script
            .conversion_screen
            .as_ref()
            .map(|screen| self.resolve_screen(screen, methods))
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot::capture(self.state, self.script)
    }

    // ===== transitions =====

    fn enter_first(&mut self, fx: &mut Effects) {
        let script = self.script;
        let intro = &script.definition.intro_screen;
        if intro.enabled {
            self.enter_static(PlaybackView::Intro, intro, fx);
        } else {
            self.begin_item(0, fx);
        }
    }

    fn advance(&mut self, fx: &mut Effects) {
        let script = self.script;
        match self.state.view {
            PlaybackView::Intro => self.begin_item(0, fx),
            PlaybackView::Title => {
                let delay = script.definition.config.controls_screen_duration_ms;
                self.enter_view(PlaybackView::Controls, fx);
                self.arm(TimerPurpose::Advance, delay, fx);
            }
            PlaybackView::Controls | PlaybackView::Combined => self.enter_game(fx),
            PlaybackView::Result => self.begin_item(self.state.flow_index + 1, fx),
            PlaybackView::Promo => self.enter_view(PlaybackView::End, fx),
            PlaybackView::Idle | PlaybackView::Game | PlaybackView::End => {}
        }
    }

    fn begin_item(&mut self, flow_index: usize, fx: &mut Effects) {
        let script = self.script;
        if flow_index >= script.items.len() {
            self.finish(fx);
            return;
        }
        self.state.flow_index = flow_index;

        let config = &script.definition.config;
        match config.screen_flow_type {
            ScreenFlowType::Separate => {
                self.enter_view(PlaybackView::Title, fx);
                self.arm(TimerPurpose::Advance, config.title_screen_duration_ms, fx);
            }
            ScreenFlowType::Combined => {
                self.enter_view(PlaybackView::Combined, fx);
                self.arm(TimerPurpose::Advance, config.pre_game_duration_ms(), fx);
            }
            ScreenFlowType::Skip | ScreenFlowType::Overlay => self.enter_game(fx),
        }
    }

    fn enter_game(&mut self, fx: &mut Effects) {
        let script = self.script;
        let flow_index = self.state.flow_index;
        let Some(item) = script.item(flow_index) else {
            self.finish(fx);
            return;
        };

        self.enter_view(PlaybackView::Game, fx);
        self.state.play_id += 1;
        self.state.awaiting_interaction = true;
        self.state.last_result = None;

        let config = &script.definition.config;
        if config.screen_flow_type == ScreenFlowType::Overlay {
            self.set_overlay(true, fx);
            self.arm(TimerPurpose::HideOverlay, config.pre_game_duration_ms(), fx);
        }

        fx.push(PlaybackEffect::MicrogameLaunched {
            flow_index,
            microgame_id: item.microgame_id().clone(),
            play_id: self.state.play_id,
        });
    }

    fn finish(&mut self, fx: &mut Effects) {
        let script = self.script;
        let promo = &script.definition.promo_screen;
        if promo.enabled {
            self.enter_static(PlaybackView::Promo, promo, fx);
        } else {
            self.enter_view(PlaybackView::End, fx);
        }
    }

    fn enter_static(&mut self, view: PlaybackView, screen: &ScreenConfig, fx: &mut Effects) {
        self.enter_view(view, fx);
        if !screen.click_to_continue {
            self.arm(TimerPurpose::Advance, screen.duration_ms(), fx);
        }
    }

    /// Every view change cancels whatever timer belonged to the previous view.
    fn enter_view(&mut self, view: PlaybackView, fx: &mut Effects) {
        self.cancel_timer(fx);
        self.state.view = view;
        fx.push(PlaybackEffect::ViewEntered {
            view,
            flow_index: view.is_item_view().then_some(self.state.flow_index),
        });
    }

    fn arm(&mut self, purpose: TimerPurpose, delay_ms: u64, fx: &mut Effects) {
        let (id, cancelled) = self.state.timers.arm(purpose);
        if let Some(cancelled) = cancelled {
            fx.push(PlaybackEffect::TimerCancelled { id: cancelled });
        }
        fx.push(PlaybackEffect::TimerScheduled { id, delay_ms });
    }

    fn cancel_timer(&mut self, fx: &mut Effects) {
        if let Some(id) = self.state.timers.disarm() {
            fx.push(PlaybackEffect::TimerCancelled { id });
        }
    }

    fn set_overlay(&mut self, visible: bool, fx: &mut Effects) {
        if self.state.overlay_visible != visible {
            self.state.overlay_visible = visible;
            fx.push(PlaybackEffect::OverlayChanged { visible });
        }
    }

    // ===== guards =====

    fn ensure_open(&self) -> Result<(), PlaybackError> {
        if self.state.closed {
            return Err(PlaybackError::SessionClosed);
        }
        Ok(())
    }

    fn ensure_at_end(&self) -> Result<(), PlaybackError> {
        if self.state.view != PlaybackView::End {
            return Err(PlaybackError::NotAtEnd {
                view: self.state.view,
            });
        }
        Ok(())
    }

    fn is_current_game(&self, play_id: u64) -> bool {
        self.state.view == PlaybackView::Game && self.state.play_id == play_id
    }

    fn active_screen(&self) -> Result<&'a ConversionScreen, PlaybackError> {
        match self.script.mode {
            PlaybackMode::Full => self
                .script
                .conversion_screen
                .as_ref()
                .ok_or(PlaybackError::NoConversionScreen),
            PlaybackMode::MicrogamePreview => Err(PlaybackError::NoConversionScreen),
        }
    }

    fn resolve_screen<M>(&self, screen: &ConversionScreen, methods: &M) -> ResolvedScreen
    where
        M: MethodOracle + ?Sized,
    {
        let session = &self.state.session;
        gating::resolve(
            screen,
            session.completed(),
            session.total_score(),
            &self.script.definition.point_costs,
            methods,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{
        FlowItem, Gate, GateVisibility, MacrogameConfig, MacrogameDefinition, MethodDefinition,
        MethodInstance, MethodKind, MicrogameMetadata,
    };
    use crate::env::{MethodTable, MicrogameTable};

    fn catalog() -> MicrogameTable {
        MicrogameTable::new()
            .with(MicrogameMetadata::new("a").with_event("win", 10))
            .with(MicrogameMetadata::new("b").with_event("win", 10))
    }

    fn definition(flow_type: ScreenFlowType) -> MacrogameDefinition {
        MacrogameDefinition {
            flow: vec![FlowItem::new("a"), FlowItem::new("b")],
            config: MacrogameConfig {
                screen_flow_type: flow_type,
                ..MacrogameConfig::default()
            },
            ..MacrogameDefinition::default()
        }
    }

    fn script(flow_type: ScreenFlowType) -> PlaybackScript {
        PlaybackScript::hydrate(definition(flow_type), None, &catalog())
    }

    fn scheduled(fx: &[PlaybackEffect]) -> Option<TimerId> {
        fx.iter().rev().find_map(|effect| match effect {
            PlaybackEffect::TimerScheduled { id, .. } => Some(*id),
            _ => None,
        })
    }

    fn views(fx: &[PlaybackEffect]) -> Vec<PlaybackView> {
        fx.iter()
            .filter_map(|effect| match effect {
                PlaybackEffect::ViewEntered { view, .. } => Some(*view),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn separate_flow_walks_title_controls_game() {
        let script = script(ScreenFlowType::Separate);
        let config = EngineConfig::default();
        let mut state = PlaybackState::new();
        let mut engine = PlaybackEngine::new(&mut state, &script, &config);

        let fx = engine.start().unwrap();
        assert_eq!(views(&fx), [PlaybackView::Title]);
        assert!(fx.contains(&PlaybackEffect::TimerScheduled {
            id: TimerId(1),
            delay_ms: 2_000
        }));

        let fx = engine.timer_elapsed(TimerId(1));
        assert_eq!(views(&fx), [PlaybackView::Controls]);
        let controls = scheduled(&fx).unwrap();

        let fx = engine.timer_elapsed(controls);
        assert_eq!(views(&fx), [PlaybackView::Game]);
        assert!(fx.iter().any(|effect| matches!(
            effect,
            PlaybackEffect::MicrogameLaunched { flow_index: 0, play_id: 1, .. }
        )));
        assert!(engine.state().is_awaiting_interaction());
    }

    #[test]
    fn start_twice_is_rejected() {
        let script = script(ScreenFlowType::Skip);
        let config = EngineConfig::default();
        let mut state = PlaybackState::new();
        let mut engine = PlaybackEngine::new(&mut state, &script, &config);
        engine.start().unwrap();
        assert_eq!(engine.start(), Err(PlaybackError::AlreadyStarted));
    }

    #[test]
    fn stale_timer_is_ignored() {
        let script = script(ScreenFlowType::Separate);
        let config = EngineConfig::default();
        let mut state = PlaybackState::new();
        let mut engine = PlaybackEngine::new(&mut state, &script, &config);
        engine.start().unwrap();

        assert!(engine.timer_elapsed(TimerId(42)).is_empty());
        assert_eq!(engine.state().view(), PlaybackView::Title);
    }

    #[test]
    fn result_screen_auto_advances_to_next_item() {
        let script = script(ScreenFlowType::Skip);
        let config = EngineConfig::default().with_result_screen_duration_ms(1_000);
        let mut state = PlaybackState::new();
        let mut engine = PlaybackEngine::new(&mut state, &script, &config);
        engine.start().unwrap();

        let fx = engine.end_game(1, MicrogameResult::WIN).unwrap();
        assert_eq!(views(&fx), [PlaybackView::Result]);
        let id = scheduled(&fx).unwrap();
        assert!(fx.contains(&PlaybackEffect::TimerScheduled { id, delay_ms: 1_000 }));
        assert_eq!(engine.state().last_result(), Some(MicrogameResult::WIN));

        let fx = engine.timer_elapsed(id);
        assert_eq!(views(&fx), [PlaybackView::Game]);
        assert_eq!(engine.state().flow_index(), 1);
        assert_eq!(engine.state().play_id(), 2);
    }

    #[test]
    fn callbacks_from_old_mount_are_ignored() {
        let script = script(ScreenFlowType::Skip);
        let config = EngineConfig::default();
        let mut state = PlaybackState::new();
        let mut engine = PlaybackEngine::new(&mut state, &script, &config);
        engine.start().unwrap();
        let fx = engine.end_game(1, MicrogameResult::LOSE).unwrap();
        engine.timer_elapsed(scheduled(&fx).unwrap());

        assert!(engine.report_event(1, &"win".into()).unwrap().is_empty());
        assert!(engine.end_game(1, MicrogameResult::WIN).unwrap().is_empty());
        assert!(engine.interaction(1).unwrap().is_empty());
        assert_eq!(engine.state().session().total_score(), 0);
        assert_eq!(engine.state().view(), PlaybackView::Game);
    }

    #[test]
    fn declared_event_credits_and_unknown_event_does_not() {
        let script = script(ScreenFlowType::Skip);
        let config = EngineConfig::default();
        let mut state = PlaybackState::new();
        let mut engine = PlaybackEngine::new(&mut state, &script, &config);
        engine.start().unwrap();

        let fx = engine.report_event(1, &"win".into()).unwrap();
        assert_eq!(
            fx,
            [PlaybackEffect::PointsCredited {
                event_id: "win".into(),
                points: 10,
                total: 10
            }]
        );
        assert!(engine.report_event(1, &"jump".into()).unwrap().is_empty());
        assert_eq!(engine.state().session().total_score(), 10);
        assert_eq!(engine.state().session().event_counts().len(), 1);
    }

    #[test]
    fn interaction_clears_waiting_flag_once() {
        let script = script(ScreenFlowType::Skip);
        let config = EngineConfig::default();
        let mut state = PlaybackState::new();
        let mut engine = PlaybackEngine::new(&mut state, &script, &config);
        engine.start().unwrap();

        assert_eq!(
            engine.interaction(1).unwrap(),
            [PlaybackEffect::InteractionRegistered { play_id: 1 }]
        );
        assert!(engine.interaction(1).unwrap().is_empty());
        assert!(!engine.state().is_awaiting_interaction());
    }

    #[test]
    fn overlay_hides_after_pre_game_duration() {
        let script = script(ScreenFlowType::Overlay);
        let config = EngineConfig::default();
        let mut state = PlaybackState::new();
        let mut engine = PlaybackEngine::new(&mut state, &script, &config);

        let fx = engine.start().unwrap();
        assert_eq!(views(&fx), [PlaybackView::Game]);
        assert!(fx.contains(&PlaybackEffect::OverlayChanged { visible: true }));
        let id = scheduled(&fx).unwrap();
        assert!(fx.contains(&PlaybackEffect::TimerScheduled { id, delay_ms: 5_000 }));

        let fx = engine.timer_elapsed(id);
        assert_eq!(fx, [PlaybackEffect::OverlayChanged { visible: false }]);
        assert_eq!(engine.state().view(), PlaybackView::Game);
    }

    #[test]
    fn ending_game_under_overlay_hides_it_and_cancels_timer() {
        let script = script(ScreenFlowType::Overlay);
        let config = EngineConfig::default();
        let mut state = PlaybackState::new();
        let mut engine = PlaybackEngine::new(&mut state, &script, &config);
        let hide = scheduled(&engine.start().unwrap()).unwrap();

        let fx = engine.end_game(1, MicrogameResult::WIN).unwrap();
        assert!(fx.contains(&PlaybackEffect::OverlayChanged { visible: false }));
        assert!(fx.contains(&PlaybackEffect::TimerCancelled { id: hide }));
        assert!(engine.timer_elapsed(hide).is_empty());
    }

    #[test]
    fn click_only_applies_to_intro_and_promo() {
        let mut definition = definition(ScreenFlowType::Separate);
        definition.intro_screen = ScreenConfig::click_through();
        let script = PlaybackScript::hydrate(definition, None, &catalog());
        let config = EngineConfig::default();
        let mut state = PlaybackState::new();
        let mut engine = PlaybackEngine::new(&mut state, &script, &config);

        let fx = engine.start().unwrap();
        assert_eq!(views(&fx), [PlaybackView::Intro]);
        assert!(scheduled(&fx).is_none());

        let fx = engine.click().unwrap();
        assert_eq!(views(&fx), [PlaybackView::Title]);
        assert!(engine.click().unwrap().is_empty());
        assert_eq!(engine.state().view(), PlaybackView::Title);
    }

    #[test]
    fn end_screen_variants() {
        let methods = MethodTable::new().with(MethodDefinition::new("coupon", MethodKind::CouponDisplay));
        let screen = ConversionScreen::new("s").with_method(MethodInstance::new("m1", "coupon"));
        let config = EngineConfig::default();

        let empty = PlaybackScript::hydrate(MacrogameDefinition::default(), None, &catalog());
        let mut state = PlaybackState::new();
        let mut engine = PlaybackEngine::new(&mut state, &empty, &config);
        engine.start().unwrap();
        assert_eq!(engine.end_screen(&methods), Some(EndScreen::NoOfferConfigured));

        let with_screen =
            PlaybackScript::hydrate(MacrogameDefinition::default(), Some(screen.clone()), &catalog());
        let mut state = PlaybackState::new();
        let mut engine = PlaybackEngine::new(&mut state, &with_screen, &config);
        assert_eq!(engine.end_screen(&methods), None);
        engine.start().unwrap();
        let Some(EndScreen::Offers(resolved)) = engine.end_screen(&methods) else {
            panic!("expected offers");
        };
        assert!(resolved.is_unlocked(&"m1".into()));

        let preview = PlaybackScript::hydrate(MacrogameDefinition::default(), Some(screen), &catalog())
            .with_mode(PlaybackMode::MicrogamePreview);
        let mut state = PlaybackState::new();
        let mut engine = PlaybackEngine::new(&mut state, &preview, &config);
        engine.start().unwrap();
        assert_eq!(engine.end_screen(&methods), Some(EndScreen::Replay));
        assert_eq!(
            engine.notify_success(&"m1".into(), &methods),
            Err(PlaybackError::NoConversionScreen)
        );
    }

    #[test]
    fn offer_actions_require_end_screen() {
        let methods = MethodTable::new().with(MethodDefinition::new("coupon", MethodKind::CouponDisplay));
        let screen = ConversionScreen::new("s").with_method(MethodInstance::new("m1", "coupon"));
        let script = PlaybackScript::hydrate(definition(ScreenFlowType::Skip), Some(screen), &catalog());
        let config = EngineConfig::default();
        let mut state = PlaybackState::new();
        let mut engine = PlaybackEngine::new(&mut state, &script, &config);
        engine.start().unwrap();

        assert_eq!(
            engine.notify_success(&"m1".into(), &methods),
            Err(PlaybackError::NotAtEnd {
                view: PlaybackView::Game
            })
        );
        assert!(matches!(engine.redeem_points(0), Err(PlaybackError::NotAtEnd { .. })));
    }

    #[test]
    fn purchase_errors_leave_session_untouched() {
        let methods = MethodTable::new()
            .with(MethodDefinition::new("coupon", MethodKind::CouponDisplay))
            .with(MethodDefinition::new("link", MethodKind::LinkRedirect));
        let screen = ConversionScreen::new("s")
            .with_method(MethodInstance::new("m1", "coupon"))
            .with_method(
                MethodInstance::new("m2", "coupon").with_gate(Gate::on_success("m1", GateVisibility::LockedMask)),
            )
            .with_method(MethodInstance::new("m3", "link").with_gate(Gate::PointPurchase));
        let mut definition = MacrogameDefinition::default();
        definition.point_costs.insert("m3".into(), 50);
        let script = PlaybackScript::hydrate(definition, Some(screen), &catalog());
        let config = EngineConfig::default();
        let mut state = PlaybackState::new();
        state.session.ledger.credit(20);
        let mut engine = PlaybackEngine::new(&mut state, &script, &config);
        engine.start().unwrap();

        assert!(matches!(
            engine.purchase_offer(&"m3".into(), &methods),
            Err(PlaybackError::InsufficientFunds(_))
        ));
        assert!(matches!(
            engine.purchase_offer(&"m2".into(), &methods),
            Err(PlaybackError::NotPurchasable { .. })
        ));
        assert!(matches!(
            engine.purchase_offer(&"zz".into(), &methods),
            Err(PlaybackError::UnknownOffer { .. })
        ));
        assert_eq!(
            engine.notify_success(&"m2".into(), &methods),
            Err(PlaybackError::OfferLocked {
                instance: "m2".into()
            })
        );
        // Already unlocked: nothing to buy.
        assert!(engine.purchase_offer(&"m1".into(), &methods).unwrap().is_empty());

        assert_eq!(engine.state().session().total_score(), 20);
        assert!(engine.state().session().completed().is_empty());
    }

    #[test]
    fn restart_scopes() {
        let script = script(ScreenFlowType::Skip);
        let config = EngineConfig::default();
        let mut state = PlaybackState::new();
        let mut engine = PlaybackEngine::new(&mut state, &script, &config);
        engine.start().unwrap();
        engine.report_event(1, &"win".into()).unwrap();

        let fx = engine.restart(RestartScope::Flow).unwrap();
        assert!(!fx.contains(&PlaybackEffect::SessionReset));
        assert_eq!(engine.state().flow_index(), 0);
        assert_eq!(engine.state().session().total_score(), 10);

        let fx = engine.restart(RestartScope::Session).unwrap();
        assert!(fx.contains(&PlaybackEffect::SessionReset));
        assert_eq!(engine.state().session().total_score(), 0);
        assert_eq!(engine.state().view(), PlaybackView::Game);
    }

    #[test]
    fn teardown_cancels_timer_and_refuses_triggers() {
        let script = script(ScreenFlowType::Separate);
        let config = EngineConfig::default();
        let mut state = PlaybackState::new();
        let mut engine = PlaybackEngine::new(&mut state, &script, &config);
        let id = scheduled(&engine.start().unwrap()).unwrap();

        let fx = engine.teardown();
        assert_eq!(fx, [PlaybackEffect::TimerCancelled { id }, PlaybackEffect::Closed]);
        assert!(engine.teardown().is_empty());
        assert!(engine.timer_elapsed(id).is_empty());
        assert_eq!(engine.click(), Err(PlaybackError::SessionClosed));
        assert_eq!(engine.restart(RestartScope::Flow), Err(PlaybackError::SessionClosed));
        assert_eq!(engine.state().view(), PlaybackView::Title);
    }
}
