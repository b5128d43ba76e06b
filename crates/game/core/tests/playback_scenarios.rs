use macrogame_core::{
    ConversionScreen, EndScreen, EngineConfig, FlowItem, Gate, GateVisibility, MacrogameConfig,
    MacrogameDefinition, MethodDefinition, MethodInstance, MethodKind, MethodTable,
    MicrogameMetadata, MicrogameResult, MicrogameTable, PlaybackEffect, PlaybackEngine,
    PlaybackScript, PlaybackState, PlaybackView, RestartScope, ScreenConfig, ScreenFlowType,
    TimerId,
};

fn catalog() -> MicrogameTable {
    MicrogameTable::new()
        .with(MicrogameMetadata::new("catch").with_event("win", 10).with_event("combo", 2))
        .with(MicrogameMetadata::new("dodge").with_event("win", 10))
}

fn methods() -> MethodTable {
    MethodTable::new()
        .with(MethodDefinition::new("coupon", MethodKind::CouponDisplay))
        .with(MethodDefinition::new("email", MethodKind::EmailCapture))
        .with(MethodDefinition::new("link", MethodKind::LinkRedirect))
}

fn conversion_screen() -> ConversionScreen {
    ConversionScreen::new("offers")
        .with_method(MethodInstance::new("M1", "coupon"))
        .with_method(
            MethodInstance::new("M2", "email").with_gate(Gate::on_success("M1", GateVisibility::Hidden)),
        )
        .with_method(MethodInstance::new("M3", "link").with_gate(Gate::PointPurchase))
}

fn definition(flow_type: ScreenFlowType) -> MacrogameDefinition {
    let mut definition = MacrogameDefinition {
        id: "summer".into(),
        name: "Summer Promo".into(),
        flow: vec![FlowItem::new("catch"), FlowItem::new("dodge")],
        config: MacrogameConfig {
            screen_flow_type: flow_type,
            ..MacrogameConfig::default()
        },
        conversion_screen_id: Some("offers".into()),
        ..MacrogameDefinition::default()
    };
    definition.point_costs.insert("M3".into(), 15);
    definition
}

fn last_timer(fx: &[PlaybackEffect]) -> Option<TimerId> {
    fx.iter().rev().find_map(|effect| match effect {
        PlaybackEffect::TimerScheduled { id, .. } => Some(*id),
        _ => None,
    })
}

fn entered(fx: &[PlaybackEffect]) -> Vec<PlaybackView> {
    fx.iter()
        .filter_map(|effect| match effect {
            PlaybackEffect::ViewEntered { view, .. } => Some(*view),
            _ => None,
        })
        .collect()
}

/// Drives a session with every module winning and reporting `win` once.
/// Returns the sequence of views entered.
fn play_through(engine: &mut PlaybackEngine<'_>) -> Vec<PlaybackView> {
    let mut trace = Vec::new();
    let mut fx = engine.start().expect("start");

    loop {
        trace.extend(entered(&fx));
        let launched = fx.iter().find_map(|effect| match effect {
            PlaybackEffect::MicrogameLaunched { play_id, .. } => Some(*play_id),
            _ => None,
        });

        fx = if let Some(play_id) = launched {
            engine.interaction(play_id).expect("interaction");
            engine.report_event(play_id, &"win".into()).expect("event");
            engine.end_game(play_id, MicrogameResult::WIN).expect("end")
        } else if let Some(id) = last_timer(&fx) {
            engine.timer_elapsed(id)
        } else if engine.state().view().accepts_click() {
            engine.click().expect("click")
        } else {
            break;
        };
    }
    trace
}

/// End-to-end scenario: two microgames worth 10 points each, then a
/// conversion screen with an ungated coupon, an email capture hidden behind
/// it and a link bought for 15 points.
#[test]
fn full_session_unlocks_and_buys_offers() {
    let script = PlaybackScript::hydrate(
        definition(ScreenFlowType::Separate),
        Some(conversion_screen()),
        &catalog(),
    );
    let config = EngineConfig::default();
    let methods = methods();
    let mut state = PlaybackState::new();
    let mut engine = PlaybackEngine::new(&mut state, &script, &config);

    // ================================================================
    // PHASE 1: Play the flow
    // ================================================================
    let trace = play_through(&mut engine);
    assert_eq!(
        trace,
        [
            PlaybackView::Title,
            PlaybackView::Controls,
            PlaybackView::Game,
            PlaybackView::Result,
            PlaybackView::Title,
            PlaybackView::Controls,
            PlaybackView::Game,
            PlaybackView::Result,
            PlaybackView::End,
        ]
    );
    assert_eq!(engine.state().session().total_score(), 20);
    assert_eq!(engine.state().session().results().len(), 2);

    // ================================================================
    // PHASE 2: Initial end screen
    // ================================================================
    let Some(EndScreen::Offers(screen)) = engine.end_screen(&methods) else {
        panic!("expected conversion screen");
    };
    let visible: Vec<&str> = screen.visible().map(|o| o.instance_id.as_str()).collect();
    assert_eq!(visible, ["M1", "M3"]);
    let m3 = screen.get(&"M3".into()).expect("M3 resolved");
    assert!(m3.locked && m3.affordable);
    assert_eq!(m3.cost, Some(15));

    // ================================================================
    // PHASE 3: Complete M1, M2 appears
    // ================================================================
    let fx = engine.notify_success(&"M1".into(), &methods).expect("notify");
    assert_eq!(
        fx,
        [PlaybackEffect::OfferCompleted {
            instance_id: "M1".into()
        }]
    );
    let screen = engine.resolve_offers(&methods).expect("screen");
    assert!(screen.is_unlocked(&"M2".into()));
    assert!(screen.get(&"M2".into()).is_some_and(|o| o.visible));

    // ================================================================
    // PHASE 4: Buy M3
    // ================================================================
    let fx = engine.purchase_offer(&"M3".into(), &methods).expect("purchase");
    assert!(fx.contains(&PlaybackEffect::PointsDebited {
        amount: 15,
        total: 5
    }));
    assert_eq!(engine.state().session().total_score(), 5);

    let screen = engine.resolve_offers(&methods).expect("screen");
    assert!(screen.offers.iter().all(|offer| !offer.locked));

    // A second purchase is a no-op and costs nothing.
    assert!(engine.purchase_offer(&"M3".into(), &methods).unwrap().is_empty());
    assert_eq!(engine.state().session().total_score(), 5);
}

#[test]
fn every_flow_type_plays_the_same_items_and_score() {
    for flow_type in [
        ScreenFlowType::Separate,
        ScreenFlowType::Combined,
        ScreenFlowType::Skip,
        ScreenFlowType::Overlay,
    ] {
        let script = PlaybackScript::hydrate(definition(flow_type), None, &catalog());
        let config = EngineConfig::default();
        let mut state = PlaybackState::new();
        let mut engine = PlaybackEngine::new(&mut state, &script, &config);

        let trace = play_through(&mut engine);
        let games = trace.iter().filter(|view| **view == PlaybackView::Game).count();
        assert_eq!(games, 2, "{flow_type}");
        assert_eq!(trace.last(), Some(&PlaybackView::End), "{flow_type}");
        assert_eq!(engine.state().session().total_score(), 20, "{flow_type}");
        assert!(!engine.state().is_overlay_visible(), "{flow_type}");

        let expect_title = flow_type == ScreenFlowType::Separate;
        let expect_combined = flow_type == ScreenFlowType::Combined;
        assert_eq!(trace.contains(&PlaybackView::Title), expect_title, "{flow_type}");
        assert_eq!(trace.contains(&PlaybackView::Combined), expect_combined, "{flow_type}");
    }
}

/// Timer delays scheduled from `start` until the first game launches.
fn pre_game_delays(flow_type: ScreenFlowType) -> Vec<u64> {
    let script = PlaybackScript::hydrate(definition(flow_type), None, &catalog());
    let config = EngineConfig::default();
    let mut state = PlaybackState::new();
    let mut engine = PlaybackEngine::new(&mut state, &script, &config);

    let mut delays = Vec::new();
    let mut fx = engine.start().expect("start");
    loop {
        let mut pending = None;
        for effect in &fx {
            if let PlaybackEffect::TimerScheduled { id, delay_ms } = effect {
                delays.push(*delay_ms);
                pending = Some(*id);
            }
        }
        if fx
            .iter()
            .any(|effect| matches!(effect, PlaybackEffect::MicrogameLaunched { .. }))
        {
            return delays;
        }
        let id = pending.expect("pre-game screen arms a timer");
        fx = engine.timer_elapsed(id);
    }
}

#[test]
fn combined_screen_lasts_as_long_as_title_and_controls() {
    let config = definition(ScreenFlowType::Separate).config;
    let title = config.title_screen_duration_ms;
    let controls = config.controls_screen_duration_ms;

    assert_eq!(pre_game_delays(ScreenFlowType::Separate), [title, controls]);
    assert_eq!(pre_game_delays(ScreenFlowType::Combined), [title + controls]);
    assert_eq!(pre_game_delays(ScreenFlowType::Skip), Vec::<u64>::new());
}

#[test]
fn click_beats_intro_timer_and_late_timer_is_ignored() {
    let mut definition = definition(ScreenFlowType::Skip);
    definition.intro_screen = ScreenConfig::timed(4);
    let script = PlaybackScript::hydrate(definition, None, &catalog());
    let config = EngineConfig::default();
    let mut state = PlaybackState::new();
    let mut engine = PlaybackEngine::new(&mut state, &script, &config);

    let fx = engine.start().unwrap();
    assert_eq!(entered(&fx), [PlaybackView::Intro]);
    let intro_timer = last_timer(&fx).unwrap();
    assert!(fx.contains(&PlaybackEffect::TimerScheduled {
        id: intro_timer,
        delay_ms: 4_000
    }));

    let fx = engine.click().unwrap();
    assert!(fx.contains(&PlaybackEffect::TimerCancelled { id: intro_timer }));
    assert_eq!(entered(&fx), [PlaybackView::Game]);

    // The timer still fires on the host side; it must not advance again.
    assert!(engine.timer_elapsed(intro_timer).is_empty());
    assert_eq!(engine.state().view(), PlaybackView::Game);
    assert_eq!(engine.state().flow_index(), 0);
}

#[test]
fn promo_screen_precedes_end() {
    let mut definition = definition(ScreenFlowType::Skip);
    definition.promo_screen = ScreenConfig::click_through();
    let script = PlaybackScript::hydrate(definition, None, &catalog());
    let config = EngineConfig::default();
    let mut state = PlaybackState::new();
    let mut engine = PlaybackEngine::new(&mut state, &script, &config);

    let trace = play_through(&mut engine);
    assert_eq!(&trace[trace.len() - 2..], [PlaybackView::Promo, PlaybackView::End]);
}

#[test]
fn missing_microgame_is_skipped_without_failing() {
    let mut definition = definition(ScreenFlowType::Skip);
    definition.flow.insert(1, FlowItem::new("deleted"));
    let script = PlaybackScript::hydrate(definition, None, &catalog());
    assert_eq!(script.items.len(), 2);
    assert_eq!(script.skipped.len(), 1);

    let config = EngineConfig::default();
    let mut state = PlaybackState::new();
    let mut engine = PlaybackEngine::new(&mut state, &script, &config);
    let trace = play_through(&mut engine);
    assert_eq!(trace.iter().filter(|view| **view == PlaybackView::Game).count(), 2);
}

#[test]
fn completion_survives_flow_restart_but_not_session_restart() {
    let script = PlaybackScript::hydrate(
        definition(ScreenFlowType::Skip),
        Some(conversion_screen()),
        &catalog(),
    );
    let config = EngineConfig::default();
    let methods = methods();
    let mut state = PlaybackState::new();
    let mut engine = PlaybackEngine::new(&mut state, &script, &config);

    play_through(&mut engine);
    engine.notify_success(&"M1".into(), &methods).unwrap();
    // Completing twice keeps a single entry.
    assert!(engine.notify_success(&"M1".into(), &methods).unwrap().is_empty());

    engine.restart(RestartScope::Flow).unwrap();
    assert_eq!(engine.state().view(), PlaybackView::Game);
    assert!(engine.state().session().is_completed(&"M1".into()));
    assert_eq!(engine.state().session().total_score(), 20);

    engine.restart(RestartScope::Session).unwrap();
    assert!(engine.state().session().completed().is_empty());
    assert_eq!(engine.state().session().total_score(), 0);
}

#[test]
fn redeem_points_never_goes_negative() {
    let script = PlaybackScript::hydrate(definition(ScreenFlowType::Skip), None, &catalog());
    let config = EngineConfig::default();
    let mut state = PlaybackState::new();
    let mut engine = PlaybackEngine::new(&mut state, &script, &config);
    play_through(&mut engine);

    assert!(engine.redeem_points(21).is_err());
    assert_eq!(engine.state().session().total_score(), 20);
    assert_eq!(
        engine.redeem_points(20).unwrap(),
        [PlaybackEffect::PointsDebited {
            amount: 20,
            total: 0
        }]
    );
}

#[test]
fn teardown_mid_result_leaves_nothing_pending() {
    let script = PlaybackScript::hydrate(definition(ScreenFlowType::Skip), None, &catalog());
    let config = EngineConfig::default();
    let mut state = PlaybackState::new();
    let mut engine = PlaybackEngine::new(&mut state, &script, &config);
    engine.start().unwrap();
    let fx = engine.end_game(1, MicrogameResult::LOSE).unwrap();
    let result_timer = last_timer(&fx).unwrap();

    let fx = engine.teardown();
    assert!(fx.contains(&PlaybackEffect::TimerCancelled { id: result_timer }));
    assert!(engine.timer_elapsed(result_timer).is_empty());
    assert!(engine.report_event(1, &"win".into()).is_err());
    assert!(engine.snapshot().closed);
    assert!(engine.snapshot().pending_timer.is_none());
    assert_eq!(engine.state().view(), PlaybackView::Result);
}
