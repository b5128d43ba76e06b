//! Drives one preview session and prints its events as JSON lines.
use anyhow::{Context, Result};
use client_bootstrap::{ContentSource, DirectoryContentSource, PreviewConfig, RuntimeBuilder};
use macrogame_core::{
    EndScreen, MacrogameDefinition, MicrogameId, MicrogameOracle, MicrogameResult,
    MicrogameTable, PlaybackView,
};
use runtime::{
    Event, IdleModule, MinigameModule, ModuleRegistry, PlaybackEvent, RuntimeHandle,
    ScriptedModule, Topic,
};
use tokio::sync::broadcast::{self, error::RecvError};

/// Simulated play time of each microgame.
const PLAY_MS: u64 = 1_500;

pub struct PreviewApp {
    config: PreviewConfig,
}

impl PreviewApp {
    pub fn new(config: PreviewConfig) -> Self {
        Self { config }
    }

    pub async fn run(self) -> Result<()> {
        let bundle = DirectoryContentSource::from_config(&self.config).load()?;
        let modules = scripted_modules(bundle.microgames.clone());
        let click_through = ClickThrough::from_definition(&bundle.definition);

        let setup = RuntimeBuilder::new(self.config)
            .content_source(bundle)
            .modules(modules)
            .build()
            .await?;
        let handle = setup.runtime.handle();

        let mut receivers = handle.subscribe_multiple(&Topic::ALL);
        let (Some(playback), Some(score), Some(offers)) = (
            receivers.remove(&Topic::Playback),
            receivers.remove(&Topic::Score),
            receivers.remove(&Topic::Offers),
        ) else {
            anyhow::bail!("event bus did not provide every topic");
        };

        handle.start().await?;
        let outcome = drive(&handle, click_through, playback, score, offers).await;

        setup.runtime.shutdown().await?;
        let end_screen = outcome?;

        tracing::info!(
            target: "preview",
            end_screen = end_screen_label(end_screen.as_ref()),
            "preview finished"
        );
        Ok(())
    }
}

/// Plays every microgame with a module that reports its first trackable
/// event and wins. Microgames without events just idle until the timer.
fn scripted_modules(catalog: MicrogameTable) -> ModuleRegistry {
    ModuleRegistry::new().with_fallback(move |microgame: &MicrogameId| {
        match catalog
            .microgame(microgame)
            .and_then(|metadata| metadata.trackable_events.first())
        {
            Some(event) => Box::new(ScriptedModule::single_event(
                event.event_id.clone(),
                MicrogameResult::WIN,
                PLAY_MS,
            )) as Box<dyn MinigameModule>,
            None => Box::new(IdleModule) as Box<dyn MinigameModule>,
        }
    })
}

/// Screens that wait for a click instead of advancing on their own timer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct ClickThrough {
    intro: bool,
    promo: bool,
}

impl ClickThrough {
    fn from_definition(definition: &MacrogameDefinition) -> Self {
        Self {
            intro: definition.intro_screen.click_to_continue,
            promo: definition.promo_screen.click_to_continue,
        }
    }

    fn waits_on(&self, view: PlaybackView) -> bool {
        match view {
            PlaybackView::Intro => self.intro,
            PlaybackView::Promo => self.promo,
            _ => false,
        }
    }
}

/// Prints events until the session reaches `End`, clicking through any
/// screen that waits for the player.
async fn drive(
    handle: &RuntimeHandle,
    click_through: ClickThrough,
    mut playback: broadcast::Receiver<Event>,
    mut score: broadcast::Receiver<Event>,
    mut offers: broadcast::Receiver<Event>,
) -> Result<Option<EndScreen>> {
    loop {
        let received = tokio::select! {
            event = playback.recv() => event,
            event = score.recv() => event,
            event = offers.recv() => event,
        };

        let event = match received {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(target: "preview", skipped, "event stream lagged");
                continue;
            }
            Err(RecvError::Closed) => anyhow::bail!("runtime closed the event stream"),
        };

        println!(
            "{}",
            serde_json::to_string(&event).context("Failed to encode event")?
        );

        match event {
            Event::Playback(PlaybackEvent::ViewChanged { view, .. })
                if click_through.waits_on(view) =>
            {
                handle.click().await?;
            }
            Event::Playback(PlaybackEvent::ViewChanged {
                view: PlaybackView::End,
                ..
            }) => {
                let end_screen = handle.end_screen().await?;
                println!(
                    "{}",
                    serde_json::to_string(&end_screen).context("Failed to encode end screen")?
                );
                return Ok(end_screen);
            }
            Event::Playback(PlaybackEvent::Closed) => return Ok(None),
            _ => {}
        }
    }
}

fn end_screen_label(end_screen: Option<&EndScreen>) -> &'static str {
    match end_screen {
        Some(EndScreen::Offers(_)) => "offers",
        Some(EndScreen::NoOfferConfigured) => "no_offer_configured",
        Some(EndScreen::Replay) => "replay",
        None => "none",
    }
}
