//! Runtime orchestration for macrogame playback.
//!
//! This crate hosts a [`macrogame_core::PlaybackEngine`] on a tokio task,
//! turns its timer effects into real deadlines, mounts minigame modules and
//! publishes what happens on a topic-based event bus. Consumers embed
//! [`Runtime`] and drive the session through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - `workers` keeps the playback task internal to the crate
pub mod api;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{
    IdleModule, MinigameModule, ModuleBridge, ModuleFactory, ModuleProps, ModuleRegistry,
    ModuleSignal, Result, RuntimeError, RuntimeHandle, ScriptStep, ScriptedModule,
};
pub use events::{Event, EventBus, OfferEvent, PlaybackEvent, ScoreEvent, Topic};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
