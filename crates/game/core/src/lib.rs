//! Deterministic macrogame playback rules shared by every host.
//!
//! `macrogame-core` defines the authored data model, the score ledger, the
//! gating resolver for conversion screens and the playback state machine.
//! Nothing here performs I/O or reads a clock: all state mutation flows
//! through [`playback::PlaybackEngine`], which returns effects for the host
//! (timers to arm, modules to mount, events to publish).
pub mod config;
pub mod definition;
pub mod env;
pub mod error;
pub mod gating;
pub mod ledger;
pub mod playback;
pub mod session;

pub use config::EngineConfig;
pub use definition::{
    ConversionScreen, ConversionScreenId, EventId, FlowItem, Gate, GateKind, GateVisibility,
    InstanceId, MacrogameConfig, MacrogameDefinition, MacrogameId, MethodDefinition, MethodId,
    MethodInstance, MethodKind, MicrogameId, MicrogameInstance, MicrogameMetadata, ScreenConfig,
    ScreenFlowType, ScreenValidationError, SkinConfig, Spotlight, StaleReference,
    TrackableEvent, VariantId, validate_screen,
};
pub use env::{MethodOracle, MethodTable, MicrogameOracle, MicrogameTable};
pub use error::{ErrorSeverity, MacrogameError};
pub use gating::{ResolvedOffer, ResolvedScreen, resolve};
pub use ledger::{InsufficientFunds, Points, ScoreLedger};
pub use playback::{
    EndScreen, MicrogameResult, PlaybackEffect, PlaybackEngine, PlaybackError, PlaybackMode,
    PlaybackScript, PlaybackSnapshot, PlaybackState, PlaybackView, RestartScope, SkipReason,
    SkippedItem, TimerId, TimerPurpose,
};
pub use session::{ItemResult, SessionState};
