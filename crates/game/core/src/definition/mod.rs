//! Authored data consumed by playback.
//!
//! Everything here is produced by the definition loader before playback
//! starts and is never mutated afterwards.
mod conversion;
mod ids;
mod macrogame;
mod microgame;
mod validation;

pub use conversion::{
    ConversionScreen, Gate, GateKind, GateVisibility, MethodDefinition, MethodInstance, MethodKind,
};
pub use ids::{
    ConversionScreenId, EventId, InstanceId, MacrogameId, MethodId, MicrogameId, VariantId,
};
pub use macrogame::{
    FlowItem, MacrogameConfig, MacrogameDefinition, ScreenConfig, ScreenFlowType, Spotlight,
};
pub use microgame::{MicrogameInstance, MicrogameMetadata, SkinConfig, TrackableEvent};
pub use validation::{ScreenValidationError, StaleReference, validate_screen};
