//! Errors surfaced by playback triggers.
//!
//! Triggers that simply do not apply to the current view (a click on a game,
//! a stale timer, an event from an unmounted module) are not errors; they
//! yield no effects.

use super::view::PlaybackView;
use crate::definition::{GateKind, InstanceId};
use crate::error::{ErrorSeverity, MacrogameError};
use crate::ledger::InsufficientFunds;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlaybackError {
    #[error("playback session has been torn down")]
    SessionClosed,

    #[error("playback has already started")]
    AlreadyStarted,

    #[error("operation is only available on the end screen (current view: {view})")]
    NotAtEnd { view: PlaybackView },

    #[error("no conversion screen is configured")]
    NoConversionScreen,

    #[error("offer {instance} is not on the conversion screen")]
    UnknownOffer { instance: InstanceId },

    #[error("offer {instance} is gated by {gate} and cannot be bought with points")]
    NotPurchasable { instance: InstanceId, gate: GateKind },

    #[error("offer {instance} is still locked")]
    OfferLocked { instance: InstanceId },

    #[error(transparent)]
    InsufficientFunds(#[from] InsufficientFunds),
}

impl MacrogameError for PlaybackError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SessionClosed => ErrorSeverity::Closed,
            Self::AlreadyStarted
            | Self::NotAtEnd { .. }
            | Self::OfferLocked { .. }
            | Self::InsufficientFunds(_) => ErrorSeverity::Rejected,
            Self::NoConversionScreen | Self::UnknownOffer { .. } | Self::NotPurchasable { .. } => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SessionClosed => "SESSION_CLOSED",
            Self::AlreadyStarted => "ALREADY_STARTED",
            Self::NotAtEnd { .. } => "NOT_AT_END",
            Self::NoConversionScreen => "NO_CONVERSION_SCREEN",
            Self::UnknownOffer { .. } => "UNKNOWN_OFFER",
            Self::NotPurchasable { .. } => "NOT_PURCHASABLE",
            Self::OfferLocked { .. } => "OFFER_LOCKED",
            Self::InsufficientFunds(inner) => inner.error_code(),
        }
    }
}
