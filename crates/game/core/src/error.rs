//! Common error infrastructure for macrogame-core.
//!
//! Domain-specific errors (e.g., [`InsufficientFunds`](crate::ledger::InsufficientFunds),
//! [`PlaybackError`](crate::playback::PlaybackError)) are defined next to the
//! operations that produce them. This module holds the shared classification
//! used by the runtime to pick log levels and recovery strategies.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Rejected**: the trigger was refused and state is unchanged; the caller may retry later
/// - **Validation**: invalid input (unknown ids, wrong gate kind), should not be retried as-is
/// - **Closed**: the session has been torn down and accepts no further triggers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Refused without mutation.
    ///
    /// Examples: not enough points, redeem requested before the end screen
    Rejected,

    /// Invalid input, should not retry without changes.
    ///
    /// Examples: unknown offer instance, purchasing an offer that is not point gated
    Validation,

    /// Session is gone.
    Closed,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rejected => "rejected",
            Self::Validation => "validation",
            Self::Closed => "closed",
        }
    }

    /// Returns true if retrying the same trigger later may succeed.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Rejected)
    }
}

/// Common trait for all macrogame-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Keep `error_code` stable; it is used in events and tests
pub trait MacrogameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
