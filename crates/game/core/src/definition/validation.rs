//! Authoring-time invariants of conversion screens.
//!
//! The resolver assumes every gate points at an earlier slot. Loaders call
//! [`validate_screen`] so a definition that breaks this never reaches playback.

use std::collections::BTreeSet;

use super::conversion::ConversionScreen;
use super::ids::InstanceId;
use crate::error::{ErrorSeverity, MacrogameError};

/// Structural problems that make a conversion screen unusable.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScreenValidationError {
    #[error("instance {instance} appears more than once")]
    DuplicateInstance { instance: InstanceId },

    #[error("instance {instance} gates on itself")]
    SelfReference { instance: InstanceId },

    #[error("instance {instance} gates on {target}, which appears later in the list")]
    ForwardReference {
        instance: InstanceId,
        target: InstanceId,
    },
}

impl MacrogameError for ScreenValidationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateInstance { .. } => "SCREEN_DUPLICATE_INSTANCE",
            Self::SelfReference { .. } => "SCREEN_SELF_REFERENCE",
            Self::ForwardReference { .. } => "SCREEN_FORWARD_REFERENCE",
        }
    }
}

/// A gate naming an instance that is not on the screen at all.
///
/// Allowed (the resolver keeps such slots locked), but worth a warning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaleReference {
    pub instance: InstanceId,
    pub target: InstanceId,
}

/// Checks gate ordering and instance uniqueness.
///
/// Returns the stale references found on success.
pub fn validate_screen(
    screen: &ConversionScreen,
) -> Result<Vec<StaleReference>, ScreenValidationError> {
    let all: BTreeSet<&InstanceId> = screen.methods.iter().map(|m| &m.instance_id).collect();
    let mut seen: BTreeSet<&InstanceId> = BTreeSet::new();
    let mut stale = Vec::new();

    for method in &screen.methods {
        let instance = &method.instance_id;
        if let Some(target) = method.gate.prerequisite() {
            if target == instance {
                return Err(ScreenValidationError::SelfReference {
                    instance: instance.clone(),
                });
            }
            if !seen.contains(target) {
                if all.contains(target) {
                    return Err(ScreenValidationError::ForwardReference {
                        instance: instance.clone(),
                        target: target.clone(),
                    });
                }
                stale.push(StaleReference {
                    instance: instance.clone(),
                    target: target.clone(),
                });
            }
        }
        if !seen.insert(instance) {
            return Err(ScreenValidationError::DuplicateInstance {
                instance: instance.clone(),
            });
        }
    }

    Ok(stale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{Gate, GateVisibility, MethodInstance};

    fn gated(id: &str, on: &str) -> MethodInstance {
        MethodInstance::new(id, "coupon").with_gate(Gate::on_success(on, GateVisibility::Hidden))
    }

    #[test]
    fn accepts_backward_reference() {
        let screen = ConversionScreen::new("s")
            .with_method(MethodInstance::new("a", "coupon"))
            .with_method(gated("b", "a"));
        assert_eq!(validate_screen(&screen), Ok(vec![]));
    }

    #[test]
    fn rejects_forward_reference() {
        let screen = ConversionScreen::new("s")
            .with_method(gated("a", "b"))
            .with_method(MethodInstance::new("b", "coupon"));
        assert!(matches!(
            validate_screen(&screen),
            Err(ScreenValidationError::ForwardReference { .. })
        ));
    }

    #[test]
    fn rejects_self_reference() {
        let screen = ConversionScreen::new("s").with_method(gated("a", "a"));
        assert!(matches!(
            validate_screen(&screen),
            Err(ScreenValidationError::SelfReference { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_instance() {
        let screen = ConversionScreen::new("s")
            .with_method(MethodInstance::new("a", "coupon"))
            .with_method(MethodInstance::new("a", "email"));
        assert!(matches!(
            validate_screen(&screen),
            Err(ScreenValidationError::DuplicateInstance { .. })
        ));
    }

    #[test]
    fn reports_stale_reference_without_failing() {
        let screen = ConversionScreen::new("s").with_method(gated("a", "gone"));
        let stale = validate_screen(&screen).unwrap();
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].target, InstanceId::from("gone"));
    }
}
