use super::ids::{ConversionScreenId, InstanceId, MethodId};

/// Terminal reward screen: an ordered list of offer slots.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConversionScreen {
    pub id: ConversionScreenId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub title: Option<String>,
    pub methods: Vec<MethodInstance>,
}

impl ConversionScreen {
    pub fn new(id: impl Into<ConversionScreenId>) -> Self {
        Self {
            id: id.into(),
            title: None,
            methods: Vec::new(),
        }
    }

    pub fn with_method(mut self, method: MethodInstance) -> Self {
        self.methods.push(method);
        self
    }

    pub fn instance(&self, instance_id: &InstanceId) -> Option<&MethodInstance> {
        self.methods
            .iter()
            .find(|method| &method.instance_id == instance_id)
    }
}

/// One offer slot on a conversion screen.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MethodInstance {
    pub instance_id: InstanceId,
    pub method_id: MethodId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub gate: Gate,
    #[cfg_attr(feature = "serde", serde(default))]
    pub content_above: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub content_below: Option<String>,
}

impl MethodInstance {
    pub fn new(instance_id: impl Into<InstanceId>, method_id: impl Into<MethodId>) -> Self {
        Self {
            instance_id: instance_id.into(),
            method_id: method_id.into(),
            gate: Gate::None,
            content_above: None,
            content_below: None,
        }
    }

    pub fn with_gate(mut self, gate: Gate) -> Self {
        self.gate = gate;
        self
    }
}

/// Unlock condition of an offer slot.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gate {
    /// Always visible, never locked.
    #[default]
    None,
    /// Locked until the referenced (earlier) instance has succeeded.
    OnSuccess {
        method_instance_id: InstanceId,
        visibility: GateVisibility,
        /// Authoring flag without runtime semantics; carried for round-tripping only.
        #[cfg_attr(feature = "serde", serde(default))]
        replace_prerequisite: bool,
    },
    /// Locked until redeemed with points (`point_costs[instance]`).
    PointThreshold,
    /// Locked until bought with points (`point_costs[instance]`).
    PointPurchase,
}

impl Gate {
    pub fn on_success(method_instance_id: impl Into<InstanceId>, visibility: GateVisibility) -> Self {
        Self::OnSuccess {
            method_instance_id: method_instance_id.into(),
            visibility,
            replace_prerequisite: false,
        }
    }

    pub fn kind(&self) -> GateKind {
        match self {
            Self::None => GateKind::None,
            Self::OnSuccess { .. } => GateKind::OnSuccess,
            Self::PointThreshold => GateKind::PointThreshold,
            Self::PointPurchase => GateKind::PointPurchase,
        }
    }

    /// Instance this gate waits on, if any.
    pub fn prerequisite(&self) -> Option<&InstanceId> {
        match self {
            Self::OnSuccess {
                method_instance_id, ..
            } => Some(method_instance_id),
            Self::None | Self::PointThreshold | Self::PointPurchase => None,
        }
    }
}

/// Payload-free discriminant of [`Gate`], used in resolved offers and events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum GateKind {
    None,
    OnSuccess,
    PointThreshold,
    PointPurchase,
}

/// How a locked `on_success` slot is presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GateVisibility {
    /// Entirely absent from the rendered list.
    #[default]
    Hidden,
    /// Shown as a locked placeholder.
    LockedMask,
}

/// Catalog record for a conversion method.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MethodDefinition {
    pub id: MethodId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub kind: MethodKind,
}

impl MethodDefinition {
    pub fn new(id: impl Into<MethodId>, kind: MethodKind) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            kind,
        }
    }
}

/// Reward renderer key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum MethodKind {
    CouponDisplay,
    EmailCapture,
    LinkRedirect,
    FormSubmit,
    SocialFollow,
}
