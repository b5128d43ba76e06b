//! Gating resolver for conversion screens.
//!
//! [`resolve`] is a pure function of the screen, the completion set, the
//! balance and the price list. It holds no state and performs no I/O, so two
//! calls with the same inputs always agree.
//!
//! Per method instance, in list order:
//! 1. completed instances are unlocked and visible whatever their gate;
//! 2. otherwise the gate decides: `None` is open, `OnSuccess` opens once its
//!    prerequisite has succeeded and is otherwise locked (shown or hidden per
//!    its visibility), point gates stay locked with a price until bought;
//! 3. instances whose method no longer exists in the catalog are dropped.

use std::collections::{BTreeMap, BTreeSet};

use crate::definition::{
    ConversionScreen, ConversionScreenId, Gate, GateKind, GateVisibility, InstanceId,
    MethodId, MethodKind,
};
use crate::env::MethodOracle;
use crate::ledger::Points;

/// Resolved lock/visibility state of one offer slot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedOffer {
    pub instance_id: InstanceId,
    pub method_id: MethodId,
    pub method_kind: MethodKind,
    pub gate: GateKind,
    pub locked: bool,
    pub visible: bool,
    /// Price of a locked point-gated slot.
    pub cost: Option<Points>,
    /// Whether the purchase call to action is enabled (`balance >= cost`).
    pub affordable: bool,
    pub content_above: Option<String>,
    pub content_below: Option<String>,
}

impl ResolvedOffer {
    /// Locked and clickable right now.
    pub fn is_purchasable(&self) -> bool {
        self.locked && self.cost.is_some() && self.affordable
    }
}

/// Resolver output, in screen order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedScreen {
    pub screen_id: ConversionScreenId,
    pub title: Option<String>,
    pub offers: Vec<ResolvedOffer>,
}

impl ResolvedScreen {
    pub fn get(&self, instance: &InstanceId) -> Option<&ResolvedOffer> {
        self.offers.iter().find(|offer| &offer.instance_id == instance)
    }

    /// Offers that appear in the rendered list (unlocked or placeholder).
    pub fn visible(&self) -> impl Iterator<Item = &ResolvedOffer> {
        self.offers.iter().filter(|offer| offer.visible)
    }

    pub fn is_unlocked(&self, instance: &InstanceId) -> bool {
        self.get(instance).is_some_and(|offer| !offer.locked)
    }
}

/// Resolves every slot of `screen`.
pub fn resolve<M>(
    screen: &ConversionScreen,
    completed: &BTreeSet<InstanceId>,
    balance: Points,
    prices: &BTreeMap<InstanceId, Points>,
    methods: &M,
) -> ResolvedScreen
where
    M: MethodOracle + ?Sized,
{
    let offers = screen
        .methods
        .iter()
        .filter_map(|instance| {
            let method = methods.method(&instance.method_id)?;

            let (locked, visible, cost) = if completed.contains(&instance.instance_id) {
                (false, true, None)
            } else {
                match &instance.gate {
                    Gate::None => (false, true, None),
                    Gate::OnSuccess {
                        method_instance_id,
                        visibility,
                        ..
                    } => {
                        // A prerequisite missing from the screen can never succeed.
                        let satisfied = screen.instance(method_instance_id).is_some()
                            && completed.contains(method_instance_id);
                        match (satisfied, visibility) {
                            (true, _) => (false, true, None),
                            (false, GateVisibility::Hidden) => (true, false, None),
                            (false, GateVisibility::LockedMask) => (true, true, None),
                        }
                    }
                    Gate::PointThreshold | Gate::PointPurchase => {
                        let cost = prices.get(&instance.instance_id).copied().unwrap_or(0);
                        (true, true, Some(cost))
                    }
                }
            };

            Some(ResolvedOffer {
                instance_id: instance.instance_id.clone(),
                method_id: instance.method_id.clone(),
                method_kind: method.kind,
                gate: instance.gate.kind(),
                locked,
                visible,
                cost,
                affordable: cost.is_some_and(|cost| balance >= cost),
                content_above: instance.content_above.clone(),
                content_below: instance.content_below.clone(),
            })
        })
        .collect();

    ResolvedScreen {
        screen_id: screen.id.clone(),
        title: screen.title.clone(),
        offers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{MethodDefinition, MethodInstance};
    use crate::env::MethodTable;

    fn methods() -> MethodTable {
        MethodTable::new()
            .with(MethodDefinition::new("coupon", MethodKind::CouponDisplay))
            .with(MethodDefinition::new("email", MethodKind::EmailCapture))
            .with(MethodDefinition::new("link", MethodKind::LinkRedirect))
    }

    fn completed(ids: &[&str]) -> BTreeSet<InstanceId> {
        ids.iter().map(|id| InstanceId::from(*id)).collect()
    }

    fn prices(entries: &[(&str, Points)]) -> BTreeMap<InstanceId, Points> {
        entries
            .iter()
            .map(|(id, cost)| (InstanceId::from(*id), *cost))
            .collect()
    }

    #[test]
    fn ungated_offer_is_open() {
        let screen = ConversionScreen::new("s").with_method(MethodInstance::new("m1", "coupon"));
        let resolved = resolve(&screen, &completed(&[]), 0, &prices(&[]), &methods());
        let offer = resolved.get(&"m1".into()).unwrap();
        assert!(!offer.locked);
        assert!(offer.visible);
        assert_eq!(offer.cost, None);
        assert_eq!(offer.method_kind, MethodKind::CouponDisplay);
    }

    #[test]
    fn hidden_prerequisite_gate_removes_offer_from_visible_set() {
        let screen = ConversionScreen::new("s")
            .with_method(MethodInstance::new("m1", "coupon"))
            .with_method(
                MethodInstance::new("m2", "email")
                    .with_gate(Gate::on_success("m1", GateVisibility::Hidden)),
            );
        let resolved = resolve(&screen, &completed(&[]), 0, &prices(&[]), &methods());
        let m2 = resolved.get(&"m2".into()).unwrap();
        assert!(m2.locked);
        assert!(!m2.visible);
        assert!(resolved.visible().all(|offer| offer.instance_id.as_str() != "m2"));
    }

    #[test]
    fn masked_prerequisite_gate_shows_locked_placeholder() {
        let screen = ConversionScreen::new("s")
            .with_method(MethodInstance::new("m1", "coupon"))
            .with_method(
                MethodInstance::new("m2", "email")
                    .with_gate(Gate::on_success("m1", GateVisibility::LockedMask)),
            );
        let resolved = resolve(&screen, &completed(&[]), 0, &prices(&[]), &methods());
        let m2 = resolved.get(&"m2".into()).unwrap();
        assert!(m2.locked);
        assert!(m2.visible);
    }

    #[test]
    fn prerequisite_success_unlocks_dependent() {
        let screen = ConversionScreen::new("s")
            .with_method(MethodInstance::new("m1", "coupon"))
            .with_method(
                MethodInstance::new("m2", "email")
                    .with_gate(Gate::on_success("m1", GateVisibility::Hidden)),
            );
        let resolved = resolve(&screen, &completed(&["m1"]), 0, &prices(&[]), &methods());
        assert!(resolved.is_unlocked(&"m1".into()));
        let m2 = resolved.get(&"m2".into()).unwrap();
        assert!(!m2.locked);
        assert!(m2.visible);
    }

    #[test]
    fn affordability_tracks_balance() {
        let screen = ConversionScreen::new("s")
            .with_method(MethodInstance::new("m3", "link").with_gate(Gate::PointPurchase));
        let price_list = prices(&[("m3", 100)]);

        let poor = resolve(&screen, &completed(&[]), 99, &price_list, &methods());
        let offer = poor.get(&"m3".into()).unwrap();
        assert!(offer.locked && offer.visible);
        assert_eq!(offer.cost, Some(100));
        assert!(!offer.affordable);

        let rich = resolve(&screen, &completed(&[]), 100, &price_list, &methods());
        let offer = rich.get(&"m3".into()).unwrap();
        assert!(offer.locked);
        assert!(offer.is_purchasable());

        let bought = resolve(&screen, &completed(&["m3"]), 0, &price_list, &methods());
        let offer = bought.get(&"m3".into()).unwrap();
        assert!(!offer.locked);
        assert_eq!(offer.cost, None);
    }

    #[test]
    fn missing_price_defaults_to_zero() {
        let screen = ConversionScreen::new("s")
            .with_method(MethodInstance::new("m3", "link").with_gate(Gate::PointThreshold));
        let resolved = resolve(&screen, &completed(&[]), 0, &prices(&[]), &methods());
        let offer = resolved.get(&"m3".into()).unwrap();
        assert_eq!(offer.cost, Some(0));
        assert!(offer.is_purchasable());
    }

    #[test]
    fn unknown_method_is_dropped() {
        let screen = ConversionScreen::new("s")
            .with_method(MethodInstance::new("m1", "coupon"))
            .with_method(MethodInstance::new("m2", "deleted"));
        let resolved = resolve(&screen, &completed(&[]), 0, &prices(&[]), &methods());
        assert_eq!(resolved.offers.len(), 1);
        assert!(resolved.get(&"m2".into()).is_none());
    }

    #[test]
    fn stale_prerequisite_stays_locked() {
        let screen = ConversionScreen::new("s").with_method(
            MethodInstance::new("m2", "email")
                .with_gate(Gate::on_success("gone", GateVisibility::LockedMask)),
        );
        let resolved = resolve(&screen, &completed(&["gone"]), 500, &prices(&[]), &methods());
        let offer = resolved.get(&"m2".into()).unwrap();
        assert!(offer.locked);
        assert!(offer.visible);
    }

    #[test]
    fn completed_overrides_every_gate() {
        let screen = ConversionScreen::new("s")
            .with_method(
                MethodInstance::new("a", "coupon")
                    .with_gate(Gate::on_success("x", GateVisibility::Hidden)),
            )
            .with_method(MethodInstance::new("b", "link").with_gate(Gate::PointPurchase));
        let resolved = resolve(&screen, &completed(&["a", "b"]), 0, &prices(&[("b", 9)]), &methods());
        assert!(resolved.offers.iter().all(|offer| !offer.locked && offer.visible));
    }

    #[test]
    fn resolve_is_idempotent_and_ordered() {
        let screen = ConversionScreen::new("s")
            .with_method(MethodInstance::new("z", "coupon"))
            .with_method(MethodInstance::new("a", "link").with_gate(Gate::PointPurchase))
            .with_method(MethodInstance::new("m", "email"));
        let done = completed(&["m"]);
        let price_list = prices(&[("a", 3)]);
        let first = resolve(&screen, &done, 7, &price_list, &methods());
        let second = resolve(&screen, &done, 7, &price_list, &methods());
        assert_eq!(first, second);
        let order: Vec<&str> = first.offers.iter().map(|o| o.instance_id.as_str()).collect();
        assert_eq!(order, ["z", "a", "m"]);
    }
}
