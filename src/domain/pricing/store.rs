//! Pricing rule snapshots
//!
//! A [`PricingSnapshot`] is an immutable, validated rule set with exactly
//! one rule per service. [`PricingRuleStore`] holds the current snapshot and
//! swaps it atomically; readers keep whatever `Arc` they were handed.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use super::model::{PricingRule, ServiceKind};
use crate::domain::DomainResult;
use crate::shared::errors::DomainError;

/// Validated rule set, keyed by service
#[derive(Debug, Clone)]
pub struct PricingSnapshot {
    rules: BTreeMap<ServiceKind, PricingRule>,
    loaded_at: DateTime<Utc>,
}

impl PricingSnapshot {
    /// No rules; every lookup fails with `NotFound`.
    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
            loaded_at: Utc::now(),
        }
    }

    /// Build a snapshot, validating every rule.
    ///
    /// Fails with `Conflict` if two rules target the same service.
    pub fn from_rules(rules: impl IntoIterator<Item = PricingRule>) -> DomainResult<Self> {
        let mut by_service = BTreeMap::new();
        for rule in rules {
            rule.validate()?;
            let service = rule.service;
            if by_service.insert(service, rule).is_some() {
                return Err(DomainError::Conflict(format!(
                    "more than one pricing rule for {}",
                    service
                )));
            }
        }
        Ok(Self {
            rules: by_service,
            loaded_at: Utc::now(),
        })
    }

    /// The rule for `service`, or `NotFound` if none is configured.
    pub fn lookup(&self, service: ServiceKind) -> DomainResult<&PricingRule> {
        self.rules
            .get(&service)
            .ok_or_else(|| DomainError::rule_not_found(service))
    }

    /// Rules in service declaration order.
    pub fn rules(&self) -> impl Iterator<Item = &PricingRule> {
        self.rules.values()
    }

    /// Number of configured services.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// When the snapshot was built.
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

impl Default for PricingSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Holder of the current pricing snapshot
pub struct PricingRuleStore {
    current: RwLock<Arc<PricingSnapshot>>,
}

impl PricingRuleStore {
    /// Store starting from `snapshot`.
    pub fn new(snapshot: PricingSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// The snapshot estimations should run against.
    pub fn snapshot(&self) -> Arc<PricingSnapshot> {
        let guard = self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Swap in a new snapshot and return the previous one.
    pub fn replace(&self, snapshot: PricingSnapshot) -> Arc<PricingSnapshot> {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *guard, Arc::new(snapshot))
    }

    /// Owned copy of the current rule for `service`.
    pub fn lookup(&self, service: ServiceKind) -> DomainResult<PricingRule> {
        self.snapshot().lookup(service).cloned()
    }
}

impl Default for PricingRuleStore {
    fn default() -> Self {
        Self::new(PricingSnapshot::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn rule(service: ServiceKind, base_cost: u32) -> PricingRule {
        PricingRule::new(service, base_cost)
    }

    #[test]
    fn lookup_of_unconfigured_service_is_not_found() {
        let snapshot = PricingSnapshot::from_rules([rule(ServiceKind::TextToImage, 4)]).unwrap();
        let err = snapshot.lookup(ServiceKind::ImageToVideo).unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound { entity: "PricingRule", ref value, .. } if value == "image_to_video"
        ));
    }

    #[test]
    fn duplicate_service_is_a_conflict() {
        let result = PricingSnapshot::from_rules([
            rule(ServiceKind::TextToImage, 4),
            rule(ServiceKind::TextToImage, 5),
        ]);
        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[test]
    fn invalid_rule_is_rejected() {
        let bad = rule(ServiceKind::TextToImage, 4).with_resolution("hd", Decimal::ZERO);
        assert!(PricingSnapshot::from_rules([bad]).is_err());
    }

    #[test]
    fn rules_are_ordered_by_service() {
        let snapshot = PricingSnapshot::from_rules([
            rule(ServiceKind::ImageToVideo, 20),
            rule(ServiceKind::ImageEnhancement, 2),
            rule(ServiceKind::TextToVideo, 10),
        ])
        .unwrap();
        let order: Vec<_> = snapshot.rules().map(|r| r.service).collect();
        assert_eq!(
            order,
            vec![
                ServiceKind::ImageEnhancement,
                ServiceKind::TextToVideo,
                ServiceKind::ImageToVideo
            ]
        );
        assert_eq!(snapshot.len(), 3);
    }

    #[test]
    fn replace_does_not_disturb_held_snapshot() {
        let store = PricingRuleStore::new(
            PricingSnapshot::from_rules([rule(ServiceKind::TextToImage, 4)]).unwrap(),
        );
        let held = store.snapshot();

        let previous = store.replace(
            PricingSnapshot::from_rules([rule(ServiceKind::TextToImage, 9)]).unwrap(),
        );

        assert_eq!(held.lookup(ServiceKind::TextToImage).unwrap().base_cost, 4);
        assert_eq!(previous.lookup(ServiceKind::TextToImage).unwrap().base_cost, 4);
        assert_eq!(store.lookup(ServiceKind::TextToImage).unwrap().base_cost, 9);
    }

    #[test]
    fn default_store_is_empty() {
        let store = PricingRuleStore::default();
        assert!(store.snapshot().is_empty());
        assert!(store.lookup(ServiceKind::TextToVideo).is_err());
    }
}
