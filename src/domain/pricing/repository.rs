//! Pricing rule repository interface

use async_trait::async_trait;

use super::model::PricingRule;
use crate::domain::DomainResult;

/// Source of the persisted pricing rules.
#[async_trait]
pub trait PricingRuleRepository: Send + Sync {
    async fn find_all(&self) -> DomainResult<Vec<PricingRule>>;
}
