//! Credit catalogue repository interface

use async_trait::async_trait;

use super::model::{CreditPack, CreditPricing};
use crate::domain::DomainResult;

#[async_trait]
pub trait CreditCatalogRepository: Send + Sync {
    /// Active packs ordered by `sort_order`.
    async fn list_active_packs(&self) -> DomainResult<Vec<CreditPack>>;
    /// Pricing rows ordered by service, then tier.
    async fn list_pricing(&self) -> DomainResult<Vec<CreditPricing>>;
}
