//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to the per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::catalog::CreditCatalogRepository;
use super::pricing::PricingRuleRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let rules = repos.pricing_rules().find_all().await?;
///     let packs = repos.catalog().list_active_packs().await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn pricing_rules(&self) -> &dyn PricingRuleRepository;
    fn catalog(&self) -> &dyn CreditCatalogRepository;
}
