//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::catalog::CreditCatalogRepository;
use crate::domain::pricing::PricingRuleRepository;
use crate::domain::repositories::RepositoryProvider;

use super::catalog_repository::SeaOrmCreditCatalogRepository;
use super::pricing_rule_repository::SeaOrmPricingRuleRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let rules = repos.pricing_rules().find_all().await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    pricing_rules: SeaOrmPricingRuleRepository,
    catalog: SeaOrmCreditCatalogRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            pricing_rules: SeaOrmPricingRuleRepository::new(db.clone()),
            catalog: SeaOrmCreditCatalogRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn pricing_rules(&self) -> &dyn PricingRuleRepository {
        &self.pricing_rules
    }

    fn catalog(&self) -> &dyn CreditCatalogRepository {
        &self.catalog
    }
}

