//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod catalog_repository;
pub mod pricing_rule_repository;
pub mod repository_provider;
pub mod settings_repository;

pub use catalog_repository::SeaOrmCreditCatalogRepository;
pub use pricing_rule_repository::SeaOrmPricingRuleRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use settings_repository::SeaOrmSettingsRepository;
