//! Domain layer: pricing, billing mode, catalog and principals

pub mod billing_mode;
pub mod catalog;
pub mod principal;
pub mod pricing;
pub mod repositories;
pub mod settings;

pub use billing_mode::{BillingMode, BILLING_MODE_SETTING_KEY};
pub use catalog::{CreditCatalogRepository, CreditPack, CreditPricing};
pub use principal::Principal;
pub use pricing::{
    CostEstimateRequest, CostEstimateResult, DurationBucket, PricingRule, PricingRuleRepository,
    PricingRuleStore, PricingSnapshot, ServiceKind,
};
pub use repositories::{DomainResult, RepositoryProvider};
pub use settings::SettingsRepository;

pub use crate::shared::errors::DomainError;
