//! Database entities module

pub mod app_setting;
pub mod credit_pack;
pub mod credit_pricing;
pub mod pricing_rule;

pub use app_setting::Entity as AppSetting;
pub use credit_pack::Entity as CreditPack;
pub use credit_pricing::Entity as CreditPricing;
pub use pricing_rule::Entity as PricingRule;
