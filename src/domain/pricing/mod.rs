//! Pricing aggregate
//!
//! Pricing rules, their snapshots, and the credit cost estimator.

pub mod estimator;
pub mod model;
pub mod repository;
pub mod store;

pub use estimator::{estimate, AppliedFactor, CostEstimateRequest, CostEstimateResult};
pub use model::{DurationBucket, MultiplierTable, PricingRule, ServiceKind};
pub use repository::PricingRuleRepository;
pub use store::{PricingRuleStore, PricingSnapshot};
