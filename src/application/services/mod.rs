//! Application services

mod billing_mode;
mod pricing;
mod pricing_refresh;

pub use billing_mode::{BillingModeController, BillingModeSubscriber};
pub use pricing::PricingService;
pub use pricing_refresh::PricingRefreshTask;
