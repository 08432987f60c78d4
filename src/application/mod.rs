pub mod services;

pub use services::{BillingModeController, BillingModeSubscriber, PricingRefreshTask, PricingService};
