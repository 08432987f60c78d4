//! # Lorepic Credits
//!
//! Credit cost estimation and billing-mode service for the Lorepic content
//! generation platform.
//!
//! ## Architecture
//!
//! - **domain**: pricing rules, the cost estimator, billing modes, catalog types
//! - **application**: pricing snapshot service, billing-mode controller, refresh task
//! - **infrastructure**: SeaORM persistence, JWT verification
//! - **interfaces**: REST API with Swagger documentation, WebSocket stream
//! - **notifications**: in-process event bus
//! - **server**: runtime wiring and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod notifications;
pub mod server;
pub mod shared;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{default_config_path, AppConfig};

pub use domain::pricing::estimate;
pub use domain::{
    BillingMode, CostEstimateRequest, CostEstimateResult, PricingRule, PricingRuleStore,
    ServiceKind,
};

pub use application::{BillingModeController, PricingService};

pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

pub use interfaces::http::create_api_router;

pub use notifications::{create_event_bus, Event, EventBus, SharedEventBus};

pub use server::{init_tracing, ServerHandle, ServerOptions};
