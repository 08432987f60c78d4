//! Endpoint modules, one per resource

pub mod billing_mode;
pub mod credits;
pub mod health;
pub mod metrics;
pub mod request_id;
