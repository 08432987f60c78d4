//! WebSocket interfaces
//!
//! - `billing_mode`: live billing-mode change stream

pub mod billing_mode;

pub use billing_mode::{ws_billing_mode_handler, BillingModeStreamState};
