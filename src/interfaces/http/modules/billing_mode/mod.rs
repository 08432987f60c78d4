//! Billing mode endpoints

pub mod dto;
pub mod handlers;

use std::sync::Arc;

use crate::application::BillingModeController;
use crate::interfaces::http::middleware::AuthState;

pub use dto::*;
pub use handlers::*;

#[derive(Clone)]
pub struct BillingModeState {
    pub controller: Arc<BillingModeController>,
    pub auth: AuthState,
}
