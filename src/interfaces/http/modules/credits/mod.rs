//! Credit configuration, catalog and estimation endpoints

pub mod dto;
pub mod handlers;

use std::sync::Arc;

use crate::application::PricingService;
use crate::domain::RepositoryProvider;
use crate::interfaces::http::middleware::AuthState;

pub use dto::*;
pub use handlers::*;

#[derive(Clone)]
pub struct CreditsState {
    pub pricing: Arc<PricingService>,
    pub repos: Arc<dyn RepositoryProvider>,
    pub auth: AuthState,
}
