use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::BillingMode;

/// Billing mode as seen by the caller
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BillingModeResponse {
    #[schema(value_type = String, example = "payg")]
    pub mode: BillingMode,
    /// Whether credit balances and costs should be displayed to this caller
    pub show_credit_info: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBillingModeRequest {
    /// `payg`, `subscription` or `hybrid`
    #[validate(length(min = 1, max = 32, message = "mode is required"))]
    #[schema(example = "subscription")]
    pub mode: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BillingModeChangeResponse {
    #[schema(value_type = String, example = "subscription")]
    pub mode: BillingMode,
    #[schema(value_type = String, example = "payg")]
    pub previous: BillingMode,
}
