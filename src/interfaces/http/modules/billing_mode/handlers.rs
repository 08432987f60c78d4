//! Billing mode REST API handlers

use axum::{extract::State, Json};

use super::dto::{BillingModeChangeResponse, BillingModeResponse, UpdateBillingModeRequest};
use super::BillingModeState;
use crate::domain::BillingMode;
use crate::interfaces::http::common::{domain_error, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::Caller;

#[utoipa::path(
    get,
    path = "/api/billing/mode",
    tag = "Billing",
    security((), ("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current billing mode", body = ApiResponse<BillingModeResponse>),
        (status = 401, description = "Invalid bearer token")
    )
)]
pub async fn get_mode(
    State(state): State<BillingModeState>,
    caller: Caller,
) -> ApiResult<BillingModeResponse> {
    let mode = state.controller.mode();
    let privileged = state.auth.is_privileged(&caller);
    Ok(Json(ApiResponse::success(BillingModeResponse {
        mode,
        show_credit_info: mode.should_show_credit_info(privileged),
    })))
}

#[utoipa::path(
    put,
    path = "/api/billing/mode",
    tag = "Billing",
    security(("bearer_auth" = [])),
    request_body = UpdateBillingModeRequest,
    responses(
        (status = 200, description = "Mode stored and broadcast", body = ApiResponse<BillingModeChangeResponse>),
        (status = 403, description = "Caller is not privileged"),
        (status = 422, description = "Unknown mode"),
        (status = 500, description = "Mode could not be persisted")
    )
)]
pub async fn set_mode(
    State(state): State<BillingModeState>,
    caller: Caller,
    ValidatedJson(body): ValidatedJson<UpdateBillingModeRequest>,
) -> ApiResult<BillingModeChangeResponse> {
    state.auth.require_privileged(&caller).map_err(domain_error)?;
    let mode: BillingMode = body.mode.trim().parse().map_err(domain_error)?;
    let previous = state
        .controller
        .set_mode(mode, caller.subject())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(BillingModeChangeResponse {
        mode,
        previous,
    })))
}
