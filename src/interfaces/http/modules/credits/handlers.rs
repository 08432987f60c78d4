//! Credit REST API handlers

use axum::{extract::State, Json};

use super::dto::{
    CreditPackDto, CreditPricingDto, EstimateRequest, EstimateResponse, PricingRuleDto,
    RefreshResponse,
};
use super::CreditsState;
use crate::interfaces::http::common::{domain_error, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::Caller;

#[utoipa::path(
    get,
    path = "/api/credits/config",
    tag = "Credits",
    responses(
        (status = 200, description = "One pricing rule per configured service", body = ApiResponse<Vec<PricingRuleDto>>)
    )
)]
pub async fn get_config(State(state): State<CreditsState>) -> ApiResult<Vec<PricingRuleDto>> {
    let snapshot = state.pricing.snapshot();
    let rules = snapshot.rules().map(PricingRuleDto::from).collect();
    Ok(Json(ApiResponse::success(rules)))
}

#[utoipa::path(
    get,
    path = "/api/credits/packs",
    tag = "Credits",
    responses(
        (status = 200, description = "Active credit packs in display order", body = ApiResponse<Vec<CreditPackDto>>),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn list_packs(State(state): State<CreditsState>) -> ApiResult<Vec<CreditPackDto>> {
    let packs = state
        .repos
        .catalog()
        .list_active_packs()
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        packs.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/credits/pricing",
    tag = "Credits",
    responses(
        (status = 200, description = "Per-tier credit prices sorted by service and tier", body = ApiResponse<Vec<CreditPricingDto>>),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn list_pricing(State(state): State<CreditsState>) -> ApiResult<Vec<CreditPricingDto>> {
    let rows = state
        .repos
        .catalog()
        .list_pricing()
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        rows.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/credits/estimate",
    tag = "Credits",
    request_body = EstimateRequest,
    responses(
        (status = 200, description = "Credit cost with applied factors", body = ApiResponse<EstimateResponse>),
        (status = 404, description = "No pricing rule for the service"),
        (status = 422, description = "Invalid request body")
    )
)]
pub async fn estimate_cost(
    State(state): State<CreditsState>,
    ValidatedJson(body): ValidatedJson<EstimateRequest>,
) -> ApiResult<EstimateResponse> {
    let request = body.into_domain().map_err(domain_error)?;
    let result = state.pricing.estimate(&request).map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EstimateResponse::new(
        request.service,
        &result,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/credits/config/refresh",
    tag = "Credits",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Rules reloaded from the database", body = ApiResponse<RefreshResponse>),
        (status = 403, description = "Caller is not privileged"),
        (status = 500, description = "Reload failed; previous rules stay active")
    )
)]
pub async fn refresh_config(
    State(state): State<CreditsState>,
    caller: Caller,
) -> ApiResult<RefreshResponse> {
    state.auth.require_privileged(&caller).map_err(domain_error)?;
    let rules_loaded = state.pricing.refresh().await.map_err(domain_error)?;
    tracing::info!(
        "Pricing rules reloaded by {}: {}",
        caller.subject().unwrap_or("anonymous"),
        rules_loaded
    );
    Ok(Json(ApiResponse::success(RefreshResponse { rules_loaded })))
}
