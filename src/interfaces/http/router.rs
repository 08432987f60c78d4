//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{BillingModeController, PricingService};
use crate::domain::RepositoryProvider;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::{optional_auth_middleware, AuthState};
use crate::interfaces::http::modules::request_id::request_id_middleware;
use crate::interfaces::http::modules::{billing_mode, credits, health, metrics};
use crate::interfaces::ws::{ws_billing_mode_handler, BillingModeStreamState};
use crate::shared::ShutdownSignal;

/// Everything the handlers need; each handler picks its slice via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub repos: Arc<dyn RepositoryProvider>,
    pub pricing: Arc<PricingService>,
    pub billing_mode: Arc<BillingModeController>,
    pub auth: AuthState,
    pub metrics: PrometheusHandle,
    pub shutdown: ShutdownSignal,
    pub started_at: Arc<Instant>,
}

impl FromRef<AppState> for credits::CreditsState {
    fn from_ref(s: &AppState) -> Self {
        credits::CreditsState {
            pricing: Arc::clone(&s.pricing),
            repos: Arc::clone(&s.repos),
            auth: s.auth.clone(),
        }
    }
}

impl FromRef<AppState> for billing_mode::BillingModeState {
    fn from_ref(s: &AppState) -> Self {
        billing_mode::BillingModeState {
            controller: Arc::clone(&s.billing_mode),
            auth: s.auth.clone(),
        }
    }
}

impl FromRef<AppState> for BillingModeStreamState {
    fn from_ref(s: &AppState) -> Self {
        BillingModeStreamState {
            controller: Arc::clone(&s.billing_mode),
            shutdown: s.shutdown.clone(),
        }
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        health::HealthState {
            db: s.db.clone(),
            pricing: Arc::clone(&s.pricing),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

impl FromRef<AppState> for metrics::MetricsState {
    fn from_ref(s: &AppState) -> Self {
        metrics::MetricsState {
            handle: s.metrics.clone(),
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(s: &AppState) -> Self {
        s.auth.clone()
    }
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT whose `role` claim decides privilege"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        credits::get_config,
        credits::list_packs,
        credits::list_pricing,
        credits::estimate_cost,
        credits::refresh_config,
        billing_mode::get_mode,
        billing_mode::set_mode,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::DatabaseHealth,
            health::PricingHealth,
            credits::PricingRuleDto,
            credits::CreditPackDto,
            credits::CreditPricingDto,
            credits::EstimateRequest,
            credits::EstimateResponse,
            credits::AppliedFactorDto,
            credits::RefreshResponse,
            billing_mode::BillingModeResponse,
            billing_mode::UpdateBillingModeRequest,
            billing_mode::BillingModeChangeResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Credits", description = "Pricing rules, credit packs and cost estimation"),
        (name = "Billing", description = "Platform billing mode"),
    ),
    info(
        title = "Lorepic Credits API",
        version = "1.0.0",
        description = "Credit cost estimation and billing mode for Lorepic generation services"
    )
)]
pub struct ApiDoc;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return base.allow_origin(Any);
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(allowed))
}

/// Build the full application router.
///
/// `/api/*` routes accept an optional bearer token; `/health`, `/metrics`
/// and the documentation are always public.
pub fn create_api_router(state: AppState, cors_origins: &[String]) -> Router {
    let credit_routes = Router::new()
        .route("/config", get(credits::get_config))
        .route("/config/refresh", post(credits::refresh_config))
        .route("/packs", get(credits::list_packs))
        .route("/pricing", get(credits::list_pricing))
        .route("/estimate", post(credits::estimate_cost));

    let billing_routes = Router::new()
        .route(
            "/mode",
            get(billing_mode::get_mode).put(billing_mode::set_mode),
        )
        .route("/mode/ws", get(ws_billing_mode_handler));

    let api_routes = Router::new()
        .nest("/credits", credit_routes)
        .nest("/billing", billing_routes)
        .layer(middleware::from_fn_with_state(
            state.auth.clone(),
            optional_auth_middleware,
        ));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::prometheus_metrics))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors_layer(cors_origins))
        .with_state(state)
}
