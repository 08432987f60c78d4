//! Liveness and readiness report

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::PricingService;

#[derive(Clone)]
pub struct HealthState {
    pub db: DatabaseConnection,
    pub pricing: Arc<PricingService>,
    pub started_at: Arc<Instant>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` or `degraded`
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: DatabaseHealth,
    pub pricing: PricingHealth,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DatabaseHealth {
    pub status: String,
    pub latency_ms: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PricingHealth {
    pub rules_loaded: usize,
    pub loaded_at: DateTime<Utc>,
}

async fn ping(db: &DatabaseConnection) -> DatabaseHealth {
    let started = Instant::now();
    let statement = Statement::from_string(db.get_database_backend(), "SELECT 1".to_string());
    match db.execute(statement).await {
        Ok(_) => DatabaseHealth {
            status: "ok".to_string(),
            latency_ms: Some(started.elapsed().as_millis() as u64),
        },
        Err(e) => {
            tracing::warn!("Health check database ping failed: {}", e);
            DatabaseHealth {
                status: "error".to_string(),
                latency_ms: None,
            }
        }
    }
}

/// Degraded (503) when the database is unreachable or no pricing rule is loaded.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is degraded", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let database = ping(&state.db).await;
    let snapshot = state.pricing.snapshot();

    let healthy = database.status == "ok" && !snapshot.is_empty();
    let (status, label) = if healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.started_at.elapsed().as_secs(),
            database,
            pricing: PricingHealth {
                rules_loaded: snapshot.len(),
                loaded_at: snapshot.loaded_at(),
            },
        }),
    )
}
