//! Prometheus endpoint and HTTP request metrics

pub mod handlers;
pub mod middleware;

pub use handlers::{prometheus_metrics, MetricsState};
pub use middleware::http_metrics_middleware;
