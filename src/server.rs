//! Server runtime
//!
//! [`ServerHandle`] owns the whole lifecycle: database, migrations, pricing
//! snapshot, billing mode, REST API, background refresh and graceful
//! shutdown. The CLI binary is a thin wrapper around it.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::application::{BillingModeController, PricingRefreshTask, PricingService};
use crate::config::AppConfig;
use crate::domain::{PricingRuleStore, RepositoryProvider};
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::database::repositories::SeaOrmSettingsRepository;
use crate::infrastructure::{init_database, DatabaseConfig, JwtConfig, SeaOrmRepositoryProvider};
use crate::interfaces::http::middleware::AuthState;
use crate::interfaces::http::{create_api_router, AppState};
use crate::notifications::{create_event_bus, SharedEventBus};
use crate::shared::{AppError, InfraError, ShutdownCoordinator, ShutdownSignal};

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations (and seed defaults) on startup
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

/// The global recorder can only be installed once per process; later starts
/// reuse the first handle.
fn prometheus_handle() -> Result<PrometheusHandle, AppError> {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    if let Some(handle) = HANDLE.get() {
        return Ok(handle.clone());
    }
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| AppError::Metrics(e.to_string()))?;
    info!("📊 Prometheus metrics recorder installed");
    Ok(HANDLE.get_or_init(|| handle).clone())
}

/// Handle to a running credits server
pub struct ServerHandle {
    pub event_bus: SharedEventBus,
    pub repos: Arc<dyn RepositoryProvider>,
    pub pricing: Arc<PricingService>,
    pub billing_mode: Arc<BillingModeController>,
    pub config: AppConfig,
    /// Address the REST API is bound to
    pub local_addr: SocketAddr,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: JoinHandle<()>,
    refresh_task: Option<JoinHandle<()>>,
}

impl ServerHandle {
    /// Start serving.
    ///
    /// Fails if the database is unreachable, a migration fails, or the
    /// stored pricing rules cannot be loaded.
    pub async fn start(opts: ServerOptions) -> Result<Self, AppError> {
        let app_cfg = opts.config;
        info!("Starting Lorepic credits server...");

        let prometheus = prometheus_handle()?;

        let db_config = DatabaseConfig {
            url: app_cfg.database.connection_url(),
            max_connections: app_cfg.database.max_connections,
        };
        let db = init_database(&db_config).await.map_err(InfraError::from)?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await.map_err(InfraError::from)?;
            info!("Migrations completed");
        }

        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let event_bus = create_event_bus();

        let pricing = Arc::new(PricingService::new(
            repos.clone(),
            Arc::new(PricingRuleStore::default()),
            event_bus.clone(),
        ));
        let rule_count = pricing.refresh().await?;
        if rule_count == 0 {
            warn!("No pricing rules configured; every estimate will be rejected");
        }

        let billing_mode = Arc::new(
            BillingModeController::load(
                Arc::new(SeaOrmSettingsRepository::new(db.clone())),
                event_bus.clone(),
                app_cfg.billing.default_mode,
            )
            .await?,
        );

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        let refresh_task = match app_cfg.pricing.refresh_interval_secs {
            0 => None,
            secs => Some(
                PricingRefreshTask::new(pricing.clone(), Duration::from_secs(secs))
                    .start(shutdown_signal.clone()),
            ),
        };

        let jwt_config = JwtConfig::from(&app_cfg.security);
        info!(
            "JWT configured with {}h token expiration, privileged roles: {:?}",
            jwt_config.expiration_hours, app_cfg.security.privileged_roles
        );

        let state = AppState {
            db: db.clone(),
            repos: repos.clone(),
            pricing: pricing.clone(),
            billing_mode: billing_mode.clone(),
            auth: AuthState::new(jwt_config, app_cfg.security.privileged_role_set()),
            metrics: prometheus,
            shutdown: shutdown_signal.clone(),
            started_at: Arc::new(Instant::now()),
        };
        let router = create_api_router(state, &app_cfg.server.cors_origins);

        let api_addr = format!("{}:{}", app_cfg.server.api_host, app_cfg.server.api_port);
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_shutdown = shutdown_signal.clone();
        let api_server = axum::serve(listener, router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("🛑 REST API server received shutdown signal");
        });
        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        info!("🚀 Server started");

        Ok(Self {
            event_bus,
            repos,
            pricing,
            billing_mode,
            config: app_cfg,
            local_addr,
            db,
            shutdown,
            api_task,
            refresh_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Trigger shutdown on SIGINT / SIGTERM.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait until the server and background tasks have stopped, bounded by
    /// the configured shutdown timeout.
    pub async fn wait(self) {
        info!("⏳ Waiting for server tasks to complete...");
        let Self {
            db,
            shutdown,
            api_task,
            refresh_task,
            ..
        } = self;
        let timeout = shutdown.timeout();

        let tasks = async move {
            match api_task.await {
                Ok(()) => info!("REST API server stopped"),
                Err(e) => error!("REST API server task panicked: {}", e),
            }
            if let Some(task) = refresh_task {
                if let Err(e) = task.await {
                    error!("Pricing refresh task panicked: {}", e);
                }
            }
        };
        if tokio::time::timeout(timeout, tasks).await.is_err() {
            warn!("Shutdown timed out after {}s", timeout.as_secs());
        }

        if let Err(e) = db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("✅ Database connection closed");
        }
        info!("👋 Shutdown complete");
    }

    pub async fn shutdown(self) {
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// Initialise tracing once at process start. `RUST_LOG` overrides the
/// configured level; `log` records are forwarded into tracing.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if config.logging.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    if let Err(e) = result {
        eprintln!("Tracing already initialised: {}", e);
    }
}
