//! Lorepic credits server
//!
//! ```sh
//! # Default config (~/.config/lorepic-credits/config.toml)
//! lorepic-credits
//!
//! # Custom config path and port
//! lorepic-credits --config /etc/lorepic/credits.toml --api-port 9000
//!
//! # Validate config without starting
//! lorepic-credits --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, warn};

use lorepic_credits::config::{AppConfig, ConfigOrigin};
use lorepic_credits::server::{init_tracing, ServerHandle, ServerOptions};

#[derive(Parser, Debug)]
#[command(
    name = "lorepic-credits",
    version,
    about = "Credit cost estimation and billing-mode server",
    long_about = "Serves pricing rules, credit packs, cost estimates and the platform \
                  billing mode over REST.\n\n\
                  Default config: ~/.config/lorepic-credits/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "LOREPIC_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(lorepic_credits::default_config_path);

    let (mut config, origin) = match AppConfig::load_or_default(&config_path) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("❌ Failed to load config from {}: {}", config_path.display(), e);
            std::process::exit(1);
        }
    };

    // CLI overrides apply before tracing starts so --log-level takes effect.
    if let Some(port) = cli.api_port {
        config.server.api_port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    init_tracing(&config);
    match origin {
        ConfigOrigin::File => info!("Configuration loaded from {}", config_path.display()),
        ConfigOrigin::Defaults => {
            error!("Config file {} not found", config_path.display());
            error!("Using default configuration.");
        }
    }
    if config.security.uses_default_secret() {
        warn!("security.jwt_secret is the built-in placeholder; set LOREPIC_JWT_SECRET");
    }

    if cli.check {
        if let Err(e) = config.validate() {
            eprintln!("❌ Configuration is invalid: {}", e);
            std::process::exit(1);
        }
        println!("✅ Configuration is valid");
        match origin {
            ConfigOrigin::File => println!("   Config file  : {}", config_path.display()),
            ConfigOrigin::Defaults => println!("   Config file  : none (defaults)"),
        }
        println!("   API address  : {}:{}", config.server.api_host, config.server.api_port);
        println!("   Database     : {}", config.database.connection_url());
        println!("   Log level    : {}", config.logging.level);
        println!("   Billing mode : {}", config.billing.default_mode);
        match config.pricing.refresh_interval_secs {
            0 => println!("   Refresh      : disabled"),
            secs => println!("   Refresh      : every {}s", secs),
        }
        return Ok(());
    }

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();
    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
