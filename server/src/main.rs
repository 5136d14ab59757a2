use anyhow::{Context, Result};
use clap::Parser;
use taskboard_server::config::Config;
use taskboard_server::setup::{ensure_database_directory_from_config, initialize_app};
use taskboard_server::telemetry::{
    init_telemetry, log_config_validation, log_shutdown_info, log_startup_info,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Taskboard HTTP API server")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CONFIG_FILE")]
    config: Option<String>,

    /// Database URL override
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Listen address override
    #[arg(long, env = "LISTEN_ADDR")]
    listen_addr: Option<String>,

    /// Log level override
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(config_file) => {
            info!("Loading configuration from file: {}", config_file);
            Config::from_file(config_file)?
        }
        None => {
            info!("Loading configuration from environment");
            Config::from_env()?
        }
    };

    // Apply CLI overrides
    if let Some(ref database_url) = cli.database_url {
        info!("Overriding database URL from CLI");
        config.database.url = Some(database_url.clone());
    }

    if let Some(ref listen_addr) = cli.listen_addr {
        info!("Overriding listen address from CLI");
        config.server.listen_addr = listen_addr.clone();
    }

    if let Some(ref log_level) = cli.log_level {
        info!("Overriding log level from CLI");
        config.logging.level = log_level.clone();
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let config = load_config(&cli).context("Failed to load configuration")?;

    init_telemetry(&config.logging).context("Failed to initialize telemetry")?;

    log_config_validation(&config);

    // Refuse to start on an invalid configuration, including a missing
    // jwt_secret
    if let Err(e) = config.validate() {
        error!(error = %e, "Configuration validation failed");
        std::process::exit(1);
    }

    log_startup_info(&config);

    ensure_database_directory_from_config(&config)
        .context("Failed to create database directory")?;

    info!("Initializing taskboard server components");
    let server = initialize_app(&config)
        .await
        .context("Failed to initialize application")?;

    let addr = config.server_address();
    info!("Starting taskboard server on {}", addr);

    // Setup graceful shutdown handling
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    tokio::spawn(async move {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to register SIGTERM handler");
        let mut sigint = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())
            .expect("Failed to register SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM, initiating graceful shutdown");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT, initiating graceful shutdown");
            }
        }

        let _ = shutdown_tx.send(());
    });

    tokio::select! {
        result = server.serve(&addr) => {
            match result {
                Ok(_) => {
                    info!("Taskboard server shut down cleanly");
                    Ok(())
                }
                Err(e) => {
                    error!(error = %e, "Taskboard server error");
                    std::process::exit(3);
                }
            }
        }
        _ = shutdown_rx => {
            log_shutdown_info();
            Ok(())
        }
    }
}
