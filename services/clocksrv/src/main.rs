//! ClockSrv main program

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clocksrv::api::create_router;
use clocksrv::config::DEFAULT_CONFIG_PATH;
use clocksrv::{AppState, ClockConfig};
use common::SystemTimeProvider;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "ClockSrv - alarms, timers and clocks over HTTP")]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "CLOCKSRV_CONFIG",
        default_value = DEFAULT_CONFIG_PATH
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the HTTP service (default)
    Serve,
    /// Print the effective configuration as YAML and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ClockConfig::load(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;

    match args.command {
        Some(Commands::Check) => {
            print!("{}", config.to_yaml()?);
            Ok(())
        },
        Some(Commands::Serve) | None => run_service(config).await,
    }
}

async fn run_service(config: ClockConfig) -> Result<()> {
    common::logging::init_with_config(&config.service.log)?;
    info!(
        "Starting {} v{}",
        config.service.name,
        env!("CARGO_PKG_VERSION")
    );

    let bind_address = config.api.bind_address();
    let state = AppState::new(config, Arc::new(SystemTimeProvider))?;
    if state.config.env_clock.remote_lookup {
        info!(
            "Environment clock using {} and {}",
            state.config.env_clock.time_api_url, state.config.env_clock.open_meteo_url
        );
    }
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    info!("ClockSrv listening on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(common::shutdown::wait_for_shutdown())
        .await?;

    info!("ClockSrv stopped");
    Ok(())
}
