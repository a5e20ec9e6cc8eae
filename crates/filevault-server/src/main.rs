//! Authenticated HTTP front end for the filevault content-addressed store.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use filevault_engine::FileVault;
use filevault_server::auth::{Authenticator, CredentialResolver};
use filevault_server::config::Config;
use filevault_server::staging::Staging;
use filevault_server::{AppState, router};

#[derive(Parser, Debug)]
#[command(name = "filevault-server")]
#[command(about = "Authenticated front end for the filevault content store")]
struct Cli {
    /// Port to listen on
    #[arg(long, default_value_t = 3000, env = "FILEVAULT_PORT")]
    port: u16,

    /// Address to bind to
    #[arg(long, default_value = "0.0.0.0", env = "FILEVAULT_BIND")]
    bind: String,

    /// Path to config directory
    #[arg(long, default_value = "./config", env = "FILEVAULT_CONFIG_PATH")]
    config_path: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "filevault_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration and open the credential stores and the vault
    let config = Config::load(&cli.config_path)?;
    std::fs::create_dir_all(&config.temp_path)
        .with_context(|| format!("Failed to create temp directory: {:?}", config.temp_path))?;
    let resolver = CredentialResolver::open(&config.data_path)?;
    let vault = FileVault::open(&config.root_path).await?;

    let state = Arc::new(AppState {
        auth: Authenticator::new(resolver),
        vault: Arc::new(vault),
        staging: Staging::new(&config.temp_path),
    });

    let app = router(state);

    // Parse bind address
    let addr: SocketAddr = format!("{}:{}", cli.bind, cli.port).parse()?;

    tracing::info!("Starting filevault-server on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Vault server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
