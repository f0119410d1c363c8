//! Mascot HTTP server entry point.
//!
//! Binary name: `mascotd`
//!
//! Parses CLI arguments, loads configuration and persona data, then serves
//! the chat API until interrupted.

mod http;
mod state;

use std::path::PathBuf;

use clap::Parser;

use state::AppState;

#[derive(Debug, Parser)]
#[command(name = "mascotd", about = "Persona chat gateway", version)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "mascot.toml")]
    config: PathBuf,

    /// Override the listen host from the config file.
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port from the config file.
    #[arg(long)]
    port: Option<u16>,

    /// Override the data directory from the config file.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Export spans via OpenTelemetry (stdout exporter).
    #[arg(long)]
    otel: bool,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info",
        1 => "info,mascot_core=debug,mascot_infra=debug,mascot_api=debug",
        _ => "trace",
    };
    mascot_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let mut config = mascot_infra::config::load_config(&cli.config).await;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(data_dir) = cli.data_dir {
        config.data.dir = data_dir.display().to_string();
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::init(config).await?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "mascot listening");

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    mascot_observe::tracing_setup::shutdown_tracing();
    tracing::info!("server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
