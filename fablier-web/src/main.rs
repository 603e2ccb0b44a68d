//! fablier-web - HTTP service entry point

use anyhow::Result;
use clap::Parser;
use fablier_common::config::{self, TomlConfig};
use fablier_web::{build_router, AppState, PlatformClients};
use std::path::PathBuf;
use tracing::info;

/// Companion web service for webnovel reading progress and gamification
#[derive(Debug, Parser)]
#[command(name = "fablier-web", version)]
struct Cli {
    /// Data directory holding fablier.db (overrides env and config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// HTTP port
    #[arg(long, env = "FABLIER_PORT")]
    port: Option<u16>,

    /// Bind address
    #[arg(long, env = "FABLIER_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting Fablier web service v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let toml_config = TomlConfig::load();

    let data_dir = config::resolve_data_dir(cli.data_dir.as_deref(), &toml_config);
    let db_path = config::ensure_database_path(&data_dir)?;
    info!("Database path: {}", db_path.display());

    let pool = fablier_common::db::init_database(&db_path).await?;

    let platforms = PlatformClients::from_config(&toml_config);
    let state = AppState::new(pool, platforms);
    let app = build_router(state);

    let bind = cli
        .bind
        .or_else(|| toml_config.bind.clone())
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = cli.port.or(toml_config.port).unwrap_or(5470);

    let listener = tokio::net::TcpListener::bind((bind.as_str(), port)).await?;
    info!("fablier-web listening on http://{}:{}", bind, port);
    info!("Health check: http://{}:{}/health", bind, port);

    axum::serve(listener, app).await?;

    Ok(())
}
