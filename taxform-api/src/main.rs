//! taxform-api - Tax-form declaration HTTP service
//!
//! Manages per-employee annual tax-declaration records and produces
//! printable output: one PDF per employee or a ZIP bundle for many.

use anyhow::Result;
use clap::Parser;
use taxform_api::{build_router, AppState};
use taxform_common::config::ServiceConfig;
use taxform_common::db;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "taxform-api", about = "Tax-form declaration HTTP service")]
struct Cli {
    /// Path of the SQLite database file
    #[arg(long)]
    database: Option<String>,

    /// Address to bind the HTTP listener to
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber before anything else
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting taxform-api v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config = ServiceConfig::resolve(cli.database.as_deref(), cli.bind.as_deref())?;
    info!("Database path: {}", config.database_path.display());

    let pool = db::connect(&config.database_path).await?;
    db::init_schema(&pool).await?;
    info!("✓ Connected to database, schema ready");

    let state = AppState::new(pool, config.default_page_size);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("taxform-api listening on http://{}", config.bind_addr);
    info!("Health check: http://{}/health", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
