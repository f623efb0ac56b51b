//! synap-directory - curated link directory server
//!
//! Serves the public directory pages, the JSON API and the admin dashboard
//! from a single SQLite database under the root folder.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use synap_common::config::{BootstrapConfig, ConfigOverrides};
use synap_common::db::init_database;
use synap_directory::db::users;
use synap_directory::services::{CloudinaryClient, ImageHost, MetadataScraper};
use synap_directory::{build_router, AppState};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "synap-directory", version, about = "Curated link directory server")]
struct Args {
    /// Folder holding the database file (overrides SYNAP_ROOT_FOLDER)
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// Address to listen on, host:port (overrides SYNAP_BIND)
    #[arg(long)]
    bind: Option<String>,

    /// TOML config file
    #[arg(long, env = "SYNAP_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = BootstrapConfig::resolve(&ConfigOverrides {
        root_folder: args.root_folder,
        bind: args.bind,
        config_path: args.config,
    });

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        "Starting SynapDirectory (synap-directory) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    config.ensure_root_folder()?;
    let db_path = config.database_path();
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let purged = users::purge_expired_sessions(&pool).await?;
    if purged > 0 {
        info!("Removed {} expired sessions", purged);
    }

    let image_host: Option<Arc<dyn ImageHost>> = if config.image_host.is_configured() {
        let client = CloudinaryClient::from_config(&config.image_host)
            .context("Failed to build image host client")?;
        info!("✓ Image hosting enabled");
        Some(Arc::new(client))
    } else {
        warn!("Image hosting not configured: uploads disabled, scraped images keep their source URLs");
        None
    };

    let scraper = MetadataScraper::new().context("Failed to build metadata scraper")?;

    let state = AppState::new(pool, image_host, scraper, config.session_ttl_hours);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("synap-directory listening on http://{}", config.bind);
    info!("Health check: http://{}/health", config.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
