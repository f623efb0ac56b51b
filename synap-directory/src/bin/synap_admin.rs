//! synap-admin - account and catalog maintenance for synap-directory
//!
//! Works directly on the database file; the server does not need to be running.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use synap_common::config::{BootstrapConfig, ConfigOverrides};
use synap_common::db::{ensure_default_categories, ensure_default_resource_types, init_database};
use synap_directory::db::users::{self, SeedOutcome};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "synap-admin", version, about = "SynapDirectory maintenance tool")]
struct Cli {
    /// Folder holding the database file
    #[arg(long, global = true)]
    root_folder: Option<PathBuf>,

    /// TOML config file
    #[arg(long, global = true, env = "SYNAP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the admin account, or promote an existing account
    SeedAdmin {
        #[arg(long, env = "ADMIN_EMAIL")]
        email: String,
        #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Delete an account and its sessions
    DeleteAdmin {
        #[arg(long, env = "ADMIN_EMAIL")]
        email: String,
    },
    /// Insert any missing default categories and resource types
    SeedCategories,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = BootstrapConfig::resolve(&ConfigOverrides {
        root_folder: cli.root_folder,
        bind: None,
        config_path: cli.config,
    });
    config.ensure_root_folder()?;

    let db_path = config.database_path();
    info!("Database path: {}", db_path.display());
    let pool = init_database(&db_path).await?;

    match cli.command {
        Command::SeedAdmin { email, password } => {
            match users::seed_admin(&pool, &email, &password).await? {
                SeedOutcome::Created => println!("Created admin account {}", email.trim()),
                SeedOutcome::Promoted => println!("Promoted {} to admin", email.trim()),
                SeedOutcome::AlreadyAdmin => println!("{} is already an admin", email.trim()),
            }
        }
        Command::DeleteAdmin { email } => {
            if users::delete_user_by_email(&pool, &email).await? {
                println!("Deleted account {}", email.trim());
            } else {
                println!("No account found for {}; nothing to delete", email.trim());
            }
        }
        Command::SeedCategories => {
            ensure_default_categories(&pool).await?;
            ensure_default_resource_types(&pool).await?;
            println!("Default categories and resource types are present");
        }
    }

    pool.close().await;
    Ok(())
}
