//! Database models and queries

pub mod init;
pub mod migrations;
pub mod models;
pub mod seed;

pub use init::*;
pub use migrations::{get_schema_version, run_migrations, CURRENT_SCHEMA_VERSION};
pub use models::*;
pub use seed::*;
