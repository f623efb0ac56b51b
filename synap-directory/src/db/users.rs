//! Accounts and login sessions
//!
//! Sessions are looked up by the SHA-256 of the client token. Expired
//! sessions are deleted when encountered.

use sqlx::SqlitePool;
use synap_common::api::auth::hash_password;
use synap_common::db::{User, ROLE_ADMIN};
use synap_common::time::{hours_from_now, now, to_sqlite};
use synap_common::{Error, Result};
use tracing::debug;
use uuid::Uuid;

const USER_COLUMNS: &str = "SELECT id, name, email, email_verified, role, password_hash FROM users";

pub async fn find_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("{} WHERE lower(email) = lower(?)", USER_COLUMNS))
        .bind(email.trim())
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Outcome of [`seed_admin`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created,
    Promoted,
    AlreadyAdmin,
}

/// Create the admin account, or promote an existing account with that email
///
/// An existing account keeps its password.
pub async fn seed_admin(pool: &SqlitePool, email: &str, password: &str) -> Result<SeedOutcome> {
    let email = email.trim();
    if email.is_empty() {
        return Err(Error::InvalidInput("Admin email is required".to_string()));
    }

    if let Some(user) = find_user_by_email(pool, email).await? {
        if user.is_admin() {
            return Ok(SeedOutcome::AlreadyAdmin);
        }

        sqlx::query("UPDATE users SET role = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?")
            .bind(ROLE_ADMIN)
            .bind(&user.id)
            .execute(pool)
            .await?;
        return Ok(SeedOutcome::Promoted);
    }

    let password_hash =
        hash_password(password).map_err(|e| Error::InvalidInput(e.to_string()))?;

    sqlx::query(
        "INSERT INTO users (id, name, email, email_verified, role, password_hash) VALUES (?, ?, ?, 1, ?, ?)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind("Admin")
    .bind(email)
    .bind(ROLE_ADMIN)
    .bind(password_hash)
    .execute(pool)
    .await?;

    Ok(SeedOutcome::Created)
}

/// Delete an account and its sessions; `false` when no account matched
pub async fn delete_user_by_email(pool: &SqlitePool, email: &str) -> Result<bool> {
    let Some(user) = find_user_by_email(pool, email).await? else {
        return Ok(false);
    };

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM sessions WHERE user_id = ?")
        .bind(&user.id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(&user.id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(true)
}

/// Store a session for `user_id` valid for `ttl_hours`
pub async fn create_session(
    pool: &SqlitePool,
    user_id: &str,
    token_hash: &str,
    ttl_hours: i64,
) -> Result<()> {
    sqlx::query("INSERT INTO sessions (id, user_id, token_hash, expires_at) VALUES (?, ?, ?, ?)")
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(token_hash)
        .bind(hours_from_now(ttl_hours))
        .execute(pool)
        .await?;
    Ok(())
}

/// User owning a live session; expired sessions are removed
pub async fn find_session_user(pool: &SqlitePool, token_hash: &str) -> Result<Option<User>> {
    let expires_at: Option<String> =
        sqlx::query_scalar("SELECT expires_at FROM sessions WHERE token_hash = ?")
            .bind(token_hash)
            .fetch_optional(pool)
            .await?;

    let Some(expires_at) = expires_at else {
        return Ok(None);
    };

    if expires_at <= to_sqlite(now()) {
        debug!("Dropping expired session");
        delete_session(pool, token_hash).await?;
        return Ok(None);
    }

    let user = sqlx::query_as::<_, User>(&format!(
        "{} WHERE id = (SELECT user_id FROM sessions WHERE token_hash = ?)",
        USER_COLUMNS
    ))
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn delete_session(pool: &SqlitePool, token_hash: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
        .bind(token_hash)
        .execute(pool)
        .await?;
    Ok(())
}

/// Remove every expired session, returning how many were deleted
pub async fn purge_expired_sessions(pool: &SqlitePool) -> Result<u64> {
    let purged = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(to_sqlite(now()))
        .execute(pool)
        .await?
        .rows_affected();
    Ok(purged)
}
