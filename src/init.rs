//! Database initialization
//!
//! One-time setup used by the arenad_init tool: create a fresh database
//! and seed its first admin account.

use std::path::Path;

use anyhow::{anyhow, bail, Result};
use tracing::info;

use crate::auth::accounts::AccountService;
use crate::auth::Role;
use crate::config::Config;
use crate::db::Database;

/// Minimum length for the seeded admin password
pub const MIN_ADMIN_PASSWORD_LEN: usize = 8;

/// Initialize a new arenad database
///
/// # Arguments
/// * `path` - Path to the SQLite database file (must not exist)
/// * `admin_username` - Username for the admin account
/// * `admin_password` - Password for the admin account (must be >= 8 chars)
///
/// # Errors
/// * Database file already exists
/// * Password too short
/// * Database creation fails
pub async fn init_database(path: &Path, admin_username: &str, admin_password: &str) -> Result<()> {
    if path.exists() {
        bail!(
            "Database file already exists: {}. Remove it first or use a different path.",
            path.display()
        );
    }

    if admin_username.trim().is_empty() {
        bail!("Admin username must not be empty");
    }

    if admin_password.len() < MIN_ADMIN_PASSWORD_LEN {
        bail!(
            "Admin password must be at least {} characters",
            MIN_ADMIN_PASSWORD_LEN
        );
    }

    let db_path = path
        .to_str()
        .ok_or_else(|| anyhow!("Database path is not valid UTF-8: {}", path.display()))?;

    info!("Creating new database at {}", path.display());
    let db = Database::new(Some(db_path)).await?;

    // Token TTL is irrelevant here; no sessions are issued.
    let service = AccountService::new(db.pool().clone(), Config::default().token_ttl());
    let account = service
        .create(admin_username, admin_password, Role::Admin)
        .await?;
    info!(
        "Created admin account '{}' ({})",
        admin_username, account.id
    );

    info!("Database initialization complete");
    Ok(())
}
