//! Account management service
//!
//! Handles signup, signin and bearer token sessions.

use chrono::{Duration, Utc};
use sqlx::sqlite::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};

use crate::db::begin_write;

use super::{generate_salt, generate_token, hash_password, verify_password, Role};

/// Account data
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub avatar_id: Option<String>,
    pub created_at: String,
}

impl Account {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// A live bearer token
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    /// Unix seconds
    pub expires_at: i64,
}

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username already exists")]
    UsernameExists,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("stored role is invalid: {0}")]
    InvalidRole(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Account service for authentication operations
pub struct AccountService {
    pool: SqlitePool,
    token_ttl: Duration,
}

impl AccountService {
    /// Create a new account service
    pub fn new(pool: SqlitePool, token_ttl: Duration) -> Self {
        Self { pool, token_ttl }
    }

    /// Create a new account
    ///
    /// Uniqueness is left to the UNIQUE constraint so two concurrent
    /// signups for the same name cannot both succeed.
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<Account, AuthError> {
        let id = uuid::Uuid::new_v4().to_string();
        let salt = generate_salt();
        let password_hash = hash_password(password, &salt);
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO users (id, username, password_hash, salt, role, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(username)
        .bind(&password_hash)
        .bind(&salt)
        .bind(role.as_str())
        .bind(&now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(AuthError::UsernameExists);
            }
            Err(e) => return Err(e.into()),
        }

        info!(user_id = %id, %role, "created account '{}'", username);

        Ok(Account {
            id,
            username: username.to_string(),
            role,
            avatar_id: None,
            created_at: now,
        })
    }

    /// Login with username and password, opening a new session
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(Account, Session), AuthError> {
        let row: Option<CredentialRow> = sqlx::query_as(
            "SELECT id, username, role, avatar_id, created_at, password_hash, salt
             FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        let row = row.ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(password, &row.salt, &row.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let now = Utc::now();
        let session = Session {
            token: generate_token(),
            user_id: row.id.clone(),
            expires_at: (now + self.token_ttl).timestamp(),
        };

        let mut tx = begin_write(&self.pool).await?;

        // Sweep every expired session, not just this user's
        let pruned = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now.timestamp())
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if pruned > 0 {
            debug!(pruned, "removed expired sessions");
        }

        sqlx::query(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&session.token)
        .bind(&session.user_id)
        .bind(now.to_rfc3339())
        .bind(session.expires_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(user_id = %row.id, "opened session");

        let account = AccountRow {
            id: row.id,
            username: row.username,
            role: row.role,
            avatar_id: row.avatar_id,
            created_at: row.created_at,
        }
        .into_account()?;

        Ok((account, session))
    }

    /// Validate a token and return the associated account
    pub async fn validate_token(&self, token: &str) -> Result<Option<Account>, AuthError> {
        let row: Option<AccountRow> = sqlx::query_as(
            "SELECT u.id, u.username, u.role, u.avatar_id, u.created_at
             FROM sessions s JOIN users u ON u.id = s.user_id
             WHERE s.token = ? AND s.expires_at > ?",
        )
        .bind(token)
        .bind(Utc::now().timestamp())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    /// Logout by deleting the session
    pub async fn logout(&self, token: &str) -> Result<bool, AuthError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Row type for account queries
#[derive(sqlx::FromRow)]
struct AccountRow {
    id: String,
    username: String,
    role: String,
    avatar_id: Option<String>,
    created_at: String,
}

impl AccountRow {
    fn into_account(self) -> Result<Account, AuthError> {
        let role = self
            .role
            .parse()
            .map_err(|_| AuthError::InvalidRole(self.role.clone()))?;
        Ok(Account {
            id: self.id,
            username: self.username,
            role,
            avatar_id: self.avatar_id,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: String,
    username: String,
    role: String,
    avatar_id: Option<String>,
    created_at: String,
    password_hash: String,
    salt: String,
}
