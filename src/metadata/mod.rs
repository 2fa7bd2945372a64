//! User metadata: each user's selected avatar, with bulk lookup

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use thiserror::Error;
use tracing::debug;

/// Upper bound on ids in one bulk lookup
pub const MAX_BULK_IDS: usize = 100;

/// Avatar info for one user
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserAvatar {
    pub user_id: String,
    pub avatar_id: Option<String>,
    pub image_url: Option<String>,
}

/// Metadata errors
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("avatar not found: {0}")]
    UnknownAvatar(String),

    #[error("user not found")]
    UnknownUser,

    #[error("at most {} ids may be requested at once", MAX_BULK_IDS)]
    TooManyIds,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Parse an id list such as `[a,b,c]`, `a,b` or `[ a , b ]`
///
/// Empty entries are skipped and duplicates dropped, keeping first-seen order.
pub fn parse_id_list(raw: &str) -> Result<Vec<String>, MetadataError> {
    let inner = raw.trim();
    let inner = inner.strip_prefix('[').unwrap_or(inner);
    let inner = inner.strip_suffix(']').unwrap_or(inner);

    let mut seen = HashSet::new();
    let ids: Vec<String> = inner
        .split(',')
        .map(|id| id.trim().trim_matches('"').trim())
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(id.to_string()))
        .map(str::to_string)
        .collect();

    if ids.len() > MAX_BULK_IDS {
        return Err(MetadataError::TooManyIds);
    }
    Ok(ids)
}

/// Metadata storage with database backing
pub struct MetadataStore {
    pool: SqlitePool,
}

impl MetadataStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Set a user's avatar; the avatar must exist
    pub async fn set_avatar(&self, user_id: &str, avatar_id: &str) -> Result<(), MetadataError> {
        let avatar: Option<(String,)> = sqlx::query_as("SELECT id FROM avatars WHERE id = ?")
            .bind(avatar_id)
            .fetch_optional(&self.pool)
            .await?;
        if avatar.is_none() {
            return Err(MetadataError::UnknownAvatar(avatar_id.to_string()));
        }

        let result = sqlx::query("UPDATE users SET avatar_id = ? WHERE id = ?")
            .bind(avatar_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(MetadataError::UnknownUser);
        }

        debug!(user_id, avatar_id, "updated avatar");
        Ok(())
    }

    /// Avatar info for each known user, in request order; unknown ids are skipped
    pub async fn bulk(&self, user_ids: &[String]) -> Result<Vec<UserAvatar>, MetadataError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        if user_ids.len() > MAX_BULK_IDS {
            return Err(MetadataError::TooManyIds);
        }

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT u.id AS user_id, u.avatar_id, a.image_url
             FROM users u LEFT JOIN avatars a ON a.id = u.avatar_id
             WHERE u.id IN (",
        );
        let mut separated = query.separated(", ");
        for id in user_ids {
            separated.push_bind(id.clone());
        }
        separated.push_unseparated(")");

        let rows: Vec<UserAvatar> = query.build_query_as().fetch_all(&self.pool).await?;

        let mut by_id: HashMap<String, UserAvatar> = rows
            .into_iter()
            .map(|row| (row.user_id.clone(), row))
            .collect();

        Ok(user_ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }
}
