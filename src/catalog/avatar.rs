//! Avatar catalog

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use super::CatalogError;

/// A user-selectable profile image
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Avatar {
    pub id: String,
    pub image_url: String,
    pub name: String,
}

/// Avatar storage with database backing
pub struct AvatarStore {
    pool: SqlitePool,
}

impl AvatarStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new avatar
    pub async fn create(&self, image_url: &str, name: &str) -> Result<Avatar, CatalogError> {
        let avatar = Avatar {
            id: uuid::Uuid::new_v4().to_string(),
            image_url: image_url.to_string(),
            name: name.to_string(),
        };

        sqlx::query("INSERT INTO avatars (id, image_url, name) VALUES (?, ?, ?)")
            .bind(&avatar.id)
            .bind(&avatar.image_url)
            .bind(&avatar.name)
            .execute(&self.pool)
            .await?;

        info!(avatar_id = %avatar.id, "created avatar '{}'", avatar.name);
        Ok(avatar)
    }

    /// All avatars, oldest first
    pub async fn list(&self) -> Result<Vec<Avatar>, CatalogError> {
        let avatars =
            sqlx::query_as("SELECT id, image_url, name FROM avatars ORDER BY created_at, rowid")
                .fetch_all(&self.pool)
                .await?;
        Ok(avatars)
    }
}
