//! Element catalog

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use super::CatalogError;

/// A placeable visual asset
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: String,
    pub image_url: String,
    pub width: u32,
    pub height: u32,
    /// Static elements block movement
    #[serde(rename = "static")]
    pub is_static: bool,
}

/// Fields for a new element
#[derive(Debug, Clone)]
pub struct NewElement {
    pub image_url: String,
    pub width: u32,
    pub height: u32,
    pub is_static: bool,
}

/// Element storage with database backing
pub struct ElementStore {
    pool: SqlitePool,
}

impl ElementStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new element
    pub async fn create(&self, new: &NewElement) -> Result<Element, CatalogError> {
        let element = Element {
            id: uuid::Uuid::new_v4().to_string(),
            image_url: new.image_url.clone(),
            width: new.width,
            height: new.height,
            is_static: new.is_static,
        };

        sqlx::query(
            "INSERT INTO elements (id, image_url, width, height, is_static) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&element.id)
        .bind(&element.image_url)
        .bind(element.width)
        .bind(element.height)
        .bind(element.is_static)
        .execute(&self.pool)
        .await?;

        info!(element_id = %element.id, "created {}x{} element", element.width, element.height);
        Ok(element)
    }

    /// All elements, oldest first
    pub async fn list(&self) -> Result<Vec<Element>, CatalogError> {
        let elements = sqlx::query_as(
            "SELECT id, image_url, width, height, is_static FROM elements ORDER BY created_at, rowid",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(elements)
    }

    /// Replace an element's image
    pub async fn update_image(&self, id: &str, image_url: &str) -> Result<(), CatalogError> {
        let result = sqlx::query("UPDATE elements SET image_url = ? WHERE id = ?")
            .bind(image_url)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::UnknownElement(id.to_string()));
        }
        Ok(())
    }
}
