//! Map templates: dimensions plus an ordered list of default placements

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

use super::CatalogError;
use crate::db::begin_write;
use crate::dimensions::Dimensions;

/// One default placement of an element on a map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MapElement {
    pub element_id: String,
    pub x: u32,
    pub y: u32,
}

/// A map template
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Map {
    pub id: String,
    pub name: Option<String>,
    pub thumbnail: String,
    pub dimensions: Dimensions,
    pub default_elements: Vec<MapElement>,
}

/// Map without its placements, for listings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSummary {
    pub id: String,
    pub name: Option<String>,
    pub thumbnail: String,
    pub dimensions: Dimensions,
}

/// Fields for a new map
#[derive(Debug, Clone)]
pub struct NewMap {
    pub name: Option<String>,
    pub thumbnail: String,
    pub dimensions: Dimensions,
    pub default_elements: Vec<MapElement>,
}

/// Map storage with database backing
pub struct MapStore {
    pool: SqlitePool,
}

impl MapStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a map and its default placements in one transaction
    pub async fn create(&self, new: &NewMap) -> Result<Map, CatalogError> {
        let mut tx = begin_write(&self.pool).await?;

        for placement in &new.default_elements {
            if !new.dimensions.contains(placement.x, placement.y) {
                return Err(CatalogError::OutOfBounds {
                    element_id: placement.element_id.clone(),
                    x: placement.x,
                    y: placement.y,
                    dimensions: new.dimensions,
                });
            }

            let exists: Option<(String,)> = sqlx::query_as("SELECT id FROM elements WHERE id = ?")
                .bind(&placement.element_id)
                .fetch_optional(&mut *tx)
                .await?;
            if exists.is_none() {
                return Err(CatalogError::UnknownElement(placement.element_id.clone()));
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO maps (id, name, thumbnail, width, height) VALUES (?, ?, ?, ?, ?)")
            .bind(&id)
            .bind(&new.name)
            .bind(&new.thumbnail)
            .bind(new.dimensions.width)
            .bind(new.dimensions.height)
            .execute(&mut *tx)
            .await?;

        for (position, placement) in new.default_elements.iter().enumerate() {
            sqlx::query(
                "INSERT INTO map_elements (id, map_id, element_id, x, y, position)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(&id)
            .bind(&placement.element_id)
            .bind(placement.x)
            .bind(placement.y)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            map_id = %id,
            "created {} map with {} default elements",
            new.dimensions,
            new.default_elements.len()
        );

        Ok(Map {
            id,
            name: new.name.clone(),
            thumbnail: new.thumbnail.clone(),
            dimensions: new.dimensions,
            default_elements: new.default_elements.clone(),
        })
    }

    /// Get a map with its placements in order
    pub async fn get(&self, id: &str) -> Result<Option<Map>, CatalogError> {
        let row: Option<MapRow> =
            sqlx::query_as("SELECT id, name, thumbnail, width, height FROM maps WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let default_elements: Vec<MapElement> = sqlx::query_as(
            "SELECT element_id, x, y FROM map_elements WHERE map_id = ? ORDER BY position",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let summary = row.into_summary();
        Ok(Some(Map {
            id: summary.id,
            name: summary.name,
            thumbnail: summary.thumbnail,
            dimensions: summary.dimensions,
            default_elements,
        }))
    }

    /// All maps, oldest first
    pub async fn list(&self) -> Result<Vec<MapSummary>, CatalogError> {
        let rows: Vec<MapRow> = sqlx::query_as(
            "SELECT id, name, thumbnail, width, height FROM maps ORDER BY created_at, rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MapRow::into_summary).collect())
    }
}

/// Row type for map queries
#[derive(sqlx::FromRow)]
struct MapRow {
    id: String,
    name: Option<String>,
    thumbnail: String,
    width: u32,
    height: u32,
}

impl MapRow {
    fn into_summary(self) -> MapSummary {
        MapSummary {
            id: self.id,
            name: self.name,
            thumbnail: self.thumbnail,
            dimensions: Dimensions {
                width: self.width,
                height: self.height,
            },
        }
    }
}
