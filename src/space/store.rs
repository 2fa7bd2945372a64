//! Space persistence

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use super::{NewSpace, Placement, Space, SpaceError, SpaceSummary};
use crate::catalog::{Element, MapElement};
use crate::db::begin_write;
use crate::dimensions::Dimensions;

/// Space storage with database backing
pub struct SpaceStore {
    pool: SqlitePool,
}

impl SpaceStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a space, cloning the map's default placements when a map is given
    ///
    /// Dimensions fall back to the map's when omitted.
    pub async fn create(&self, owner_id: &str, new: &NewSpace) -> Result<SpaceSummary, SpaceError> {
        let mut tx = begin_write(&self.pool).await?;

        let (dimensions, thumbnail, defaults) = match (new.dimensions, new.map_id.as_deref()) {
            (None, None) => return Err(SpaceError::MissingDimensions),
            (Some(dimensions), None) => (dimensions, None, Vec::new()),
            (requested, Some(map_id)) => {
                let map: Option<(String, u32, u32)> =
                    sqlx::query_as("SELECT thumbnail, width, height FROM maps WHERE id = ?")
                        .bind(map_id)
                        .fetch_optional(&mut *tx)
                        .await?;
                let (thumbnail, width, height) =
                    map.ok_or_else(|| SpaceError::UnknownMap(map_id.to_string()))?;

                let dimensions = requested.unwrap_or(Dimensions { width, height });

                let defaults: Vec<MapElement> = sqlx::query_as(
                    "SELECT element_id, x, y FROM map_elements WHERE map_id = ? ORDER BY position",
                )
                .bind(map_id)
                .fetch_all(&mut *tx)
                .await?;

                if let Some(outside) = defaults.iter().find(|p| !dimensions.contains(p.x, p.y)) {
                    return Err(SpaceError::OutOfBounds {
                        x: outside.x,
                        y: outside.y,
                        dimensions,
                    });
                }

                (dimensions, Some(thumbnail), defaults)
            }
        };

        let id = uuid::Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO spaces (id, name, width, height, thumbnail, owner_id) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new.name)
        .bind(dimensions.width)
        .bind(dimensions.height)
        .bind(&thumbnail)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

        for placement in &defaults {
            insert_placement(&mut tx, &id, &placement.element_id, placement.x, placement.y).await?;
        }

        tx.commit().await?;

        info!(
            space_id = %id,
            owner_id,
            "created {} space '{}' with {} elements",
            dimensions,
            new.name,
            defaults.len()
        );

        Ok(SpaceSummary {
            id,
            name: new.name.clone(),
            dimensions,
            thumbnail,
        })
    }

    /// Get a space with its placements in the order they were added
    pub async fn get(&self, id: &str) -> Result<Option<Space>, SpaceError> {
        let row: Option<SpaceRow> = sqlx::query_as(
            "SELECT id, name, width, height, thumbnail, owner_id FROM spaces WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let placements: Vec<PlacementRow> = sqlx::query_as(
            r#"
            SELECT se.id, se.x, se.y,
                   e.id AS element_id, e.image_url, e.width, e.height, e.is_static
            FROM space_elements se
            JOIN elements e ON e.id = se.element_id
            WHERE se.space_id = ?
            ORDER BY se.created_at, se.rowid
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(Space {
            id: row.id,
            name: row.name,
            dimensions: Dimensions {
                width: row.width,
                height: row.height,
            },
            thumbnail: row.thumbnail,
            owner_id: row.owner_id,
            elements: placements.into_iter().map(PlacementRow::into_placement).collect(),
        }))
    }

    /// Spaces owned by a user, oldest first
    pub async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<SpaceSummary>, SpaceError> {
        let rows: Vec<SpaceRow> = sqlx::query_as(
            "SELECT id, name, width, height, thumbnail, owner_id FROM spaces
             WHERE owner_id = ? ORDER BY created_at, rowid",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SpaceRow::into_summary).collect())
    }

    /// Delete a space and its placements; only the owner may do this
    pub async fn delete(&self, id: &str, requester_id: &str) -> Result<(), SpaceError> {
        let mut tx = begin_write(&self.pool).await?;
        owned_space(&mut tx, id, requester_id).await?;

        sqlx::query("DELETE FROM space_elements WHERE space_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM spaces WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(space_id = %id, "deleted space");
        Ok(())
    }

    /// Place a catalog element in a space
    pub async fn add_element(
        &self,
        space_id: &str,
        requester_id: &str,
        element_id: &str,
        x: u32,
        y: u32,
    ) -> Result<Placement, SpaceError> {
        let mut tx = begin_write(&self.pool).await?;
        let space = owned_space(&mut tx, space_id, requester_id).await?;

        let dimensions = Dimensions {
            width: space.width,
            height: space.height,
        };
        if !dimensions.contains(x, y) {
            return Err(SpaceError::OutOfBounds { x, y, dimensions });
        }

        let element: Option<Element> = sqlx::query_as(
            "SELECT id, image_url, width, height, is_static FROM elements WHERE id = ?",
        )
        .bind(element_id)
        .fetch_optional(&mut *tx)
        .await?;
        let element = element.ok_or_else(|| SpaceError::UnknownElement(element_id.to_string()))?;

        let id = insert_placement(&mut tx, space_id, element_id, x, y).await?;
        tx.commit().await?;

        debug!(space_id, placement_id = %id, "placed element {} at ({}, {})", element_id, x, y);
        Ok(Placement { id, element, x, y })
    }

    /// Remove a placement from a space by placement ID
    pub async fn remove_element(
        &self,
        space_id: &str,
        requester_id: &str,
        placement_id: &str,
    ) -> Result<(), SpaceError> {
        let mut tx = begin_write(&self.pool).await?;
        owned_space(&mut tx, space_id, requester_id).await?;

        let result = sqlx::query("DELETE FROM space_elements WHERE id = ? AND space_id = ?")
            .bind(placement_id)
            .bind(space_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(SpaceError::PlacementNotFound);
        }

        tx.commit().await?;

        debug!(space_id, placement_id, "removed placement");
        Ok(())
    }
}

/// Load a space, failing unless it exists and belongs to the requester
async fn owned_space(
    conn: &mut SqliteConnection,
    id: &str,
    requester_id: &str,
) -> Result<SpaceRow, SpaceError> {
    let row: Option<SpaceRow> = sqlx::query_as(
        "SELECT id, name, width, height, thumbnail, owner_id FROM spaces WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    let row = row.ok_or(SpaceError::NotFound)?;
    if row.owner_id != requester_id {
        return Err(SpaceError::NotOwner);
    }
    Ok(row)
}

async fn insert_placement(
    conn: &mut SqliteConnection,
    space_id: &str,
    element_id: &str,
    x: u32,
    y: u32,
) -> Result<String, sqlx::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO space_elements (id, space_id, element_id, x, y) VALUES (?, ?, ?, ?, ?)")
        .bind(&id)
        .bind(space_id)
        .bind(element_id)
        .bind(x)
        .bind(y)
        .execute(&mut *conn)
        .await?;
    Ok(id)
}

/// Row type for space queries
#[derive(sqlx::FromRow)]
struct SpaceRow {
    id: String,
    name: String,
    width: u32,
    height: u32,
    thumbnail: Option<String>,
    owner_id: String,
}

impl SpaceRow {
    fn into_summary(self) -> SpaceSummary {
        SpaceSummary {
            id: self.id,
            name: self.name,
            dimensions: Dimensions {
                width: self.width,
                height: self.height,
            },
            thumbnail: self.thumbnail,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PlacementRow {
    id: String,
    x: u32,
    y: u32,
    element_id: String,
    image_url: String,
    width: u32,
    height: u32,
    is_static: bool,
}

impl PlacementRow {
    fn into_placement(self) -> Placement {
        Placement {
            id: self.id,
            element: Element {
                id: self.element_id,
                image_url: self.image_url,
                width: self.width,
                height: self.height,
                is_static: self.is_static,
            },
            x: self.x,
            y: self.y,
        }
    }
}
