//! Admin-managed catalog: avatars, elements and map templates

mod avatar;
mod element;
mod map;

pub use avatar::{Avatar, AvatarStore};
pub use element::{Element, ElementStore, NewElement};
pub use map::{Map, MapElement, MapStore, MapSummary, NewMap};

use thiserror::Error;

use crate::dimensions::Dimensions;

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("element not found: {0}")]
    UnknownElement(String),

    #[error("element {element_id} at ({x}, {y}) lies outside {dimensions}")]
    OutOfBounds {
        element_id: String,
        x: u32,
        y: u32,
        dimensions: Dimensions,
    },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
