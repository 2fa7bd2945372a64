//! Space registry
//!
//! A space is a user-owned area holding element placements, either empty or
//! seeded from a map template. Only the owner may delete a space or change
//! its placements.

mod store;

pub use store::SpaceStore;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::Element;
use crate::dimensions::Dimensions;

/// An element placed in a space
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// Placement ID, distinct from the element's catalog ID
    pub id: String,
    pub element: Element,
    pub x: u32,
    pub y: u32,
}

/// A space with all its placements
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub id: String,
    pub name: String,
    pub dimensions: Dimensions,
    pub thumbnail: Option<String>,
    pub owner_id: String,
    pub elements: Vec<Placement>,
}

/// Space without placements, for listings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceSummary {
    pub id: String,
    pub name: String,
    pub dimensions: Dimensions,
    pub thumbnail: Option<String>,
}

/// Fields for a new space; at least one of dimensions or map_id is required
#[derive(Debug, Clone, Default)]
pub struct NewSpace {
    pub name: String,
    pub dimensions: Option<Dimensions>,
    pub map_id: Option<String>,
}

/// Space registry errors
#[derive(Debug, Error)]
pub enum SpaceError {
    #[error("space not found")]
    NotFound,

    #[error("space belongs to another user")]
    NotOwner,

    #[error("either dimensions or mapId is required")]
    MissingDimensions,

    #[error("map not found: {0}")]
    UnknownMap(String),

    #[error("element not found: {0}")]
    UnknownElement(String),

    #[error("point ({x}, {y}) lies outside {dimensions}")]
    OutOfBounds {
        x: u32,
        y: u32,
        dimensions: Dimensions,
    },

    #[error("element is not placed in this space")]
    PlacementNotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
