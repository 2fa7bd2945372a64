//! Catalog API - avatars, elements and maps
//!
//! Reads are public; writes require an admin token.

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{AdminUser, ApiError, AppState, SuccessResponse, ValidatedJson};
use crate::catalog::{Avatar, Element, Map, MapElement, MapSummary, NewElement, NewMap};
use crate::dimensions::Dimensions;

/// Build the catalog router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/avatars", get(list_avatars).post(create_avatar))
        .route("/admin/avatar", post(create_avatar))
        .route("/elements", get(list_elements))
        .route("/admin/element", post(create_element))
        .route("/admin/element/{id}", put(update_element))
        .route("/maps", get(list_maps))
        .route("/maps/{id}", get(get_map))
        .route("/admin/map", post(create_map))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateAvatarRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "imageUrl is required"))]
    image_url: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAvatarResponse {
    avatar_id: String,
}

#[derive(Debug, Serialize)]
struct AvatarListResponse {
    avatars: Vec<Avatar>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateElementRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "imageUrl is required"))]
    image_url: String,
    #[validate(range(min = 1, max = 10000))]
    width: u32,
    #[validate(range(min = 1, max = 10000))]
    height: u32,
    #[serde(rename = "static")]
    is_static: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateElementRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "imageUrl is required"))]
    image_url: String,
}

#[derive(Debug, Serialize)]
struct CreatedResponse {
    id: String,
}

#[derive(Debug, Serialize)]
struct ElementListResponse {
    elements: Vec<Element>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateMapRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "thumbnail is required"))]
    thumbnail: String,
    #[serde(alias = "dimension")]
    dimensions: Dimensions,
    #[serde(default)]
    default_elements: Vec<MapElement>,
}

#[derive(Debug, Serialize)]
struct MapListResponse {
    maps: Vec<MapSummary>,
}

/// POST /avatars (admin)
async fn create_avatar(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(req): ValidatedJson<CreateAvatarRequest>,
) -> Result<Json<CreateAvatarResponse>, ApiError> {
    let avatar = state.avatars.create(&req.image_url, &req.name).await?;
    Ok(Json(CreateAvatarResponse {
        avatar_id: avatar.id,
    }))
}

/// GET /avatars
async fn list_avatars(State(state): State<AppState>) -> Result<Json<AvatarListResponse>, ApiError> {
    let avatars = state.avatars.list().await?;
    Ok(Json(AvatarListResponse { avatars }))
}

/// POST /admin/element
async fn create_element(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(req): ValidatedJson<CreateElementRequest>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let element = state
        .elements
        .create(&NewElement {
            image_url: req.image_url,
            width: req.width,
            height: req.height,
            is_static: req.is_static,
        })
        .await?;
    Ok(Json(CreatedResponse { id: element.id }))
}

/// PUT /admin/element/{id}
async fn update_element(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateElementRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.elements.update_image(&id, &req.image_url).await?;
    Ok(SuccessResponse::ok())
}

/// GET /elements
async fn list_elements(
    State(state): State<AppState>,
) -> Result<Json<ElementListResponse>, ApiError> {
    let elements = state.elements.list().await?;
    Ok(Json(ElementListResponse { elements }))
}

/// POST /admin/map
async fn create_map(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(req): ValidatedJson<CreateMapRequest>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let map = state
        .maps
        .create(&NewMap {
            name: req.name,
            thumbnail: req.thumbnail,
            dimensions: req.dimensions,
            default_elements: req.default_elements,
        })
        .await?;
    Ok(Json(CreatedResponse { id: map.id }))
}

/// GET /maps
async fn list_maps(State(state): State<AppState>) -> Result<Json<MapListResponse>, ApiError> {
    let maps = state.maps.list().await?;
    Ok(Json(MapListResponse { maps }))
}

/// GET /maps/{id} - a map with its default placements
async fn get_map(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Map>, ApiError> {
    let map = state
        .maps
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::BadRequest("map not found".to_string()))?;
    Ok(Json(map))
}
