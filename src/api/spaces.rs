//! Space API - create, inspect, delete spaces and arrange their elements

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{ApiError, AppState, CurrentUser, SuccessResponse, ValidatedJson};
use crate::dimensions::Dimensions;
use crate::space::{NewSpace, Placement, SpaceError, SpaceSummary};

/// Build the space router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/space", post(create_space))
        .route("/space/all", get(list_spaces))
        .route("/space/element", post(add_element).delete(remove_element))
        .route("/space/{id}", get(get_space).delete(delete_space))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateSpaceRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 128, message = "name is required"))]
    name: String,
    #[serde(default, alias = "dimension")]
    dimensions: Option<Dimensions>,
    #[serde(default)]
    map_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSpaceResponse {
    space_id: String,
}

#[derive(Debug, Serialize)]
struct SpaceListResponse {
    spaces: Vec<SpaceSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpaceResponse {
    id: String,
    name: String,
    dimensions: Dimensions,
    thumbnail: Option<String>,
    elements: Vec<Placement>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct AddElementRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "spaceId is required"))]
    space_id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "elementId is required"))]
    element_id: String,
    x: u32,
    y: u32,
}

#[derive(Debug, Serialize)]
struct AddElementResponse {
    id: String,
}

/// `element_id` is the placement ID reported by GET /space/{id}
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct RemoveElementRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "spaceId is required"))]
    space_id: String,
    #[serde(default, alias = "id")]
    #[validate(length(min = 1, message = "elementId is required"))]
    element_id: String,
}

/// POST /space
async fn create_space(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(req): ValidatedJson<CreateSpaceRequest>,
) -> Result<Json<CreateSpaceResponse>, ApiError> {
    let space = state
        .spaces
        .create(
            &user.account.id,
            &NewSpace {
                name: req.name,
                dimensions: req.dimensions,
                map_id: req.map_id,
            },
        )
        .await?;

    Ok(Json(CreateSpaceResponse { space_id: space.id }))
}

/// GET /space/all - spaces owned by the caller
async fn list_spaces(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<SpaceListResponse>, ApiError> {
    let spaces = state.spaces.list_for_owner(&user.account.id).await?;
    Ok(Json(SpaceListResponse { spaces }))
}

/// GET /space/{id}
async fn get_space(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SpaceResponse>, ApiError> {
    let space = state.spaces.get(&id).await?.ok_or(SpaceError::NotFound)?;

    Ok(Json(SpaceResponse {
        id: space.id,
        name: space.name,
        dimensions: space.dimensions,
        thumbnail: space.thumbnail,
        elements: space.elements,
    }))
}

/// DELETE /space/{id} - owner only
async fn delete_space(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.spaces.delete(&id, &user.account.id).await?;
    Ok(SuccessResponse::ok())
}

/// POST /space/element - owner only
async fn add_element(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(req): ValidatedJson<AddElementRequest>,
) -> Result<Json<AddElementResponse>, ApiError> {
    let placement = state
        .spaces
        .add_element(&req.space_id, &user.account.id, &req.element_id, req.x, req.y)
        .await?;
    Ok(Json(AddElementResponse { id: placement.id }))
}

/// DELETE /space/element - owner only
async fn remove_element(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(req): ValidatedJson<RemoveElementRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .spaces
        .remove_element(&req.space_id, &user.account.id, &req.element_id)
        .await?;
    Ok(SuccessResponse::ok())
}
