//! User metadata API

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{ApiError, AppState, CurrentUser, SuccessResponse, ValidatedJson};
use crate::metadata::{parse_id_list, UserAvatar};

/// Build the metadata router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user/metadata", post(update_metadata))
        .route("/user/metadata/bulk", get(bulk_metadata))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateMetadataRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "avatarId is required"))]
    avatar_id: String,
}

#[derive(Debug, Deserialize)]
struct BulkQuery {
    #[serde(default)]
    ids: String,
}

#[derive(Debug, Serialize)]
struct BulkResponse {
    avatars: Vec<UserAvatar>,
}

/// POST /user/metadata - set the caller's avatar
async fn update_metadata(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(req): ValidatedJson<UpdateMetadataRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .metadata
        .set_avatar(&user.account.id, &req.avatar_id)
        .await?;
    Ok(SuccessResponse::ok())
}

/// GET /user/metadata/bulk?ids=[a,b]
async fn bulk_metadata(
    State(state): State<AppState>,
    Query(query): Query<BulkQuery>,
) -> Result<Json<BulkResponse>, ApiError> {
    let ids = parse_id_list(&query.ids)?;
    let avatars = state.metadata.bulk(&ids).await?;
    Ok(Json(BulkResponse { avatars }))
}
