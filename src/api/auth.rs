//! Authentication API endpoints

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{ApiError, AppState, CurrentUser, SuccessResponse, ValidatedJson};
use crate::auth::Role;

/// Build auth router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user/signup", post(signup))
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/user/signin", post(signin))
        .route("/signout", post(signout))
}

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 64, message = "username is required"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    /// Defaults to `user`
    #[serde(rename = "type", default)]
    pub role: Option<Role>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub user_id: String,
}

/// Signin request
#[derive(Debug, Deserialize, Validate)]
pub struct SigninRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninResponse {
    pub token: String,
    pub user_id: String,
    pub role: Role,
}

/// POST /user/signup
async fn signup(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> Result<Json<SignupResponse>, ApiError> {
    let account = state
        .accounts
        .create(&req.username, &req.password, req.role.unwrap_or_default())
        .await?;

    Ok(Json(SignupResponse {
        user_id: account.id,
    }))
}

/// POST /signin
async fn signin(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SigninRequest>,
) -> Result<Json<SigninResponse>, ApiError> {
    let (account, session) = state.accounts.login(&req.username, &req.password).await?;

    Ok(Json(SigninResponse {
        token: session.token,
        user_id: account.id,
        role: account.role,
    }))
}

/// POST /signout - invalidates the presented token
async fn signout(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.accounts.logout(&user.token).await?;
    Ok(SuccessResponse::ok())
}
