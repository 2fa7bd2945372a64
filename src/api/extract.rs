//! Request extractors: validated JSON bodies and bearer-token users

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::{header, request::Parts};
use axum::Json;
use serde::de::DeserializeOwned;
use tracing::warn;
use validator::Validate;

use super::{ApiError, AppState};
use crate::auth::accounts::Account;
use crate::auth::bearer_token;

/// Like `axum::Json<T>`, but every rejection is a 400 and the body is run
/// through `validator::Validate` before the handler sees it.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        value.validate().map_err(|errors| {
            let fields: Vec<String> = errors
                .field_errors()
                .iter()
                .flat_map(|(field, errs)| {
                    errs.iter().map(move |e| match &e.message {
                        Some(message) => format!("{}: {}", field, message),
                        None => format!("{}: {}", field, e.code),
                    })
                })
                .collect();

            if fields.is_empty() {
                ApiError::BadRequest("validation failed".to_string())
            } else {
                ApiError::BadRequest(fields.join("; "))
            }
        })?;

        Ok(ValidatedJson(value))
    }
}

/// The account behind a valid `Authorization: Bearer <token>` header
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub account: Account,
    pub token: String,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or(ApiError::MissingToken)?
            .to_string();

        match state.accounts.validate_token(&token).await? {
            Some(account) => Ok(CurrentUser { account, token }),
            None => {
                warn!(path = %parts.uri.path(), "rejected unknown or expired token");
                Err(ApiError::InvalidToken)
            }
        }
    }
}

/// A `CurrentUser` whose role is admin
#[derive(Debug, Clone)]
pub struct AdminUser(pub Account);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser { account, .. } = CurrentUser::from_request_parts(parts, state).await?;
        if !account.is_admin() {
            warn!(user_id = %account.id, path = %parts.uri.path(), "non-admin on admin endpoint");
            return Err(ApiError::AdminRequired);
        }
        Ok(AdminUser(account))
    }
}
