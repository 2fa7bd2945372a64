//! HTTP API module - REST endpoints under /api/v1

mod auth;
mod catalog;
mod error;
mod extract;
mod metadata;
mod spaces;

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::accounts::AccountService;
use crate::catalog::{AvatarStore, ElementStore, MapStore};
use crate::config::Config;
use crate::db::Database;
use crate::metadata::MetadataStore;
use crate::space::SpaceStore;
pub use error::{ApiError, ErrorResponse};
pub use extract::{AdminUser, CurrentUser, ValidatedJson};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub accounts: Arc<AccountService>,
    pub avatars: Arc<AvatarStore>,
    pub elements: Arc<ElementStore>,
    pub maps: Arc<MapStore>,
    pub spaces: Arc<SpaceStore>,
    pub metadata: Arc<MetadataStore>,
}

impl AppState {
    pub fn new(db: Arc<Database>, config: &Config) -> Self {
        let pool = db.pool().clone();
        Self {
            accounts: Arc::new(AccountService::new(pool.clone(), config.token_ttl())),
            avatars: Arc::new(AvatarStore::new(pool.clone())),
            elements: Arc::new(ElementStore::new(pool.clone())),
            maps: Arc::new(MapStore::new(pool.clone())),
            spaces: Arc::new(SpaceStore::new(pool.clone())),
            metadata: Arc::new(MetadataStore::new(pool)),
            db,
        }
    }
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    let v1 = Router::new()
        .merge(auth::router())
        .merge(catalog::router())
        .merge(spaces::router())
        .merge(metadata::router());

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(root))
        .nest("/api/v1", v1)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Body for endpoints that only report success
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

/// Root endpoint
async fn root() -> impl IntoResponse {
    Json(RootResponse {
        name: "arenad",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct RootResponse {
    name: &'static str,
    version: &'static str,
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                database: "ok",
            }),
        ),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy",
                database: "error",
            }),
        ),
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
}
