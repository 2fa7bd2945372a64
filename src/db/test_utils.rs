//! Shared test utilities for database operations
//!
//! `test_pool()` builds an in-memory database with the full schema, and the
//! `seed_*` helpers insert rows directly so store tests do not depend on
//! each other's services. `disk_pool()` gives a multi-connection on-disk
//! database for tests that need real lock contention.

use sqlx::SqlitePool;
use tempfile::TempDir;

use super::Database;

/// Create an in-memory test database pool with full schema
pub async fn test_pool() -> SqlitePool {
    let db = Database::new(None)
        .await
        .expect("Failed to create test database");
    db.pool().clone()
}

/// Create an on-disk test database; keep the `TempDir` alive while the pool is used
pub async fn disk_pool() -> (TempDir, SqlitePool) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("test.db");
    let db = Database::new(Some(path.to_str().expect("temp path is UTF-8")))
        .await
        .expect("Failed to create on-disk test database");
    (dir, db.pool().clone())
}

/// Insert a user row and return its id
pub async fn seed_user(pool: &SqlitePool, username: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO users (id, username, password_hash, salt) VALUES (?, ?, 'x', 'x')")
        .bind(&id)
        .bind(username)
        .execute(pool)
        .await
        .expect("Failed to seed user");
    id
}

/// Insert a 1x1 element row and return its id
pub async fn seed_element(pool: &SqlitePool, image_url: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO elements (id, image_url, width, height, is_static) VALUES (?, ?, 1, 1, 1)")
        .bind(&id)
        .bind(image_url)
        .execute(pool)
        .await
        .expect("Failed to seed element");
    id
}

/// Insert an avatar row and return its id
pub async fn seed_avatar(pool: &SqlitePool, name: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO avatars (id, image_url, name) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(format!("https://img.example/{}.png", name))
        .bind(name)
        .execute(pool)
        .await
        .expect("Failed to seed avatar");
    id
}
