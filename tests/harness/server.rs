//! TestServer - end-to-end test harness
//!
//! Starts the arenad `Server` in-process on an ephemeral port, backed by an
//! on-disk SQLite database in a temporary directory. Each test gets its own
//! server and database, so tests never share state.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use arenad::{Config, Server};
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Password used for every account the harness creates
pub const PASSWORD: &str = "correct-horse";

/// A signed-in user
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    pub user_id: String,
    pub token: String,
}

/// Test harness running a real server on a random port
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    server: Arc<Server>,
    task: JoinHandle<()>,
    /// Temp directory holding the database (cleaned up on drop)
    _temp_dir: TempDir,
    /// Path to the database file
    pub db_path: PathBuf,
}

impl TestServer {
    /// Start a new test server instance
    pub async fn start() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("test.db");

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let config = Config {
            bind_addr: addr,
            db_path: Some(db_path.to_string_lossy().into_owned()),
            ..Config::default()
        };
        let server = Arc::new(Server::new(config).await?);

        let serving = server.clone();
        let task = tokio::spawn(async move {
            if let Err(e) = serving.serve(listener).await {
                eprintln!("test server exited with error: {}", e);
            }
        });

        let client = Client::builder().timeout(Duration::from_secs(5)).build()?;

        // The listener is already bound, but poll health so the router is
        // known to be serving before the first real request.
        let mut ready = false;
        for _ in 0..50 {
            if client
                .get(format!("http://{}/health", addr))
                .send()
                .await
                .is_ok()
            {
                ready = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        if !ready {
            return Err(anyhow!("server failed to start on {}", addr));
        }

        Ok(Self {
            addr,
            client,
            server,
            task,
            _temp_dir: temp_dir,
            db_path,
        })
    }

    /// Get the base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Direct database access for assertions
    pub fn pool(&self) -> sqlx::SqlitePool {
        self.server.db().pool().clone()
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Make an authenticated GET request
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    /// Make an authenticated POST request
    pub async fn post_auth<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        token: &str,
    ) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Make an authenticated PUT request
    pub async fn put_auth<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        token: &str,
    ) -> Result<Response> {
        Ok(self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Make an authenticated DELETE request without a body
    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    /// Make an authenticated DELETE request with a JSON body
    pub async fn delete_json_auth<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        token: &str,
    ) -> Result<Response> {
        Ok(self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Sign up with the given account type, then sign in
    pub async fn signup_and_signin(&self, username: &str, role: &str) -> Result<Session> {
        let resp = self
            .post(
                "/api/v1/user/signup",
                &json!({ "username": username, "password": PASSWORD, "type": role }),
            )
            .await?;
        if !resp.status().is_success() {
            return Err(anyhow!("signup for {} failed: {}", username, resp.status()));
        }

        let resp = self
            .post(
                "/api/v1/signin",
                &json!({ "username": username, "password": PASSWORD }),
            )
            .await?;
        if !resp.status().is_success() {
            return Err(anyhow!("signin for {} failed: {}", username, resp.status()));
        }
        let body: Value = resp.json().await?;

        Ok(Session {
            username: username.to_string(),
            user_id: string_field(&body, "userId")?,
            token: string_field(&body, "token")?,
        })
    }

    /// Signed-in admin
    pub async fn admin(&self, username: &str) -> Result<Session> {
        self.signup_and_signin(username, "admin").await
    }

    /// Signed-in regular user
    pub async fn user(&self, username: &str) -> Result<Session> {
        self.signup_and_signin(username, "user").await
    }

    /// Create a catalog element as `admin`, returning its id
    pub async fn create_element(&self, admin: &Session, width: u32, height: u32) -> Result<String> {
        let resp = self
            .post_auth(
                "/api/v1/admin/element",
                &json!({
                    "imageUrl": "https://img.example/tree.png",
                    "width": width,
                    "height": height,
                    "static": true,
                }),
                &admin.token,
            )
            .await?;
        created_id(resp, "id").await
    }

    /// Create an avatar as `admin`, returning its id
    pub async fn create_avatar(&self, admin: &Session, name: &str) -> Result<String> {
        let resp = self
            .post_auth(
                "/api/v1/admin/avatar",
                &json!({
                    "imageUrl": format!("https://img.example/{}.png", name),
                    "name": name,
                }),
                &admin.token,
            )
            .await?;
        created_id(resp, "avatarId").await
    }

    /// Create a 100x200 map whose default elements are `elements` placed
    /// along the diagonal
    pub async fn create_map(&self, admin: &Session, elements: &[&str]) -> Result<String> {
        let defaults: Vec<Value> = elements
            .iter()
            .enumerate()
            .map(|(i, id)| json!({ "elementId": id, "x": i * 10, "y": i * 10 }))
            .collect();
        let resp = self
            .post_auth(
                "/api/v1/admin/map",
                &json!({
                    "name": "meadow",
                    "thumbnail": "https://img.example/meadow.png",
                    "dimensions": "100x200",
                    "defaultElements": defaults,
                }),
                &admin.token,
            )
            .await?;
        created_id(resp, "id").await
    }

    /// Create a space owned by `owner`, returning its id
    pub async fn create_space(&self, owner: &Session, body: Value) -> Result<String> {
        let resp = self.post_auth("/api/v1/space", &body, &owner.token).await?;
        created_id(resp, "spaceId").await
    }
}

fn string_field(body: &Value, field: &str) -> Result<String> {
    body[field]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("response missing {}: {}", field, body))
}

async fn created_id(resp: Response, field: &str) -> Result<String> {
    let status = resp.status();
    let body: Value = resp.json().await?;
    if !status.is_success() {
        return Err(anyhow!("create failed with {}: {}", status, body));
    }
    string_field(&body, field)
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server.shutdown();
        self.task.abort();
    }
}
