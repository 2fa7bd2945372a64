//! Server configuration
//!
//! Layered with figment: built-in defaults, then `arenad.toml` (or an
//! explicit file), then `ARENAD_*` environment variables. Command-line
//! flags are applied on top by the binary.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use chrono::Duration;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Config file read when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "arenad.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "ARENAD_";

const MAX_TOKEN_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// SQLite file; None = in-memory
    pub db_path: Option<String>,
    /// Lifetime of a signin token
    pub token_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 3000)),
            db_path: None,
            token_ttl_secs: 7 * 24 * 60 * 60,
        }
    }
}

impl Config {
    /// Build the provider chain without extracting
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let file = config_file
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load configuration from defaults, file and environment
    pub fn load(config_file: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(config_file).extract()
    }

    /// Token lifetime as a duration, capped at ten years
    pub fn token_ttl(&self) -> Duration {
        let secs = i64::try_from(self.token_ttl_secs)
            .unwrap_or(MAX_TOKEN_TTL_SECS)
            .min(MAX_TOKEN_TTL_SECS);
        Duration::seconds(secs)
    }
}
