use serde::Deserialize;
use showcase_core::{BannerTiming, EngagementPolicy};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    pub store: StoreConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub banner: BannerConfig,
    #[serde(default)]
    pub engagement: EngagementConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Talk to the hosted document store and auth service.
    #[default]
    Remote,
    /// Keep everything in process memory.
    Memory,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BackendConfig {
    #[serde(default)]
    pub mode: BackendMode,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_auth_endpoint")]
    pub endpoint: String,
    pub api_key: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Signing secret for tokens minted by the in-memory backend.
    #[serde(default = "default_token_secret")]
    pub token_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    /// Directory for per-front-end storage files. Unset keeps sessions in memory.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BannerConfig {
    #[serde(default = "default_loading_ms")]
    pub loading_ms: u64,
    #[serde(default = "default_result_ms")]
    pub result_ms: u64,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            loading_ms: default_loading_ms(),
            result_ms: default_result_ms(),
        }
    }
}

impl BannerConfig {
    pub fn timing(&self) -> BannerTiming {
        BannerTiming {
            loading: Duration::from_millis(self.loading_ms),
            result: Duration::from_millis(self.result_ms),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct EngagementConfig {
    #[serde(default)]
    pub movie_likes: EngagementPolicy,
    #[serde(default)]
    pub offer_purchases: EngagementPolicy,
}

fn default_timeout() -> u64 { 10 }
fn default_auth_endpoint() -> String { "https://identitytoolkit.googleapis.com/v1".to_string() }
fn default_token_secret() -> String { "showcase-local".to_string() }
fn default_token_ttl() -> u64 { 3600 }
fn default_loading_ms() -> u64 { 2000 }
fn default_result_ms() -> u64 { 3000 }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    pub fn load_from(dir: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        let dir = dir.as_ref();
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let path = |name: &str| dir.join(name).to_string_lossy().into_owned();

        let s = config::Config::builder()
            .add_source(config::File::with_name(&path("default")))
            // Per-environment and local overrides are optional
            .add_source(config::File::with_name(&path(&run_mode)).required(false))
            .add_source(config::File::with_name(&path("local")).required(false))
            // Eg.. `SHOWCASE__SERVER__PORT=8080` sets `server.port`
            .add_source(config::Environment::with_prefix("SHOWCASE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_minimal_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
                [server]
                port = 4000

                [store]
                base_url = "https://example-rtdb.firebaseio.com"

                [auth]
                api_key = "key-123"

                [engagement]
                movie_likes = "reject_duplicate"
            "#,
        )
        .unwrap();

        let config = Config::load_from(dir.path()).expect("config should load");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.backend.mode, BackendMode::Remote);
        assert_eq!(config.auth.endpoint, "https://identitytoolkit.googleapis.com/v1");
        assert_eq!(config.banner.timing(), BannerTiming::default());
        assert_eq!(config.engagement.movie_likes, EngagementPolicy::RejectDuplicate);
        assert_eq!(config.engagement.offer_purchases, EngagementPolicy::Allow);
        assert!(config.storage.dir.is_none());
    }

    #[test]
    fn test_missing_default_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from(dir.path()).is_err());
    }
}
