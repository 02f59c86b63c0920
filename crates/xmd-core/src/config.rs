use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// User-facing switches shared with the page-integration layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master switch; when false every message is refused.
    pub enabled: bool,
    /// Upgrade image URLs to originals and resolve videos proactively.
    pub enable_high_quality: bool,
    /// Acknowledge `downloadMedia` once the URL is accepted and save in a
    /// background task.
    pub download_in_background: bool,
    /// Allow saving several items of one post in a single request.
    pub enable_batch_download: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            enable_high_quality: true,
            download_in_background: false,
            enable_batch_download: true,
        }
    }
}

/// Throttling and retry parameters for the request dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Fixed pause after every dispatch, in milliseconds.
    pub request_delay_ms: u64,
    /// Backoff before a throttled or failed request re-enters the queue.
    pub retry_delay_ms: u64,
    /// Maximum number of retries per request (not counting the first attempt).
    pub max_retries: u32,
    /// Connect timeout handed to curl. There is no overall transfer timeout.
    pub connect_timeout_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 3000,
            retry_delay_ms: 5000,
            max_retries: 3,
            connect_timeout_secs: 15,
        }
    }
}

impl DispatchConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Lifetimes of the two in-memory caches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub video_url_ttl_secs: u64,
    pub media_detection_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            video_url_ttl_secs: 24 * 60 * 60,
            media_detection_ttl_secs: 60,
        }
    }
}

impl CacheConfig {
    pub fn video_url_ttl(&self) -> Duration {
        Duration::from_secs(self.video_url_ttl_secs)
    }

    pub fn media_detection_ttl(&self) -> Duration {
        Duration::from_secs(self.media_detection_ttl_secs)
    }
}

/// Base URLs the resolution strategies talk to. Overridable so tests and
/// mirrors can point the cascade somewhere else.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Host serving `/i/videos/tweet/{id}` player pages.
    pub player_base: String,
    /// Host serving canonical `/i/status/{id}` post pages.
    pub post_base: String,
    /// Host serving the internal GraphQL API.
    pub internal_api_base: String,
    /// GraphQL query id of the `TweetWithVisibilityControl` operation.
    pub graphql_query_id: String,
    /// Optional bearer token attached to internal API requests.
    pub api_bearer_token: Option<String>,
    /// Third-party mirror REST API base (`GET /status/{id}`).
    pub mirror_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            player_base: "https://twitter.com".to_string(),
            post_base: "https://twitter.com".to_string(),
            internal_api_base: "https://twitter.com".to_string(),
            graphql_query_id: "sITyJdhqpHF5Z8LITbLFKg".to_string(),
            api_bearer_token: None,
            mirror_base: "https://api.fxtwitter.com".to_string(),
        }
    }
}

/// Global configuration loaded from `~/.config/xmd/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct XmdConfig {
    /// Where downloads land; `None` means the current directory.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub endpoints: Endpoints,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("xmd")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<XmdConfig> {
    let path = config_path()?;
    load_or_init_at(&path)
}

/// Like [`load_or_init`] but at an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<XmdConfig> {
    if !path.exists() {
        let default_cfg = XmdConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: XmdConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = XmdConfig::default();
        assert!(cfg.settings.enabled);
        assert!(cfg.settings.enable_high_quality);
        assert!(!cfg.settings.download_in_background);
        assert_eq!(cfg.dispatch.request_delay(), Duration::from_secs(3));
        assert_eq!(cfg.dispatch.retry_delay(), Duration::from_secs(5));
        assert_eq!(cfg.dispatch.max_retries, 3);
        assert_eq!(cfg.cache.video_url_ttl(), Duration::from_secs(86_400));
        assert_eq!(cfg.cache.media_detection_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = XmdConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: XmdConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.settings, cfg.settings);
        assert_eq!(parsed.dispatch.max_retries, cfg.dispatch.max_retries);
        assert_eq!(parsed.endpoints.mirror_base, cfg.endpoints.mirror_base);
    }

    #[test]
    fn partial_settings_merge_with_defaults() {
        let toml = r#"
            [settings]
            enable_high_quality = false

            [dispatch]
            request_delay_ms = 0
        "#;
        let cfg: XmdConfig = toml::from_str(toml).unwrap();
        assert!(cfg.settings.enabled);
        assert!(!cfg.settings.enable_high_quality);
        assert!(cfg.settings.enable_batch_download);
        assert_eq!(cfg.dispatch.request_delay_ms, 0);
        assert_eq!(cfg.dispatch.retry_delay_ms, 5000);
        assert_eq!(cfg.cache.media_detection_ttl_secs, 60);
    }

    #[test]
    fn endpoints_override() {
        let toml = r#"
            download_dir = "/tmp/media"

            [endpoints]
            mirror_base = "http://127.0.0.1:9000"
            api_bearer_token = "token"
        "#;
        let cfg: XmdConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.endpoints.mirror_base, "http://127.0.0.1:9000");
        assert_eq!(cfg.endpoints.api_bearer_token.as_deref(), Some("token"));
        assert_eq!(cfg.endpoints.player_base, "https://twitter.com");
        assert_eq!(cfg.download_dir, Some(PathBuf::from("/tmp/media")));
    }

    #[test]
    fn load_or_init_creates_then_reads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let created = load_or_init_at(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created.dispatch.max_retries, 3);

        fs::write(&path, "[dispatch]\nmax_retries = 1\n").unwrap();
        let loaded = load_or_init_at(&path).unwrap();
        assert_eq!(loaded.dispatch.max_retries, 1);
    }
}
