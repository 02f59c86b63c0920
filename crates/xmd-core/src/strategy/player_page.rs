//! Player page scrape: embedded `playerConfig`, then `og:video:url`, then the
//! first CDN mp4 link.

use anyhow::{bail, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use super::ResolveStrategy;
use crate::config::Endpoints;
use crate::dispatch::{Dispatcher, Request};
use crate::extract::resolution_hint;
use crate::media::{ResolvedMedia, StrategyKind};
use crate::media_id::MediaId;

static PLAYER_CONFIG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"playerConfig\s*=\s*(\{[\s\S]*?\});").expect("playerConfig regex"));

static OG_VIDEO_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta\s+property="og:video:url"\s+content="([^"]+)""#).expect("og:video:url regex")
});

static CDN_MP4: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"https://video\.twimg\.com/[^"'\s]+\.mp4[^"'\s]*"#).expect("cdn mp4 regex")
});

#[derive(Debug, Deserialize)]
struct PlayerConfig {
    #[serde(default)]
    playlist: Vec<PlaylistEntry>,
}

#[derive(Debug, Deserialize)]
struct PlaylistEntry {
    #[serde(default)]
    source: Option<String>,
}

pub struct PlayerPage {
    dispatcher: Arc<Dispatcher>,
    player_base: String,
    post_base: String,
}

impl PlayerPage {
    pub fn new(dispatcher: Arc<Dispatcher>, endpoints: &Endpoints) -> Self {
        Self {
            dispatcher,
            player_base: endpoints.player_base.trim_end_matches('/').to_string(),
            post_base: endpoints.post_base.trim_end_matches('/').to_string(),
        }
    }
}

/// Undo the script-string escaping around an inline config object.
fn unescape_config(raw: &str) -> String {
    raw.replace("\\n", "")
        .replace("\\'", "'")
        .replace("\\\"", "\"")
        .replace("\\&", "&")
        .replace("\\/", "/")
        .replace("\\\\u", "\\u")
}

fn from_player_config(html: &str) -> Option<String> {
    let cap = PLAYER_CONFIG.captures(html)?;
    let cleaned = unescape_config(&cap[1]);
    match serde_json::from_str::<PlayerConfig>(&cleaned) {
        Ok(cfg) => cfg.playlist.into_iter().next()?.source,
        Err(e) => {
            debug!(error = %e, "playerConfig did not parse");
            None
        }
    }
}

fn is_fetchable(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// URL found in a player page, in lookup order. A step whose hit is empty or
/// not http(s) falls through to the next one.
pub(crate) fn scrape(html: &str) -> Option<String> {
    from_player_config(html)
        .filter(|u| is_fetchable(u))
        .or_else(|| {
            OG_VIDEO_URL
                .captures(html)
                .map(|c| c[1].to_string())
                .filter(|u| is_fetchable(u))
        })
        .or_else(|| CDN_MP4.find(html).map(|m| m.as_str().to_string()))
}

#[async_trait]
impl ResolveStrategy for PlayerPage {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PlayerPage
    }

    async fn attempt(&self, id: &MediaId) -> Result<Option<ResolvedMedia>> {
        let request = Request::get(format!("{}/i/videos/tweet/{id}", self.player_base))
            .header("Accept", "text/html,application/xhtml+xml,application/xml")
            .header("Referer", format!("{}/i/status/{id}", self.post_base));
        let response = self.dispatcher.enqueue(request).await?;
        if !response.is_success() {
            bail!("player page returned HTTP {}", response.status);
        }

        let html = response.text();
        let Some(url) = scrape(&html) else {
            return Ok(None);
        };
        debug!(id = %id, %url, "player page url");
        let score = resolution_hint(&url).unwrap_or(0);
        Ok(ResolvedMedia::video(url, score, StrategyKind::PlayerPage))
    }
}
