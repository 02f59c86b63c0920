//! Media types shared by the cascade, detection and download layers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::media_id::MediaId;

/// What a URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// Where a resolved URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Player page scrape (`/i/videos/tweet/{id}`).
    PlayerPage,
    /// Internal GraphQL video endpoint.
    InternalApi,
    /// Third-party mirror REST API.
    Mirror,
    /// Canonical post page run through the extraction engine.
    PostPage,
    /// Harvested from network traffic the page layer observed.
    Observed,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PlayerPage => "player_page",
            Self::InternalApi => "internal_api",
            Self::Mirror => "mirror",
            Self::PostPage => "post_page",
            Self::Observed => "observed",
        };
        f.write_str(name)
    }
}

/// A durable, fetchable media URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMedia {
    kind: MediaKind,
    url: String,
    quality_score: u64,
    source: StrategyKind,
}

impl ResolvedMedia {
    /// Returns `None` unless `url` is an absolute http(s) URL.
    pub fn new(
        kind: MediaKind,
        url: impl Into<String>,
        quality_score: u64,
        source: StrategyKind,
    ) -> Option<Self> {
        let url = url.into();
        let parsed = url::Url::parse(&url).ok()?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return None;
        }
        Some(Self {
            kind,
            url,
            quality_score,
            source,
        })
    }

    /// Shorthand for a video URL.
    pub fn video(url: impl Into<String>, quality_score: u64, source: StrategyKind) -> Option<Self> {
        Self::new(MediaKind::Video, url, quality_score, source)
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Bitrate, or a resolution proxy (e.g. 1080), or 0 when unknown.
    pub fn quality_score(&self) -> u64 {
        self.quality_score
    }

    pub fn source(&self) -> StrategyKind {
        self.source
    }

    pub fn into_url(self) -> String {
        self.url
    }
}

/// One downloadable item found in a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub kind: MediaKind,
    /// `None` when the URL still needs to be resolved.
    pub url: Option<String>,
    pub media_id: MediaId,
    #[serde(default)]
    pub is_blob: bool,
    #[serde(default)]
    pub needs_resolution: bool,
}

/// Picks the first resolution-like number (e.g. `1080` from `"1080p"`).
pub(crate) fn resolution_score(label: &str) -> u64 {
    let digits: String = label
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_media_requires_http_url() {
        assert!(ResolvedMedia::video("https://video.example.com/a.mp4", 0, StrategyKind::Mirror).is_some());
        assert!(ResolvedMedia::video("http://127.0.0.1:8080/v.mp4", 0, StrategyKind::Mirror).is_some());
        assert!(ResolvedMedia::video("blob:https://x.com/abc", 0, StrategyKind::Mirror).is_none());
        assert!(ResolvedMedia::video("/relative.mp4", 0, StrategyKind::Mirror).is_none());
        assert!(ResolvedMedia::video("B", 0, StrategyKind::Mirror).is_none());
    }

    #[test]
    fn resolution_score_reads_leading_number() {
        assert_eq!(resolution_score("1080p"), 1080);
        assert_eq!(resolution_score("HD 720p"), 720);
        assert_eq!(resolution_score("auto"), 0);
    }

    #[test]
    fn strategy_kind_display_matches_serde() {
        let json = serde_json::to_string(&StrategyKind::PlayerPage).unwrap();
        assert_eq!(json, format!("\"{}\"", StrategyKind::PlayerPage));
    }
}
