//! Third-party mirror REST API (`{mirror_base}/status/{id}`).

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use super::ResolveStrategy;
use crate::config::Endpoints;
use crate::dispatch::{Dispatcher, Request};
use crate::media::{resolution_score, ResolvedMedia, StrategyKind};
use crate::media_id::MediaId;

#[derive(Debug, Default, Deserialize)]
struct MirrorStatus {
    #[serde(default)]
    tweet: Option<MirrorTweet>,
}

#[derive(Debug, Default, Deserialize)]
struct MirrorTweet {
    #[serde(default)]
    media: Option<MirrorMedia>,
}

#[derive(Debug, Default, Deserialize)]
struct MirrorMedia {
    #[serde(default)]
    videos: Vec<MirrorVideo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct MirrorVideo {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    quality: Option<String>,
}

pub struct Mirror {
    dispatcher: Arc<Dispatcher>,
    base: String,
}

impl Mirror {
    pub fn new(dispatcher: Arc<Dispatcher>, endpoints: &Endpoints) -> Self {
        Self {
            dispatcher,
            base: endpoints.mirror_base.trim_end_matches('/').to_string(),
        }
    }
}

/// First video labelled 720/1080, else the first one.
fn pick(videos: &[MirrorVideo]) -> Option<&MirrorVideo> {
    videos
        .iter()
        .find(|v| {
            v.quality
                .as_deref()
                .is_some_and(|q| q.contains("720") || q.contains("1080"))
        })
        .or_else(|| videos.first())
}

#[async_trait]
impl ResolveStrategy for Mirror {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Mirror
    }

    async fn attempt(&self, id: &MediaId) -> Result<Option<ResolvedMedia>> {
        let response = self
            .dispatcher
            .enqueue(Request::get(format!("{}/status/{id}", self.base)))
            .await?;
        if !response.is_success() {
            debug!(id = %id, status = response.status, "mirror returned no data");
            return Ok(None);
        }

        let status: MirrorStatus = response.json().context("mirror response")?;
        let videos = status
            .tweet
            .and_then(|t| t.media)
            .map(|m| m.videos)
            .unwrap_or_default();
        let Some(best) = pick(&videos) else {
            return Ok(None);
        };
        let Some(url) = best.url.clone() else {
            return Ok(None);
        };
        let score = best.quality.as_deref().map(resolution_score).unwrap_or(0);
        Ok(ResolvedMedia::video(url, score, StrategyKind::Mirror))
    }
}
