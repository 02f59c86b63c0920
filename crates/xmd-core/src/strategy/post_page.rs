//! Canonical post page, mined by the extraction engine.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::ResolveStrategy;
use crate::config::Endpoints;
use crate::dispatch::{random_user_agent, Dispatcher, Request};
use crate::extract::extract_best;
use crate::media::{ResolvedMedia, StrategyKind};
use crate::media_id::MediaId;

pub struct PostPage {
    dispatcher: Arc<Dispatcher>,
    base: String,
}

impl PostPage {
    pub fn new(dispatcher: Arc<Dispatcher>, endpoints: &Endpoints) -> Self {
        Self {
            dispatcher,
            base: endpoints.post_base.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ResolveStrategy for PostPage {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PostPage
    }

    async fn attempt(&self, id: &MediaId) -> Result<Option<ResolvedMedia>> {
        let request = Request::get(format!("{}/i/status/{id}", self.base))
            .header("User-Agent", random_user_agent());
        let response = self.dispatcher.enqueue(request).await?;
        if !response.is_success() {
            debug!(id = %id, status = response.status, "post page unavailable");
            return Ok(None);
        }

        let Some(found) = extract_best(&response.text(), id) else {
            return Ok(None);
        };
        debug!(id = %id, url = %found.url, step = ?found.step, "post page url");
        Ok(ResolvedMedia::video(found.url, found.quality_score, StrategyKind::PostPage))
    }
}
