//! Resolution cascade: cache lookup, then each strategy in order until one
//! produces a URL.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::VideoUrlCache;
use crate::config::XmdConfig;
use crate::dispatch::Dispatcher;
use crate::media::{ResolvedMedia, StrategyKind};
use crate::media_id::MediaId;
use crate::strategy::{self, ResolveStrategy};

pub struct Cascade {
    strategies: Vec<Box<dyn ResolveStrategy>>,
    cache: VideoUrlCache,
}

impl Cascade {
    pub fn new(strategies: Vec<Box<dyn ResolveStrategy>>, cache: VideoUrlCache) -> Self {
        Self { strategies, cache }
    }

    /// Player page, internal API, mirror, post page; TTL from config.
    pub fn standard(dispatcher: Arc<Dispatcher>, cfg: &XmdConfig) -> Self {
        Self::new(
            strategy::standard(dispatcher, &cfg.endpoints),
            VideoUrlCache::new(cfg.cache.video_url_ttl()),
        )
    }

    pub fn cache(&self) -> &VideoUrlCache {
        &self.cache
    }

    /// Resolve a raw identifier. Anything that is not a valid identifier
    /// yields `None` without touching the network.
    pub async fn resolve(&self, raw_id: &str) -> Option<ResolvedMedia> {
        match MediaId::parse(raw_id) {
            Ok(id) => self.resolve_id(&id).await,
            Err(e) => {
                debug!(error = %e, "not resolving");
                None
            }
        }
    }

    pub async fn resolve_url(&self, raw_id: &str) -> Option<String> {
        self.resolve(raw_id).await.map(ResolvedMedia::into_url)
    }

    pub async fn resolve_id(&self, id: &MediaId) -> Option<ResolvedMedia> {
        if let Some(hit) = self.cache.get(id) {
            debug!(id = %id, url = hit.url(), "video url cache hit");
            return Some(hit);
        }

        for strategy in &self.strategies {
            let kind = strategy.kind();
            match strategy.attempt(id).await {
                Ok(Some(found)) => {
                    info!(id = %id, strategy = %kind, url = found.url(), "resolved video url");
                    self.cache.put(id.clone(), found.clone());
                    return Some(found);
                }
                Ok(None) => debug!(id = %id, strategy = %kind, "strategy found nothing"),
                Err(e) => warn!(id = %id, strategy = %kind, error = %format!("{e:#}"), "strategy failed"),
            }
        }

        info!(id = %id, "no video found");
        None
    }

    /// Store a URL seen in page traffic. Returns false when the URL is not an
    /// absolute http(s) URL.
    pub fn record_observed(&self, id: MediaId, url: &str) -> bool {
        match ResolvedMedia::video(url, 0, StrategyKind::Observed) {
            Some(media) => {
                debug!(id = %id, url, "observed video url");
                self.cache.put(id, media);
                true
            }
            None => false,
        }
    }
}
