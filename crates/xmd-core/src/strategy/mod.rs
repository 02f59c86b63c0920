//! Resolution strategies, tried in order by the [`Cascade`](crate::cascade::Cascade).
//!
//! Every strategy issues its requests through the shared
//! [`Dispatcher`](crate::dispatch::Dispatcher). `Ok(None)` means "nothing
//! here, try the next one"; `Err` is logged by the cascade and treated the
//! same way.

mod internal_api;
mod mirror;
mod player_page;
mod post_page;

pub use internal_api::InternalApi;
pub use mirror::Mirror;
pub use player_page::PlayerPage;
pub use post_page::PostPage;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Endpoints;
use crate::dispatch::Dispatcher;
use crate::media::{ResolvedMedia, StrategyKind};
use crate::media_id::MediaId;

/// One way of turning a media identifier into a durable URL.
#[async_trait]
pub trait ResolveStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    async fn attempt(&self, id: &MediaId) -> anyhow::Result<Option<ResolvedMedia>>;
}

/// The four network strategies in cascade order.
pub fn standard(dispatcher: Arc<Dispatcher>, endpoints: &Endpoints) -> Vec<Box<dyn ResolveStrategy>> {
    vec![
        Box::new(PlayerPage::new(Arc::clone(&dispatcher), endpoints)),
        Box::new(InternalApi::new(Arc::clone(&dispatcher), endpoints)),
        Box::new(Mirror::new(Arc::clone(&dispatcher), endpoints)),
        Box::new(PostPage::new(dispatcher, endpoints)),
    ]
}
