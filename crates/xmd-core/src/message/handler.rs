//! Message service: one reply per message, never a panic.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::types::{
    BatchRequestItem, Envelope, Message, Reply, DISABLED, INVALID_MEDIA_ID, NO_VIDEO_FOUND, REQUEST_ID,
};
use crate::cascade::Cascade;
use crate::config::{Settings, XmdConfig};
use crate::detect::{MediaDetector, PostSnapshot};
use crate::extract::observe_response;
use crate::media_id::MediaId;
use crate::save::{validate_url, BatchItem, Saver};

pub struct MessageHandler {
    settings: Settings,
    cascade: Arc<Cascade>,
    detector: Arc<MediaDetector>,
    saver: Saver,
}

impl MessageHandler {
    pub fn new(cfg: &XmdConfig, cascade: Arc<Cascade>, download_dir: PathBuf) -> Self {
        Self {
            settings: cfg.settings.clone(),
            cascade,
            detector: Arc::new(MediaDetector::from_config(&cfg.cache, &cfg.settings)),
            saver: Saver::new(download_dir, Duration::from_secs(cfg.dispatch.connect_timeout_secs)),
        }
    }

    pub fn detector(&self) -> &MediaDetector {
        &self.detector
    }

    /// Parse one JSON line and handle it. Malformed input is an error reply.
    pub async fn handle_json(&self, line: &str) -> Reply {
        match serde_json::from_str::<Message>(line) {
            Ok(message) => self.handle(message).await,
            Err(e) => {
                debug!(error = %e, "unreadable message");
                Reply::error(format!("malformed message: {e}"))
            }
        }
    }

    /// Like [`handle_json`](Self::handle_json), for hosts that answer
    /// messages out of order: a `requestId` on the message is echoed on the
    /// reply.
    pub async fn handle_enveloped(&self, line: &str) -> Envelope {
        let mut raw: serde_json::Value = match serde_json::from_str(line) {
            Ok(raw) => raw,
            Err(e) => {
                debug!(error = %e, "unreadable message");
                return Envelope {
                    request_id: None,
                    reply: Reply::error(format!("malformed message: {e}")),
                };
            }
        };
        let request_id = raw.as_object_mut().and_then(|o| o.remove(REQUEST_ID));
        let reply = match serde_json::from_value::<Message>(raw) {
            Ok(message) => self.handle(message).await,
            Err(e) => {
                debug!(error = %e, "unreadable message");
                Reply::error(format!("malformed message: {e}"))
            }
        };
        Envelope { request_id, reply }
    }

    pub async fn handle(&self, message: Message) -> Reply {
        if !self.settings.enabled {
            return Reply::error(DISABLED);
        }
        match message {
            Message::FetchVideoUrl { media_identifier } => self.fetch_video_url(&media_identifier).await,
            Message::DownloadMedia { url, filename } => self.download(&url, filename).await,
            Message::DownloadBatch { items } => self.download_batch(items).await,
            Message::DetectMedia { post } => self.detect(&post),
            Message::ObserveResponse { url, body } => self.observe(&url, &body),
            Message::ClearDetectionCache => {
                self.detector.clear();
                Reply::ok()
            }
        }
    }

    async fn fetch_video_url(&self, raw: &str) -> Reply {
        let Ok(id) = MediaId::parse(raw) else {
            return Reply::error(INVALID_MEDIA_ID);
        };
        match self.cascade.resolve_id(&id).await {
            Some(found) => {
                self.detector.invalidate(&id);
                Reply::VideoUrl {
                    video_url: found.into_url(),
                }
            }
            None => Reply::error(NO_VIDEO_FOUND),
        }
    }

    async fn download(&self, url: &str, filename: Option<String>) -> Reply {
        if let Err(e) = validate_url(url) {
            return Reply::error(e.to_string());
        }
        if self.settings.download_in_background {
            let saver = self.saver.clone();
            let url = url.to_string();
            tokio::spawn(async move {
                if let Err(e) = saver.save(&url, filename.as_deref(), None).await {
                    warn!(%url, error = %e, "background download failed");
                }
            });
            return Reply::ok();
        }
        match self.saver.save(url, filename.as_deref(), None).await {
            Ok(path) => Reply::Saved { success: true, path },
            Err(e) => Reply::error(e.to_string()),
        }
    }

    async fn download_batch(&self, items: Vec<BatchRequestItem>) -> Reply {
        let mut items: Vec<BatchItem> = items
            .into_iter()
            .map(|i| BatchItem {
                url: i.url,
                filename: i.filename,
                kind: i.kind,
            })
            .collect();
        if !self.settings.enable_batch_download && items.len() > 1 {
            debug!(dropped = items.len() - 1, "batch download disabled; saving first item only");
            items.truncate(1);
        }
        let results = self.saver.save_batch(&items).await;
        let success = results.iter().all(|r| r.error.is_none());
        Reply::Batch { success, results }
    }

    fn detect(&self, post: &PostSnapshot) -> Reply {
        let detection = self.detector.detect(post, self.cascade.cache());
        if detection.resolve_in_background {
            if let Ok(id) = MediaId::parse(&post.media_id) {
                let cascade = Arc::clone(&self.cascade);
                let detector = Arc::clone(&self.detector);
                tokio::spawn(async move {
                    if cascade.resolve_id(&id).await.is_some() {
                        detector.invalidate(&id);
                    }
                });
            }
        }
        Reply::Detected {
            items: detection.items,
        }
    }

    fn observe(&self, url: &str, body: &str) -> Reply {
        let Some((id, video_url)) = observe_response(url, body) else {
            return Reply::error(NO_VIDEO_FOUND);
        };
        if !self.cascade.record_observed(id.clone(), &video_url) {
            return Reply::error(NO_VIDEO_FOUND);
        }
        self.detector.invalidate(&id);
        info!(id = %id, url = %video_url, "video url from observed traffic");
        Reply::VideoUrl { video_url }
    }
}
