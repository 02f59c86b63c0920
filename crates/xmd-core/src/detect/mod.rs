//! Media detection: which downloadable items a post carries.
//!
//! Videos take priority. Once any video (or an embedded player) is seen the
//! post's images are ignored, since they are posters or thumbnails.

mod image;
mod snapshot;

pub use image::{is_content_image, is_video_thumbnail, original_size};
pub use snapshot::{ImageElement, PostSnapshot, VideoElement};

use serde::Serialize;
use tracing::debug;

use crate::cache::{DetectionCache, VideoUrlCache};
use crate::config::{CacheConfig, Settings};
use crate::media::{MediaItem, MediaKind};
use crate::media_id::MediaId;

/// Result of [`MediaDetector::detect`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub items: Vec<MediaItem>,
    /// The caller should start resolving this post's video now.
    pub resolve_in_background: bool,
}

impl Detection {
    fn cached(items: Vec<MediaItem>) -> Self {
        Self {
            items,
            resolve_in_background: false,
        }
    }
}

pub struct MediaDetector {
    cache: DetectionCache,
    high_quality: bool,
}

impl MediaDetector {
    pub fn new(cache: DetectionCache, high_quality: bool) -> Self {
        Self { cache, high_quality }
    }

    pub fn from_config(cache: &CacheConfig, settings: &Settings) -> Self {
        Self::new(
            DetectionCache::new(cache.media_detection_ttl()),
            settings.enable_high_quality,
        )
    }

    pub fn cache(&self) -> &DetectionCache {
        &self.cache
    }

    /// Drop a post's cached detection (its video URL just became known).
    pub fn invalidate(&self, id: &MediaId) {
        self.cache.remove(id);
    }

    /// Forget every cached detection, e.g. on page navigation.
    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn detect(&self, post: &PostSnapshot, video_urls: &VideoUrlCache) -> Detection {
        let Ok(id) = MediaId::parse(&post.media_id) else {
            return Detection::default();
        };

        if let Some(items) = self.cache.get(&id) {
            debug!(id = %id, count = items.len(), "detection cache hit");
            return Detection::cached(items);
        }

        if let Some(resolved) = video_urls.get(&id) {
            let items = vec![MediaItem {
                kind: MediaKind::Video,
                url: Some(resolved.into_url()),
                media_id: id.clone(),
                is_blob: false,
                needs_resolution: false,
            }];
            self.cache.put(id, items.clone());
            return Detection::cached(items);
        }

        let mut items: Vec<MediaItem> = Vec::new();
        let mut resolve_in_background = false;
        let found_video = !post.videos.is_empty() || post.has_video_player;

        for url in post.videos.iter().filter_map(VideoElement::url) {
            if url.starts_with("blob:") {
                if !items.iter().any(|m| m.is_blob) {
                    items.push(MediaItem {
                        kind: MediaKind::Video,
                        url: Some(url.to_string()),
                        media_id: id.clone(),
                        is_blob: true,
                        needs_resolution: true,
                    });
                }
            } else if !items.iter().any(|m| m.url.as_deref() == Some(url)) {
                items.push(MediaItem {
                    kind: MediaKind::Video,
                    url: Some(url.to_string()),
                    media_id: id.clone(),
                    is_blob: false,
                    needs_resolution: false,
                });
            }
        }

        if items.is_empty() && post.has_video_player {
            items.push(MediaItem {
                kind: MediaKind::Video,
                url: None,
                media_id: id.clone(),
                is_blob: false,
                needs_resolution: true,
            });
            resolve_in_background = self.high_quality;
        }

        if found_video {
            debug!(id = %id, count = items.len(), "video post; images skipped");
            self.cache.put(id, items.clone());
            return Detection {
                items,
                resolve_in_background,
            };
        }

        for img in &post.images {
            if is_video_thumbnail(img) || !is_content_image(img) {
                continue;
            }
            let url = if self.high_quality {
                original_size(&img.src)
            } else {
                img.src.clone()
            };
            if !url.starts_with("http") || items.iter().any(|m| m.url.as_deref() == Some(url.as_str())) {
                continue;
            }
            items.push(MediaItem {
                kind: MediaKind::Image,
                url: Some(url),
                media_id: id.clone(),
                is_blob: false,
                needs_resolution: false,
            });
        }

        debug!(id = %id, count = items.len(), "image post");
        if !items.is_empty() {
            self.cache.put(id, items.clone());
        }
        Detection::cached(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{ResolvedMedia, StrategyKind};
    use std::time::Duration;

    fn detector(high_quality: bool) -> MediaDetector {
        MediaDetector::new(DetectionCache::new(Duration::from_secs(60)), high_quality)
    }

    fn urls() -> VideoUrlCache {
        VideoUrlCache::new(Duration::from_secs(86_400))
    }

    fn video(src: &str) -> VideoElement {
        VideoElement {
            src: Some(src.to_string()),
            ..Default::default()
        }
    }

    fn image(src: &str) -> ImageElement {
        ImageElement {
            src: src.to_string(),
            width: 600,
            height: 400,
            complete: true,
            inside_video_player: false,
        }
    }

    fn post(id: &str) -> PostSnapshot {
        PostSnapshot {
            media_id: id.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_id_yields_nothing() {
        let mut p = post("not-an-id");
        p.images.push(image("https://pbs.twimg.com/media/a.jpg"));
        assert!(detector(false).detect(&p, &urls()).items.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn blob_videos_collapse_to_one_item() {
        let mut p = post("10");
        p.videos = vec![video("blob:https://x.com/1"), video("blob:https://x.com/2")];
        let d = detector(false).detect(&p, &urls());
        assert_eq!(d.items.len(), 1);
        assert!(d.items[0].is_blob && d.items[0].needs_resolution);
    }

    #[tokio::test(start_paused = true)]
    async fn direct_videos_deduplicated_and_images_skipped() {
        let mut p = post("11");
        p.videos = vec![
            video("https://video.twimg.com/a.mp4"),
            video("https://video.twimg.com/a.mp4"),
            VideoElement {
                source_src: Some("https://video.twimg.com/b.mp4".into()),
                ..Default::default()
            },
        ];
        p.images.push(image("https://pbs.twimg.com/media/poster.jpg"));
        let d = detector(false).detect(&p, &urls());
        let got: Vec<_> = d.items.iter().map(|m| m.url.as_deref().unwrap()).collect();
        assert_eq!(got, ["https://video.twimg.com/a.mp4", "https://video.twimg.com/b.mp4"]);
        assert!(d.items.iter().all(|m| m.kind == MediaKind::Video));
    }

    #[tokio::test(start_paused = true)]
    async fn player_placeholder_requests_background_resolution_in_hq_mode() {
        let mut p = post("12");
        p.has_video_player = true;
        p.images.push(image("https://pbs.twimg.com/media/poster.jpg"));

        let d = detector(true).detect(&p, &urls());
        assert_eq!(d.items.len(), 1);
        assert_eq!(d.items[0].url, None);
        assert!(d.items[0].needs_resolution);
        assert!(d.resolve_in_background);

        assert!(!detector(false).detect(&p, &urls()).resolve_in_background);
    }

    #[tokio::test(start_paused = true)]
    async fn known_video_url_wins() {
        let video_urls = urls();
        let id = MediaId::parse("13").unwrap();
        video_urls.put(
            id,
            ResolvedMedia::video("https://video.twimg.com/known.mp4", 0, StrategyKind::Mirror).unwrap(),
        );
        let mut p = post("13");
        p.images.push(image("https://pbs.twimg.com/media/a.jpg"));
        let d = detector(false).detect(&p, &video_urls);
        assert_eq!(d.items.len(), 1);
        assert_eq!(d.items[0].url.as_deref(), Some("https://video.twimg.com/known.mp4"));
    }

    #[tokio::test(start_paused = true)]
    async fn images_filtered_rewritten_and_deduplicated() {
        let mut p = post("14");
        p.images = vec![
            image("https://pbs.twimg.com/media/A?format=png&name=small"),
            image("https://pbs.twimg.com/media/A?format=png&name=large"),
            image("https://pbs.twimg.com/ext_tw_video_thumb/1/img/t.jpg"),
            ImageElement {
                width: 20,
                height: 20,
                ..image("https://abs.twimg.com/icon.png")
            },
            image("data:image/png;base64,AAAA"),
        ];
        let d = detector(true).detect(&p, &urls());
        let got: Vec<_> = d.items.iter().map(|m| m.url.as_deref().unwrap()).collect();
        assert_eq!(got, ["https://pbs.twimg.com/media/A?format=png&name=orig"]);
        assert!(!d.resolve_in_background);
    }

    #[tokio::test(start_paused = true)]
    async fn results_cached_for_sixty_seconds() {
        let det = detector(false);
        let mut p = post("15");
        p.images.push(image("https://pbs.twimg.com/media/a.jpg"));
        assert_eq!(det.detect(&p, &urls()).items.len(), 1);

        let changed = PostSnapshot {
            images: vec![
                image("https://pbs.twimg.com/media/a.jpg"),
                image("https://pbs.twimg.com/media/b.jpg"),
            ],
            ..p.clone()
        };
        assert_eq!(det.detect(&changed, &urls()).items.len(), 1);

        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(det.detect(&changed, &urls()).items.len(), 2);

        det.invalidate(&MediaId::parse("15").unwrap());
        assert!(det.cache().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_image_results_are_not_cached() {
        let det = detector(false);
        assert!(det.detect(&post("16"), &urls()).items.is_empty());
        assert!(det.cache().is_empty());
        det.clear();
    }
}
