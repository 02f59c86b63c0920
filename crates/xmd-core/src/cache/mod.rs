//! Time-bounded in-memory caches.
//!
//! Two instances exist per process: resolved video URLs (24 h) and media
//! detection results (60 s). Both are process-local, never persisted, and
//! evict lazily: a stale entry is only removed when it is read.

mod ttl;

pub use ttl::TtlCache;

use crate::media::{MediaItem, ResolvedMedia};
use crate::media_id::MediaId;

/// Resolved video URLs keyed by post.
pub type VideoUrlCache = TtlCache<MediaId, ResolvedMedia>;

/// Media detection results keyed by post.
pub type DetectionCache = TtlCache<MediaId, Vec<MediaItem>>;
