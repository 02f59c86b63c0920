//! Mapping observed network responses to media identifiers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use super::conversation::Variant;
use crate::media_id::MediaId;

static STATUS_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"status/(\d+)").expect("status regex"));

#[derive(Debug, Default, Deserialize)]
struct Observed {
    #[serde(default)]
    track: Option<Track>,
    #[serde(default)]
    variants: Option<Vec<Variant>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Track {
    #[serde(default)]
    content_id: Option<String>,
    #[serde(default)]
    playback_url: Option<String>,
}

/// Whether a request URL is worth inspecting.
pub fn is_media_request(url: &str) -> bool {
    url.contains("video/") || url.contains("media/") || url.contains("mp4")
}

/// Find a `(media id, video URL)` pair in a response the page layer saw.
///
/// A `track` object carries both directly. Otherwise the best mp4 entry of a
/// top-level `variants` array is paired with the `status/<id>` in the
/// request URL. Missing bitrates count as 0; the first of equal bitrates wins.
pub fn observe_response(request_url: &str, body: &str) -> Option<(MediaId, String)> {
    if !is_media_request(request_url) {
        return None;
    }
    let observed: Observed = match serde_json::from_str(body) {
        Ok(o) => o,
        Err(e) => {
            debug!(url = %request_url, error = %e, "observed response is not JSON");
            return None;
        }
    };

    if let Some(Track {
        content_id: Some(id),
        playback_url: Some(url),
    }) = observed.track
    {
        if let Ok(id) = MediaId::parse(&id) {
            return Some((id, url));
        }
    }

    let variants = observed.variants?;
    let mut best: Option<&Variant> = None;
    for v in variants.iter().filter(|v| v.content_type == "video/mp4") {
        if best.map_or(true, |b| v.bitrate.unwrap_or(0) > b.bitrate.unwrap_or(0)) {
            best = Some(v);
        }
    }
    let best = best.filter(|v| !v.url.is_empty())?;
    let id = STATUS_ID
        .captures(request_url)
        .and_then(|c| MediaId::parse(&c[1]).ok())?;
    Some((id, best.url.clone()))
}
