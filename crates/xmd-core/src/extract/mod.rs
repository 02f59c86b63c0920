//! URL extraction engine.
//!
//! [`extract_best`] runs three steps over raw page or API text and returns the
//! first hit: a structured walk of the conversation JSON payload, the regex
//! [pattern bank](PATTERNS), and an HTML fallback (`og:video` meta and
//! JSON-LD). Parse failures are logged and end only the step they occur in.

mod conversation;
mod html;
mod observed;
mod patterns;
mod select;

pub use conversation::{best_mp4_variant, embedded_json, Variant};
pub use html::looks_like_html;
pub use observed::{is_media_request, observe_response};
pub use patterns::{collect_captures, Pattern, PATTERNS, PATTERN_BANK_VERSION};
pub use select::{is_candidate, resolution_hint, select_best};

use serde::Serialize;
use tracing::debug;

use crate::media_id::MediaId;

/// Which step produced a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStep {
    ConversationJson,
    PatternBank,
    HtmlMeta,
    JsonLd,
}

/// Result of [`extract_best`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extracted {
    pub url: String,
    pub step: ExtractionStep,
    /// Variant bitrate for the JSON walk, resolution hint for the pattern
    /// bank, 0 otherwise.
    pub quality_score: u64,
}

/// Locate the best media URL in `raw`.
pub fn extract_best(raw: &str, id: &MediaId) -> Option<Extracted> {
    match best_mp4_variant(raw) {
        Ok(Some((url, bitrate))) => {
            debug!(id = %id, %url, bitrate, "conversation payload variant");
            return Some(Extracted {
                url,
                step: ExtractionStep::ConversationJson,
                quality_score: bitrate,
            });
        }
        Ok(None) => {}
        Err(e) => debug!(id = %id, error = %e, "conversation payload did not parse"),
    }

    let candidates: Vec<String> = collect_captures(raw)
        .into_iter()
        .filter(|c| is_candidate(c))
        .collect();
    debug!(id = %id, count = candidates.len(), version = PATTERN_BANK_VERSION, "pattern bank candidates");
    if let Some(url) = select_best(&candidates) {
        return Some(Extracted {
            url: url.to_string(),
            step: ExtractionStep::PatternBank,
            quality_score: resolution_hint(url).unwrap_or(0),
        });
    }

    if looks_like_html(raw) {
        if let Some(url) = html::og_video(raw) {
            return Some(Extracted {
                url,
                step: ExtractionStep::HtmlMeta,
                quality_score: 0,
            });
        }
        match html::json_ld_video(raw) {
            Ok(Some(url)) => {
                return Some(Extracted {
                    url,
                    step: ExtractionStep::JsonLd,
                    quality_score: 0,
                })
            }
            Ok(None) => {}
            Err(e) => debug!(id = %id, error = %e, "json-ld block did not parse"),
        }
    }

    debug!(id = %id, "no media url in text");
    None
}

/// [`extract_best`], URL only.
pub fn extract_best_url(raw: &str, id: &MediaId) -> Option<String> {
    extract_best(raw, id).map(|e| e.url)
}
