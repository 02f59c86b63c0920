//! Pull a post identifier out of a post URL (or arbitrary text).

use once_cell::sync::Lazy;
use regex::Regex;

use super::MediaId;

static STATUS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)status(?:es)?/(\d+)").expect("valid status regex"));
static BARE_DIGITS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^\d])(\d{10,20})(?:[^\d]|$)").expect("valid digits regex"));

/// Identifier carried in the path of a post or player page URL:
/// `/{user}/status/{id}`, `/i/web/statuses/{id}` or `/i/videos/tweet/{id}`.
pub fn id_from_page_path(input: &str) -> Option<MediaId> {
    let parsed = url::Url::parse(input).ok()?;
    let segments: Vec<&str> = parsed.path().split('/').filter(|s| !s.is_empty()).collect();
    let at = segments.iter().enumerate().position(|(i, s)| {
        *s == "status" || *s == "statuses" || (*s == "tweet" && i > 0 && segments[i - 1] == "videos")
    })?;
    segments.get(at + 1).and_then(|next| MediaId::parse(next).ok())
}

/// Extracts the post identifier from a URL such as
/// `https://x.com/user/status/1234567890/photo/1`.
///
/// Tries, in order: [`id_from_page_path`], a `status/<digits>` match anywhere
/// in the text, then a standalone run of 10–20 digits.
pub fn extract_from_url(input: &str) -> Option<MediaId> {
    if let Some(id) = id_from_page_path(input) {
        return Some(id);
    }

    if let Some(cap) = STATUS_RE.captures(input) {
        if let Ok(id) = MediaId::parse(&cap[1]) {
            return Some(id);
        }
    }

    BARE_DIGITS_RE
        .captures(input)
        .and_then(|cap| MediaId::parse(&cap[1]).ok())
}
