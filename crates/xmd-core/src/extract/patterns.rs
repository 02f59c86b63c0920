//! The regex pattern bank.
//!
//! Kept as data: upstream page-format drift should only ever require editing
//! this table (and bumping [`PATTERN_BANK_VERSION`]). Every pattern has
//! exactly one capture group holding the candidate URL.

use once_cell::sync::Lazy;
use regex::Regex;

/// Bumped whenever the table below changes.
pub const PATTERN_BANK_VERSION: u32 = 1;

/// Name and source of each pattern, in application order.
pub const PATTERN_SOURCES: [(&str, &str); 11] = [
    ("cdn_mp4", r#"(https://video\.twimg\.com/[^"'\s]+\.mp4)"#),
    ("video_tag_src", r#"(?i)<video[^>]*src=["']([^"']+)["'][^>]*>"#),
    ("source_tag_src", r#"(?i)<source[^>]*src=["']([^"']+)["'][^>]*>"#),
    ("video_url_key", r#"(?i)videoUrl["'\s]*:["'\s]*([^"'\s,}]+)"#),
    ("video_info_variants", r#"(?s)"video_info"\s*:\s*\{[^}]*"variants"\s*:\s*\[(.*?)\]"#),
    ("url_key", r#""url"\s*:\s*"([^"]+)""#),
    ("media_url_https", r#""media_url_https"\s*:\s*"([^"]+)""#),
    ("video_object_url", r#"(?s)"video"\s*:\s*\{[^}]*"url"\s*:\s*"([^"]+)""#),
    ("og_video_meta", r#"(?i)<meta\s+property=["']og:video["']\s+content=["']([^"']+)["']"#),
    ("video_div_src", r#"(?is)<div[^>]*class=["'][^"']*video[^"']*["'][^>]*>.*?src=["']([^"']+)["']"#),
    ("m3u8_playlist", r#"(https://[^"'\s]+\.m3u8[^"'\s]*)"#),
];

/// One compiled entry of the bank.
#[derive(Debug)]
pub struct Pattern {
    pub name: &'static str,
    pub regex: Regex,
    /// Only the first match counts (the meta tag appears once per page).
    pub first_only: bool,
}

/// The compiled bank, in application order.
pub static PATTERNS: Lazy<Vec<Pattern>> = Lazy::new(|| {
    PATTERN_SOURCES
        .iter()
        .map(|(name, src)| Pattern {
            name,
            regex: Regex::new(src).expect("pattern bank entries are valid regexes"),
            first_only: *name == "og_video_meta",
        })
        .collect()
});

/// Every capture of every pattern, in bank order then text order.
pub fn collect_captures(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for pattern in PATTERNS.iter() {
        for cap in pattern.regex.captures_iter(text) {
            if let Some(m) = cap.get(1) {
                out.push(m.as_str().to_string());
            }
            if pattern.first_only {
                break;
            }
        }
    }
    out
}
