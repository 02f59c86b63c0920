//! Download filename derivation.
//!
//! Two paths exist. A caller-supplied name (or the generic
//! [`DEFAULT_FILENAME`]) gets an extension guessed from the URL when it has
//! none. Without a name, the URL's last path segment is used and the
//! extension follows the media kind. Every result is sanitized for Linux.

mod path;
mod sanitize;

pub use path::{last_path_segment, query_format};
pub use sanitize::{sanitize_filename, MAX_NAME_BYTES};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::media::MediaKind;
use crate::media_id::MediaId;

/// Name used when nothing better is known.
pub const DEFAULT_FILENAME: &str = "twitter_media";

static VIDEO_EXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(mp4|mov|webm|avi)$").expect("video extension regex"));
static IMAGE_EXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|gif|webp)$").expect("image extension regex"));

/// Extension (with dot) guessed from URL text alone.
pub fn infer_extension(url: &str) -> &'static str {
    if url.contains(".mp4") {
        ".mp4"
    } else if url.contains(".jpg") || url.contains("format=jpg") {
        ".jpg"
    } else if url.contains(".png") || url.contains("format=png") {
        ".png"
    } else if url.contains("video") {
        ".mp4"
    } else {
        ".jpg"
    }
}

/// Name for a media item of known kind, from its URL path.
pub fn media_filename(url: &str, kind: MediaKind) -> String {
    let mut name = last_path_segment(url).unwrap_or_else(|| DEFAULT_FILENAME.to_string());
    match kind {
        MediaKind::Video if !VIDEO_EXT.is_match(&name) => name.push_str(".mp4"),
        MediaKind::Image if !IMAGE_EXT.is_match(&name) => {
            let format = query_format(url).unwrap_or_else(|| "jpg".to_string());
            name.push('.');
            name.push_str(&format);
        }
        _ => {}
    }
    finish(&name)
}

/// Name for a resolved post video: `twitter_video_<id>.mp4`.
pub fn video_filename(id: &MediaId) -> String {
    format!("twitter_video_{id}.mp4")
}

/// Final on-disk name for `url`.
///
/// A `requested` name wins; when neither a name nor a kind is given the
/// generic default is used. Names without a `.` get [`infer_extension`].
pub fn download_filename(url: &str, requested: Option<&str>, kind: Option<MediaKind>) -> String {
    let requested = requested.map(str::trim).filter(|n| !n.is_empty());
    let name = match (requested, kind) {
        (Some(name), _) => name.to_string(),
        (None, Some(kind)) => return media_filename(url, kind),
        (None, None) => DEFAULT_FILENAME.to_string(),
    };
    if name.contains('.') {
        finish(&name)
    } else {
        finish(&format!("{name}{}", infer_extension(url)))
    }
}

fn finish(name: &str) -> String {
    let clean = sanitize_filename(name);
    if clean.is_empty() {
        format!("{DEFAULT_FILENAME}.bin")
    } else {
        clean
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_inference_order() {
        assert_eq!(infer_extension("https://v.test/a.mp4?x=.jpg"), ".mp4");
        assert_eq!(infer_extension("https://pbs.twimg.com/media/X?format=jpg"), ".jpg");
        assert_eq!(infer_extension("https://pbs.twimg.com/media/X?format=png"), ".png");
        assert_eq!(infer_extension("https://v.test/video/stream"), ".mp4");
        assert_eq!(infer_extension("https://v.test/thing"), ".jpg");
    }

    #[test]
    fn requested_names_keep_or_gain_extension() {
        assert_eq!(
            download_filename("https://v.test/a.mp4", Some("holiday"), None),
            "holiday.mp4"
        );
        assert_eq!(
            download_filename("https://v.test/a.mp4", Some("clip.webm"), None),
            "clip.webm"
        );
        assert_eq!(
            download_filename("https://pbs.twimg.com/media/X?format=png", None, None),
            "twitter_media.png"
        );
        assert_eq!(
            download_filename("https://v.test/a.mp4", Some("../../etc/passwd"), None),
            "etc_passwd"
        );
    }

    #[test]
    fn overlong_requested_name_is_shortened_before_the_extension() {
        let name = download_filename("https://v.test/a.mp4", Some(&"n".repeat(300)), None);
        assert_eq!(name.len(), MAX_NAME_BYTES);
        assert!(name.ends_with("n.mp4"));
    }

    #[test]
    fn kind_based_names() {
        assert_eq!(
            download_filename("https://video.twimg.com/x/vid/720x1280/Clip.MOV?tag=1", None, Some(MediaKind::Video)),
            "Clip.MOV"
        );
        assert_eq!(
            media_filename("https://video.twimg.com/x/pl/master", MediaKind::Video),
            "master.mp4"
        );
        assert_eq!(
            media_filename("https://pbs.twimg.com/media/GabcXYZ?format=png&name=orig", MediaKind::Image),
            "GabcXYZ.png"
        );
        assert_eq!(
            media_filename("https://pbs.twimg.com/media/GabcXYZ", MediaKind::Image),
            "GabcXYZ.jpg"
        );
        assert_eq!(media_filename("https://a.test/", MediaKind::Image), "twitter_media.jpg");
    }

    #[test]
    fn resolved_video_name() {
        assert_eq!(
            video_filename(&MediaId::parse("1234567890").unwrap()),
            "twitter_video_1234567890.mp4"
        );
    }
}
