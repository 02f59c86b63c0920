//! Image filtering and full-size URL rewriting.

use url::Url;

use super::ImageElement;

const THUMBNAIL_MARKERS: [&str; 2] = ["ext_tw_video_thumb", "amplify_video_thumb"];
const MEDIA_HOST_PATH: &str = "pbs.twimg.com/media";

pub fn is_video_thumbnail(img: &ImageElement) -> bool {
    img.inside_video_player || THUMBNAIL_MARKERS.iter().any(|m| img.src.contains(m))
}

/// Large enough to be content, or hosted on the media CDN.
pub fn is_content_image(img: &ImageElement) -> bool {
    (img.complete && img.width > 100 && img.height > 100) || img.src.contains(MEDIA_HOST_PATH)
}

/// `https://pbs.twimg.com/media/X?format=png&name=small` becomes
/// `https://pbs.twimg.com/media/X?format=png&name=orig`. Other URLs, or ones
/// that do not parse, come back unchanged.
pub fn original_size(src: &str) -> String {
    if !src.contains("pbs.twimg.com/media/") {
        return src.to_string();
    }
    let Ok(parsed) = Url::parse(src) else {
        return src.to_string();
    };
    let format = parsed
        .query_pairs()
        .find(|(k, _)| k == "format")
        .map(|(_, v)| v.into_owned())
        .unwrap_or_else(|| "jpg".to_string());
    format!(
        "{}{}?format={format}&name=orig",
        parsed.origin().ascii_serialization(),
        parsed.path()
    )
}
