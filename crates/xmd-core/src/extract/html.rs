//! Last-resort scan of an HTML document: `og:video` meta, then JSON-LD.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static OG_VIDEO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta\s+property=["']og:video["']\s+content=["']([^"']+)["']"#)
        .expect("og:video regex")
});

static JSON_LD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<script\s+type=["']application/ld\+json["'][^>]*>([\s\S]*?)</script>"#)
        .expect("json-ld regex")
});

pub fn looks_like_html(text: &str) -> bool {
    text.contains("<html") || text.contains("<!DOCTYPE")
}

/// `og:video` content, if the meta tag is present.
pub fn og_video(text: &str) -> Option<String> {
    OG_VIDEO.captures(text).map(|c| c[1].to_string())
}

/// `contentUrl` of the first JSON-LD block: either under `video` or on a
/// top-level `VideoObject`.
pub fn json_ld_video(text: &str) -> Result<Option<String>, serde_json::Error> {
    let Some(cap) = JSON_LD.captures(text) else {
        return Ok(None);
    };
    let doc: Value = serde_json::from_str(cap[1].trim())?;
    let nested = doc
        .get("video")
        .and_then(|v| v.get("contentUrl"))
        .and_then(Value::as_str);
    let top_level = (doc.get("@type").and_then(Value::as_str) == Some("VideoObject"))
        .then(|| doc.get("contentUrl").and_then(Value::as_str))
        .flatten();
    Ok(nested.or(top_level).map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_html_markers() {
        assert!(looks_like_html("<!DOCTYPE html><p>x</p>"));
        assert!(looks_like_html("<html lang=en>"));
        assert!(!looks_like_html(r#"{"html":"no"}"#));
    }

    #[test]
    fn reads_og_video() {
        let html = r#"<html><head><meta property='og:video' content='https://cdn.test/og.mp4'></head></html>"#;
        assert_eq!(og_video(html).as_deref(), Some("https://cdn.test/og.mp4"));
    }

    #[test]
    fn reads_nested_json_ld() {
        let html = r#"<html><script type="application/ld+json">
            {"@type":"SocialMediaPosting","video":{"contentUrl":"https://cdn.test/ld.mp4"}}
        </script></html>"#;
        assert_eq!(
            json_ld_video(html).unwrap().as_deref(),
            Some("https://cdn.test/ld.mp4")
        );
    }

    #[test]
    fn reads_top_level_video_object() {
        let html = r#"<html><script type="application/ld+json">{"@type":"VideoObject","contentUrl":"https://cdn.test/vo.mp4"}</script>"#;
        assert_eq!(
            json_ld_video(html).unwrap().as_deref(),
            Some("https://cdn.test/vo.mp4")
        );
    }

    #[test]
    fn broken_json_ld_is_an_error() {
        let html = r#"<html><script type="application/ld+json">{oops</script>"#;
        assert!(json_ld_video(html).is_err());
        assert_eq!(json_ld_video("<html></html>").unwrap(), None);
    }
}
