//! Structured walk of a conversation-timeline JSON payload.
//!
//! Path: `data.threaded_conversation_with_injections_v2.instructions[]
//! .entries[].content.itemContent.tweet_results.result.legacy
//! .{entities,extended_entities}.media[].video_info.variants[]`.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct Root {
    #[serde(default)]
    data: Option<Data>,
}

#[derive(Debug, Default, Deserialize)]
struct Data {
    #[serde(default)]
    threaded_conversation_with_injections_v2: Option<Conversation>,
}

#[derive(Debug, Default, Deserialize)]
struct Conversation {
    #[serde(default)]
    instructions: Vec<Instruction>,
}

#[derive(Debug, Default, Deserialize)]
struct Instruction {
    #[serde(default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Default, Deserialize)]
struct Entry {
    #[serde(default)]
    content: Option<EntryContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryContent {
    #[serde(default)]
    item_content: Option<ItemContent>,
}

#[derive(Debug, Default, Deserialize)]
struct ItemContent {
    #[serde(default)]
    tweet_results: Option<TweetResults>,
}

#[derive(Debug, Default, Deserialize)]
struct TweetResults {
    #[serde(default)]
    result: Option<TweetResult>,
}

#[derive(Debug, Default, Deserialize)]
struct TweetResult {
    #[serde(default)]
    legacy: Option<Legacy>,
}

#[derive(Debug, Default, Deserialize)]
struct Legacy {
    #[serde(default)]
    entities: Option<Entities>,
    #[serde(default)]
    extended_entities: Option<Entities>,
}

#[derive(Debug, Default, Deserialize)]
struct Entities {
    #[serde(default)]
    media: Vec<Media>,
}

#[derive(Debug, Default, Deserialize)]
struct Media {
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    video_info: Option<VideoInfo>,
}

#[derive(Debug, Default, Deserialize)]
struct VideoInfo {
    #[serde(default)]
    variants: Vec<Variant>,
}

/// One encoded rendition of a video.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Variant {
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub bitrate: Option<u64>,
    #[serde(default)]
    pub url: String,
}

/// Span from the first `{` to the last `}`, if any.
pub fn embedded_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn variants(root: &Root) -> impl Iterator<Item = &Variant> {
    root.data
        .iter()
        .filter_map(|d| d.threaded_conversation_with_injections_v2.as_ref())
        .flat_map(|c| c.instructions.iter())
        .flat_map(|i| i.entries.iter())
        .filter_map(|e| e.content.as_ref()?.item_content.as_ref()?.tweet_results.as_ref()?.result.as_ref()?.legacy.as_ref())
        .flat_map(|legacy| legacy.entities.iter().chain(legacy.extended_entities.iter()))
        .flat_map(|ents| ents.media.iter())
        .filter(|m| m.kind == "video")
        .filter_map(|m| m.video_info.as_ref())
        .flat_map(|vi| vi.variants.iter())
}

/// Highest-bitrate mp4 variant: strictly greater wins, so the first of equal
/// bitrates is kept. Variants without a positive bitrate are ignored.
pub fn best_variant<'a>(candidates: impl IntoIterator<Item = &'a Variant>) -> Option<&'a Variant> {
    let mut best: Option<&Variant> = None;
    for v in candidates {
        let bitrate = v.bitrate.unwrap_or(0);
        if v.content_type != "video/mp4" || bitrate == 0 || v.url.is_empty() {
            continue;
        }
        if best.map_or(true, |b| bitrate > b.bitrate.unwrap_or(0)) {
            best = Some(v);
        }
    }
    best
}

/// Walk the embedded conversation payload and return `(url, bitrate)`.
pub fn best_mp4_variant(text: &str) -> Result<Option<(String, u64)>, serde_json::Error> {
    let Some(json) = embedded_json(text) else {
        return Ok(None);
    };
    let root: Root = serde_json::from_str(json)?;
    Ok(best_variant(variants(&root)).map(|v| (v.url.clone(), v.bitrate.unwrap_or(0))))
}
