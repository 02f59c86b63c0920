//! Serializable view of one post, as sent by the page layer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostSnapshot {
    /// Raw identifier as scraped; validated during detection.
    #[serde(alias = "tweetId")]
    pub media_id: String,
    pub videos: Vec<VideoElement>,
    /// An embedded player (or its play button) is present.
    pub has_video_player: bool,
    pub images: Vec<ImageElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoElement {
    pub src: Option<String>,
    pub data_url: Option<String>,
    /// `src` of the first nested `<source>`.
    pub source_src: Option<String>,
}

impl VideoElement {
    /// First non-empty of `src`, `data_url`, `source_src`.
    pub fn url(&self) -> Option<&str> {
        [&self.src, &self.data_url, &self.source_src]
            .into_iter()
            .filter_map(|u| u.as_deref())
            .find(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageElement {
    pub src: String,
    pub width: u32,
    pub height: u32,
    /// The image finished loading.
    pub complete: bool,
    pub inside_video_player: bool,
}
