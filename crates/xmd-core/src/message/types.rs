//! Wire shapes of the `{ "action": ... }` messages and their replies.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::detect::PostSnapshot;
use crate::media::{MediaItem, MediaKind};
use crate::save::BatchOutcome;

/// Reply text when resolution exhausts every strategy.
pub const NO_VIDEO_FOUND: &str = "no video found";
/// Reply text for identifiers that are not numeric post ids.
pub const INVALID_MEDIA_ID: &str = "invalid media identifier";
/// Reply text for every action while the service is switched off.
pub const DISABLED: &str = "disabled";

/// Incoming request from the page layer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Message {
    FetchVideoUrl {
        #[serde(rename = "mediaIdentifier", alias = "tweetId", default)]
        media_identifier: String,
    },
    DownloadMedia {
        #[serde(default)]
        url: String,
        #[serde(default)]
        filename: Option<String>,
    },
    DownloadBatch {
        items: Vec<BatchRequestItem>,
    },
    DetectMedia {
        post: PostSnapshot,
    },
    ObserveResponse {
        url: String,
        body: String,
    },
    ClearDetectionCache,
}

/// One entry of `downloadBatch`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BatchRequestItem {
    pub url: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<MediaKind>,
}

/// Outgoing reply; serialized without a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    VideoUrl {
        #[serde(rename = "videoUrl")]
        video_url: String,
    },
    Saved {
        success: bool,
        path: PathBuf,
    },
    Batch {
        success: bool,
        results: Vec<BatchOutcome>,
    },
    Detected {
        items: Vec<MediaItem>,
    },
    Success {
        success: bool,
    },
    Error {
        error: String,
    },
}

impl Reply {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    pub fn ok() -> Self {
        Self::Success { success: true }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Message field a host may set to match replies to requests.
pub const REQUEST_ID: &str = "requestId";

/// A reply plus the `requestId` of the message it answers, if one was sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<serde_json::Value>,
    #[serde(flatten)]
    pub reply: Reply,
}
