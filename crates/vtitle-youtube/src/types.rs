//! Wire types for the YouTube Data API v3 `videos` resource.
//!
//! Only the fields the updater reads are typed. Everything else in a
//! snippet is kept in `extra` so a read-modify-write cycle sends back
//! the metadata it was given.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Response of `GET /videos`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoResource>,
}

/// A single video resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResource {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<Snippet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistics>,
}

/// `statistics` part. The API encodes counters as decimal strings and
/// omits counters the owner has hidden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(default, deserialize_with = "deserialize_count")]
    pub view_count: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub like_count: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub comment_count: u64,
}

/// `snippet` part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    /// Every other snippet field, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `PUT /videos?part=snippet`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoUpdate {
    pub id: String,
    pub snippet: Snippet,
}

impl VideoUpdate {
    /// Build an update that keeps `snippet` as-is apart from the title.
    pub fn retitle(
        video_id: impl Into<String>,
        mut snippet: Snippet,
        title: impl Into<String>,
    ) -> Self {
        snippet.title = title.into();
        Self {
            id: video_id.into(),
            snippet,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Count {
    Number(u64),
    Text(String),
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
