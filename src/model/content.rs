//! Content data structures: video previews, detail records, links and comments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One page of items as returned by a provider
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub index: u32,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(index: u32, items: Vec<T>) -> Self {
        Self { index, items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Video,
    Image,
}

/// A video card in a list
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MediaPreview {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub kind: MediaKind,
}

/// Full record for the video screen
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoDetail {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
    pub posted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub similar: Vec<MediaPreview>,
}

/// A loaded video record. `Private` and `Deleted` are final: retrying cannot change them.
#[derive(Clone, Debug, PartialEq)]
pub enum VideoContent {
    Available(VideoDetail),
    Private,
    Deleted,
}

impl VideoContent {
    pub fn detail(&self) -> Option<&VideoDetail> {
        match self {
            VideoContent::Available(detail) => Some(detail),
            _ => None,
        }
    }
}

/// One playable source for a video
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoLink {
    pub quality: String,
    pub uri: String,
}

/// A comment under a video
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub body: String,
    pub posted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub replies: u32,
}
