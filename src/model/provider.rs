//! Page providers feeding the paged list engine

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use super::content::{Comment, MediaPreview, Page};
use super::source::VideoSource;

/// Fetches one page of items given a page index and an optional query string
#[async_trait]
pub trait PageProvider<T>: Send + Sync {
    async fn load_page(&self, page: u32, query: Option<&str>) -> Result<Page<T>>;
}

/// General video listing; the query is the sort order
pub struct VideoListProvider {
    source: Arc<dyn VideoSource>,
}

impl VideoListProvider {
    pub fn new(source: Arc<dyn VideoSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl PageProvider<MediaPreview> for VideoListProvider {
    async fn load_page(&self, page: u32, query: Option<&str>) -> Result<Page<MediaPreview>> {
        tracing::debug!(page, sort = ?query, "Fetching video list page");
        self.source.videos(page, query).await
    }
}

/// Videos from followed authors; has no query support
pub struct SubscriptionsProvider {
    source: Arc<dyn VideoSource>,
}

impl SubscriptionsProvider {
    pub fn new(source: Arc<dyn VideoSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl PageProvider<MediaPreview> for SubscriptionsProvider {
    async fn load_page(&self, page: u32, _query: Option<&str>) -> Result<Page<MediaPreview>> {
        tracing::debug!(page, "Fetching subscriptions page");
        self.source.subscriptions(page).await
    }
}

/// Comments of a single video
pub struct CommentsProvider {
    source: Arc<dyn VideoSource>,
    video_id: String,
}

impl CommentsProvider {
    pub fn new(source: Arc<dyn VideoSource>, video_id: impl Into<String>) -> Self {
        Self {
            source,
            video_id: video_id.into(),
        }
    }
}

#[async_trait]
impl PageProvider<Comment> for CommentsProvider {
    async fn load_page(&self, page: u32, _query: Option<&str>) -> Result<Page<Comment>> {
        tracing::debug!(video_id = %self.video_id, page, "Fetching comments page");
        self.source.comments(&self.video_id, page).await
    }
}
