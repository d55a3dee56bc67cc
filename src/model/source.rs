//! Video site boundary and the offline catalog implementation

use std::cmp::Reverse;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::content::{Comment, MediaKind, MediaPreview, Page, VideoContent, VideoDetail, VideoLink};

/// Sort orders accepted as the query parameter of the video list
pub const SORT_ORDERS: [&str; 4] = ["date", "views", "likes", "trending"];

/// Everything the screens need from the video site
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Whether the stored session is still accepted.
    async fn check_session(&self) -> Result<bool>;

    async fn videos(&self, page: u32, sort: Option<&str>) -> Result<Page<MediaPreview>>;

    async fn subscriptions(&self, page: u32) -> Result<Page<MediaPreview>>;

    async fn video_detail(&self, video_id: &str) -> Result<VideoContent>;

    async fn video_links(&self, video_id: &str) -> Result<Vec<VideoLink>>;

    async fn comments(&self, video_id: &str, page: u32) -> Result<Page<Comment>>;
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogEntry {
    id: String,
    title: String,
    author: String,
    #[serde(default)]
    description: String,
    posted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    views: u64,
    #[serde(default)]
    likes: u64,
    #[serde(default)]
    kind: MediaKind,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    similar: Vec<String>,
    #[serde(default)]
    private: bool,
    #[serde(default)]
    deleted: bool,
    #[serde(default)]
    links: Vec<VideoLink>,
    #[serde(default)]
    comments: Vec<Comment>,
}

impl CatalogEntry {
    fn preview(&self) -> MediaPreview {
        MediaPreview {
            id: self.id.clone(),
            title: self.title.clone(),
            author: self.author.clone(),
            views: self.views,
            likes: self.likes,
            kind: self.kind,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Catalog {
    #[serde(default)]
    accepted_sessions: Vec<String>,
    #[serde(default)]
    subscriptions: Vec<String>,
    #[serde(default)]
    videos: Vec<CatalogEntry>,
}

/// Video source backed by a JSON catalog on disk
pub struct CatalogSource {
    catalog: Catalog,
    page_size: usize,
    session: Option<String>,
}

impl CatalogSource {
    pub fn load(path: &Path, page_size: usize, session: Option<String>) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading catalog {}", path.display()))?;
        let source = Self::from_json(&content, page_size, session)?;
        tracing::info!(
            path = %path.display(),
            videos = source.catalog.videos.len(),
            "Catalog loaded"
        );
        Ok(source)
    }

    pub fn from_json(content: &str, page_size: usize, session: Option<String>) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(content).context("parsing catalog")?;
        Ok(Self {
            catalog,
            page_size: page_size.max(1),
            session,
        })
    }

    fn entry(&self, video_id: &str) -> Option<&CatalogEntry> {
        self.catalog.videos.iter().find(|v| v.id == video_id)
    }

    fn paginate<T: Clone>(&self, items: &[T], page: u32) -> Page<T> {
        let start = page as usize * self.page_size;
        let slice = items
            .iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect();
        Page::new(page, slice)
    }
}

fn sort_entries(entries: &mut [&CatalogEntry], sort: &str) -> Result<()> {
    match sort {
        "date" => entries.sort_by_key(|e| Reverse(e.posted_at)),
        "views" => entries.sort_by_key(|e| Reverse(e.views)),
        "likes" => entries.sort_by_key(|e| Reverse(e.likes)),
        // likes per thousand views
        "trending" => entries.sort_by_key(|e| Reverse(e.likes * 1000 / e.views.max(1))),
        other => anyhow::bail!("unknown sort order '{}'", other),
    }
    Ok(())
}

#[async_trait]
impl VideoSource for CatalogSource {
    async fn check_session(&self) -> Result<bool> {
        let Some(session) = self.session.as_deref().filter(|s| !s.is_empty()) else {
            return Ok(false);
        };
        if self.catalog.accepted_sessions.is_empty() {
            return Ok(true);
        }
        Ok(self.catalog.accepted_sessions.iter().any(|s| s == session))
    }

    async fn videos(&self, page: u32, sort: Option<&str>) -> Result<Page<MediaPreview>> {
        let mut entries: Vec<&CatalogEntry> = self.catalog.videos.iter().collect();
        sort_entries(&mut entries, sort.unwrap_or("date"))?;
        let previews: Vec<MediaPreview> = entries.iter().map(|e| e.preview()).collect();
        Ok(self.paginate(&previews, page))
    }

    async fn subscriptions(&self, page: u32) -> Result<Page<MediaPreview>> {
        let mut entries: Vec<&CatalogEntry> = self
            .catalog
            .videos
            .iter()
            .filter(|e| self.catalog.subscriptions.contains(&e.author))
            .collect();
        sort_entries(&mut entries, "date")?;
        let previews: Vec<MediaPreview> = entries.iter().map(|e| e.preview()).collect();
        Ok(self.paginate(&previews, page))
    }

    async fn video_detail(&self, video_id: &str) -> Result<VideoContent> {
        let Some(entry) = self.entry(video_id) else {
            return Ok(VideoContent::Deleted);
        };
        if entry.deleted {
            return Ok(VideoContent::Deleted);
        }
        if entry.private {
            return Ok(VideoContent::Private);
        }

        let similar = entry
            .similar
            .iter()
            .filter_map(|id| self.entry(id))
            .map(|e| e.preview())
            .collect();

        Ok(VideoContent::Available(VideoDetail {
            id: entry.id.clone(),
            title: entry.title.clone(),
            author: entry.author.clone(),
            description: entry.description.clone(),
            posted_at: entry.posted_at,
            views: entry.views,
            likes: entry.likes,
            tags: entry.tags.clone(),
            similar,
        }))
    }

    async fn video_links(&self, video_id: &str) -> Result<Vec<VideoLink>> {
        let entry = self
            .entry(video_id)
            .with_context(|| format!("no links for video {}", video_id))?;
        Ok(entry.links.clone())
    }

    async fn comments(&self, video_id: &str, page: u32) -> Result<Page<Comment>> {
        let entry = self
            .entry(video_id)
            .with_context(|| format!("no comments for video {}", video_id))?;
        Ok(self.paginate(&entry.comments, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "accepted_sessions": ["cookie-1"],
        "subscriptions": ["alice"],
        "videos": [
            {"id": "a", "title": "First", "author": "alice", "views": 10, "likes": 5,
             "posted_at": "2021-01-01T00:00:00Z", "similar": ["b", "missing"],
             "links": [{"quality": "Source", "uri": "https://cdn/a.mp4"}],
             "comments": [{"author": "x", "body": "nice", "posted_at": null}]},
            {"id": "b", "title": "Second", "author": "bob", "views": 300, "likes": 6,
             "posted_at": "2021-03-01T00:00:00Z"},
            {"id": "c", "title": "Hidden", "author": "alice", "private": true,
             "posted_at": "2021-02-01T00:00:00Z"},
            {"id": "d", "title": "Gone", "author": "bob", "deleted": true}
        ]
    }"#;

    fn source(page_size: usize, session: Option<&str>) -> CatalogSource {
        CatalogSource::from_json(CATALOG, page_size, session.map(str::to_string)).unwrap()
    }

    #[tokio::test]
    async fn test_session_check() {
        assert!(source(10, Some("cookie-1")).check_session().await.unwrap());
        assert!(!source(10, Some("other")).check_session().await.unwrap());
        assert!(!source(10, None).check_session().await.unwrap());
    }

    #[tokio::test]
    async fn test_videos_sorted_and_paged() {
        let source = source(2, None);
        let first = source.videos(0, Some("views")).await.unwrap();
        assert_eq!(first.items[0].id, "b");
        assert_eq!(first.items.len(), 2);

        let by_date = source.videos(0, None).await.unwrap();
        assert_eq!(by_date.items[0].id, "b");
        assert_eq!(by_date.items[1].id, "c");

        let past_end = source.videos(5, None).await.unwrap();
        assert!(past_end.is_empty());

        assert!(source.videos(0, Some("random")).await.is_err());
    }

    #[tokio::test]
    async fn test_subscriptions_filter_by_author() {
        let page = source(10, None).subscriptions(0).await.unwrap();
        let ids: Vec<&str> = page.items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[tokio::test]
    async fn test_detail_availability() {
        let source = source(10, None);
        match source.video_detail("a").await.unwrap() {
            VideoContent::Available(detail) => {
                assert_eq!(detail.similar.len(), 1);
                assert_eq!(detail.similar[0].id, "b");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(source.video_detail("c").await.unwrap(), VideoContent::Private);
        assert_eq!(source.video_detail("d").await.unwrap(), VideoContent::Deleted);
        assert_eq!(source.video_detail("zzz").await.unwrap(), VideoContent::Deleted);
    }

    #[tokio::test]
    async fn test_links_and_comments() {
        let source = source(10, None);
        assert_eq!(source.video_links("a").await.unwrap().len(), 1);
        assert!(source.video_links("b").await.unwrap().is_empty());
        assert!(source.video_links("zzz").await.is_err());
        assert_eq!(source.comments("a", 0).await.unwrap().items.len(), 1);
    }

    #[tokio::test]
    async fn test_bundled_demo_catalog_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/catalog.json");
        let source = CatalogSource::load(&path, 20, Some("demo-session".to_string())).unwrap();
        assert!(source.check_session().await.unwrap());

        let page = source.videos(0, Some("views")).await.unwrap();
        assert_eq!(page.items.first().map(|p| p.id.as_str()), Some("a1b2c3"));
    }
}
