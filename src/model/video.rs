//! Per-screen state of the video screen

use super::content::{Comment, VideoContent};
use super::data_state::{DataState, DataStateError};
use super::paging::{PageListEngine, PageListState};
use super::playback::{LayoutMode, PlaybackSelection, PlayerInfo, WindowSize};
use super::status_bar::StatusBarGuard;
use super::types::VideoTab;
use crate::scope::ScreenScope;

/// State of one open video screen.
///
/// Dropping the session cancels its tasks and restores the status bar.
pub struct VideoSession {
    pub video_id: String,
    pub detail: DataState<VideoContent>,
    pub selection: PlaybackSelection,
    pub tab: VideoTab,
    pub comments: PageListEngine<Comment>,
    pub comments_selected: usize,
    pub similar_selected: usize,
    pub full_screen: bool,
    pub picture_in_picture: bool,
    pub is_playing: bool,
    pub now_playing: Option<String>,
    pub scope: ScreenScope,
    // Fields drop in order: the full screen override must be released first
    pub full_screen_guard: Option<StatusBarGuard>,
    pub status_bar_guard: Option<StatusBarGuard>,
}

impl VideoSession {
    pub fn new(video_id: impl Into<String>, comments: PageListEngine<Comment>) -> Self {
        let video_id = video_id.into();
        Self {
            scope: ScreenScope::new(format!("video:{}", video_id)),
            status_bar_guard: None,
            full_screen_guard: None,
            video_id,
            detail: DataState::Empty,
            selection: PlaybackSelection::default(),
            tab: VideoTab::Introduction,
            comments,
            comments_selected: 0,
            similar_selected: 0,
            full_screen: false,
            picture_in_picture: false,
            is_playing: false,
            now_playing: None,
        }
    }

    pub fn title(&self) -> String {
        match self.detail.read() {
            Ok(VideoContent::Available(detail)) => detail.title.clone(),
            Ok(_) | Err(DataStateError::Empty) => "Video".to_string(),
            Err(DataStateError::Loading) => "Loading...".to_string(),
            Err(DataStateError::Failed(_)) => "Load error".to_string(),
        }
    }

    pub fn layout(&self, window: WindowSize) -> LayoutMode {
        LayoutMode::resolve(window, self.full_screen, self.picture_in_picture)
    }

    pub fn similar_count(&self) -> usize {
        match &self.detail {
            DataState::Success(content) => content.detail().map(|d| d.similar.len()).unwrap_or(0),
            _ => 0,
        }
    }

    pub async fn view(&self, window: WindowSize) -> VideoView {
        VideoView {
            video_id: self.video_id.clone(),
            detail: self.detail.clone(),
            player: PlayerInfo {
                title: self.title(),
                selection: self.selection.clone(),
                is_playing: self.is_playing,
                now_playing: self.now_playing.clone(),
                mode: self.layout(window),
            },
            tab: self.tab,
            comments: self.comments.snapshot().await,
            comments_selected: self.comments_selected,
            similar_selected: self.similar_selected,
        }
    }
}

/// Render snapshot of a [`VideoSession`]
#[derive(Clone, Debug)]
pub struct VideoView {
    pub video_id: String,
    pub detail: DataState<VideoContent>,
    pub player: PlayerInfo,
    pub tab: VideoTab,
    pub comments: PageListState<Comment>,
    pub comments_selected: usize,
    pub similar_selected: usize,
}
