//! Main application model with state management

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use super::content::MediaPreview;
use super::paging::{PageListEngine, PageListState};
use super::playback::{StatusBarStyle, WindowSize};
use super::preferences::Preferences;
use super::provider::{SubscriptionsProvider, VideoListProvider};
use super::source::{VideoSource, SORT_ORDERS};
use super::status_bar::StatusBar;
use super::types::{IndexTab, Route, SplashState, UiState};
use super::video::{VideoSession, VideoView};

const ERROR_DISPLAY_SECS: u64 = 5;

/// Render snapshot of the index screen
#[derive(Clone, Debug)]
pub struct IndexView {
    pub tab: IndexTab,
    pub videos: PageListState<MediaPreview>,
    pub subscriptions: PageListState<MediaPreview>,
    pub videos_selected: usize,
    pub subscriptions_selected: usize,
}

/// What the current route needs to draw
#[derive(Clone, Debug)]
pub enum ScreenView {
    Splash(SplashState),
    Login,
    Index(IndexView),
    Video(Option<VideoView>),
}

/// Main application model containing all state
pub struct AppModel {
    pub source: Arc<dyn VideoSource>,
    pub preferences: Preferences,
    pub status_bar: StatusBar,
    pub ui_state: Arc<Mutex<UiState>>,
    pub videos: PageListEngine<MediaPreview>,
    pub subscriptions: PageListEngine<MediaPreview>,
    pub video_sessions: Arc<Mutex<Vec<VideoSession>>>,
    window: Arc<Mutex<WindowSize>>,
    should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new(source: Arc<dyn VideoSource>, preferences: Preferences, dark_mode: bool) -> Self {
        let videos = PageListEngine::with_query(
            Arc::new(VideoListProvider::new(source.clone())),
            Some(SORT_ORDERS[0].to_string()),
        );
        let subscriptions = PageListEngine::new(Arc::new(SubscriptionsProvider::new(source.clone())));

        Self {
            source,
            preferences,
            status_bar: StatusBar::new(StatusBarStyle::ambient(dark_mode)),
            ui_state: Arc::new(Mutex::new(UiState::default())),
            videos,
            subscriptions,
            video_sessions: Arc::new(Mutex::new(Vec::new())),
            window: Arc::new(Mutex::new(WindowSize { width: 80, height: 48 })),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn set_window_size(&self, window: WindowSize) {
        *self.window.lock().await = window;
    }

    pub async fn window_size(&self) -> WindowSize {
        *self.window.lock().await
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub async fn current_route(&self) -> Route {
        self.ui_state.lock().await.current_route().clone()
    }

    pub async fn push_route(&self, route: Route) {
        tracing::debug!(?route, "Navigate");
        self.ui_state.lock().await.routes.push(route);
    }

    /// Replace the current entry instead of stacking on top of it.
    pub async fn replace_route(&self, route: Route) {
        tracing::debug!(?route, "Navigate (replace)");
        let mut state = self.ui_state.lock().await;
        state.routes.pop();
        state.routes.push(route);
    }

    /// Pop the current route. Returns false when it is the last one.
    pub async fn pop_route(&self) -> bool {
        let mut state = self.ui_state.lock().await;
        if state.routes.len() <= 1 {
            return false;
        }
        let popped = state.routes.pop();
        tracing::debug!(route = ?popped, "Navigate back");
        true
    }

    // ========================================================================
    // Index screen
    // ========================================================================

    pub async fn switch_index_tab(&self) -> IndexTab {
        let mut state = self.ui_state.lock().await;
        state.index_tab = state.index_tab.next();
        state.index_tab
    }

    pub fn list_for(&self, tab: IndexTab) -> &PageListEngine<MediaPreview> {
        match tab {
            IndexTab::Videos => &self.videos,
            IndexTab::Subscriptions => &self.subscriptions,
        }
    }

    pub async fn selected_index(&self, tab: IndexTab) -> usize {
        let state = self.ui_state.lock().await;
        match tab {
            IndexTab::Videos => state.videos_selected,
            IndexTab::Subscriptions => state.subscriptions_selected,
        }
    }

    pub async fn move_selection_up(&self) {
        let mut guard = self.ui_state.lock().await;
        let state = &mut *guard;
        let selected = match state.index_tab {
            IndexTab::Videos => &mut state.videos_selected,
            IndexTab::Subscriptions => &mut state.subscriptions_selected,
        };
        *selected = selected.saturating_sub(1);
    }

    pub async fn move_selection_down(&self) {
        let tab = self.ui_state.lock().await.index_tab;
        let count = self.list_for(tab).snapshot().await.items.len();

        let mut guard = self.ui_state.lock().await;
        let state = &mut *guard;
        let selected = match tab {
            IndexTab::Videos => &mut state.videos_selected,
            IndexTab::Subscriptions => &mut state.subscriptions_selected,
        };
        if *selected < count.saturating_sub(1) {
            *selected += 1;
        }
    }

    pub async fn reset_selection(&self, tab: IndexTab) {
        let mut state = self.ui_state.lock().await;
        match tab {
            IndexTab::Videos => state.videos_selected = 0,
            IndexTab::Subscriptions => state.subscriptions_selected = 0,
        }
    }

    pub async fn get_selected_preview(&self) -> Option<MediaPreview> {
        let (tab, selected) = {
            let state = self.ui_state.lock().await;
            let selected = match state.index_tab {
                IndexTab::Videos => state.videos_selected,
                IndexTab::Subscriptions => state.subscriptions_selected,
            };
            (state.index_tab, selected)
        };
        self.list_for(tab).snapshot().await.items.get(selected).cloned()
    }

    /// Advance to the next sort order and return it.
    pub async fn cycle_sort(&self) -> String {
        let mut state = self.ui_state.lock().await;
        state.sort_index = (state.sort_index + 1) % SORT_ORDERS.len();
        state.videos_selected = 0;
        SORT_ORDERS[state.sort_index].to_string()
    }

    pub async fn get_index_view(&self) -> IndexView {
        let state = self.ui_state.lock().await.clone();
        IndexView {
            tab: state.index_tab,
            videos: self.videos.snapshot().await,
            subscriptions: self.subscriptions.snapshot().await,
            videos_selected: state.videos_selected,
            subscriptions_selected: state.subscriptions_selected,
        }
    }

    // ========================================================================
    // Video screen
    // ========================================================================

    pub async fn get_video_view(&self) -> Option<VideoView> {
        let window = self.window_size().await;
        let sessions = self.video_sessions.lock().await;
        match sessions.last() {
            Some(session) => Some(session.view(window).await),
            None => None,
        }
    }

    pub async fn get_screen_view(&self) -> ScreenView {
        let (route, splash) = {
            let state = self.ui_state.lock().await;
            (state.current_route().clone(), state.splash)
        };
        match route {
            Route::Splash => ScreenView::Splash(splash),
            Route::Login => ScreenView::Login,
            Route::Index => ScreenView::Index(self.get_index_view().await),
            Route::Video(_) => ScreenView::Video(self.get_video_view().await),
        }
    }

    // ========================================================================
    // Errors and overlays
    // ========================================================================

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed().as_secs() > ERROR_DISPLAY_SECS {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
    }

    pub async fn toggle_help_popup(&self) {
        let mut state = self.ui_state.lock().await;
        state.show_help_popup = !state.show_help_popup;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::source::CatalogSource;

    fn model() -> AppModel {
        let source = CatalogSource::from_json(
            r#"{"videos": [
                {"id": "a", "title": "A", "author": "x"},
                {"id": "b", "title": "B", "author": "y"}
            ]}"#,
            10,
            None,
        )
        .unwrap();
        AppModel::new(Arc::new(source), Preferences::in_memory(), true)
    }

    #[tokio::test]
    async fn test_route_stack() {
        let model = model();
        assert_eq!(model.current_route().await, Route::Splash);

        model.replace_route(Route::Index).await;
        model.push_route(Route::Video("a".to_string())).await;
        assert_eq!(model.current_route().await, Route::Video("a".to_string()));

        assert!(model.pop_route().await);
        assert_eq!(model.current_route().await, Route::Index);
        assert!(!model.pop_route().await);
    }

    #[tokio::test]
    async fn test_selection_bounded_by_loaded_items() {
        let model = model();
        model.videos.mount().await;

        for _ in 0..5 {
            model.move_selection_down().await;
        }
        assert_eq!(model.selected_index(IndexTab::Videos).await, 1);
        assert_eq!(model.get_selected_preview().await.map(|p| p.id).as_deref(), Some("b"));

        model.move_selection_up().await;
        model.move_selection_up().await;
        assert_eq!(model.selected_index(IndexTab::Videos).await, 0);
    }

    #[tokio::test]
    async fn test_cycle_sort_wraps() {
        let model = model();
        let mut seen = Vec::new();
        for _ in 0..SORT_ORDERS.len() {
            seen.push(model.cycle_sort().await);
        }
        assert_eq!(seen.last().map(String::as_str), Some(SORT_ORDERS[0]));
    }

    #[tokio::test]
    async fn test_ambient_status_bar_follows_theme() {
        let model = model();
        assert_eq!(model.status_bar.style(), StatusBarStyle::Dark);
    }
}
