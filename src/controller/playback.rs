//! Video session control: opening and leaving videos, source selection,
//! presentation modes

use std::sync::Arc;

use crate::model::{
    CommentsProvider, DataState, PageListEngine, PageStatus, PlaybackSelection, Route,
    StatusBarStyle, VideoSession, VideoTab, AUTO_PLAY_ON_WIFI, AUTO_PLAY_VIDEO, VIDEO_QUALITY,
};

use super::AppController;

impl AppController {
    /// Push a video screen and start loading it.
    pub async fn open_video(&self, video_id: &str) {
        tracing::info!(video_id, "Opening video");

        let comments = PageListEngine::new(Arc::new(CommentsProvider::new(
            self.model.source.clone(),
            video_id,
        )));
        let mut session = VideoSession::new(video_id, comments);
        session.detail = DataState::Loading;

        let dark_mode = self.model.preferences.dark_mode().await;

        let depth = {
            let mut sessions = self.model.video_sessions.lock().await;
            let depth = sessions.len();

            // A nested session hands the status bar back to its parent's style
            let restore_to = match sessions.last_mut() {
                Some(parent) => {
                    if let Some(guard) = parent.status_bar_guard.as_mut() {
                        guard.settle();
                    }
                    self.model.status_bar.style()
                }
                None => StatusBarStyle::ambient(dark_mode),
            };
            session.status_bar_guard = Some(self.model.status_bar.override_after(
                StatusBarStyle::Dark,
                self.config.status_bar_delay(),
                restore_to,
            ));

            let controller = self.clone();
            let id = video_id.to_string();
            session.scope.spawn(async move {
                controller.load_video(depth, id).await;
            });

            let controller = self.clone();
            let id = video_id.to_string();
            session.scope.spawn(async move {
                controller.watch_preferences(depth, id).await;
            });

            sessions.push(session);
            depth
        };
        tracing::debug!(video_id, depth, "Video session started");

        self.model.push_route(Route::Video(video_id.to_string())).await;
    }

    /// Load the record and the link set concurrently, then hand the
    /// resolved selection to the engine.
    async fn load_video(&self, depth: usize, video_id: String) {
        let source = self.model.source.clone();
        let (detail, links) = futures::join!(
            source.video_detail(&video_id),
            source.video_links(&video_id)
        );
        crate::log_source_result!("video_detail", detail);

        // No links means "no sources", never an error screen
        let links = links.unwrap_or_else(|e| {
            tracing::warn!(video_id = %video_id, error = %e, "Link resolution failed");
            Vec::new()
        });

        let prefs = self.model.preferences.playback().await;
        let selection = PlaybackSelection::resolve(links, &prefs, self.config.network.metered);
        tracing::debug!(
            video_id = %video_id,
            quality = %selection.selected_quality,
            sources = selection.available_links.len(),
            auto_play = selection.auto_play,
            "Playback selection resolved"
        );

        let applied = self
            .with_session(depth, &video_id, |session| {
                session.detail = DataState::from_result(detail);
                session.selection = selection.clone();
            })
            .await;

        if let Some(((), true)) = applied {
            self.apply_selection(&selection).await;
        }
    }

    /// Recompute the selection whenever a preference changes.
    ///
    /// Autoplay is decided once per link set, so only a quality change
    /// re-binds the engine.
    async fn watch_preferences(&self, depth: usize, video_id: String) {
        let mut revisions = self.model.preferences.subscribe();

        while revisions.changed().await.is_ok() {
            let prefs = self.model.preferences.playback().await;
            let metered = self.config.network.metered;

            let changed = self
                .with_session(depth, &video_id, |session| {
                    // Links are not known yet; load_video resolves with fresh prefs
                    if session.detail.is_loading() {
                        return None;
                    }
                    let links = session.selection.available_links.clone();
                    let mut selection = PlaybackSelection::resolve(links, &prefs, metered);
                    selection.auto_play = session.selection.auto_play;
                    if selection == session.selection {
                        return None;
                    }
                    session.selection = selection.clone();
                    Some(selection)
                })
                .await;

            match changed {
                None => break,
                Some((Some(selection), true)) => {
                    tracing::debug!(
                        video_id = %video_id,
                        quality = %selection.selected_quality,
                        "Quality changed, re-binding player"
                    );
                    self.apply_selection(&selection).await;
                }
                Some(_) => {}
            }
        }
    }

    /// Run `f` on the session at `depth` if it still belongs to `video_id`.
    /// Also reports whether that session is the visible one.
    async fn with_session<R>(
        &self,
        depth: usize,
        video_id: &str,
        f: impl FnOnce(&mut VideoSession) -> R,
    ) -> Option<(R, bool)> {
        let mut sessions = self.model.video_sessions.lock().await;
        let is_top = depth + 1 == sessions.len();
        let session = sessions.get_mut(depth).filter(|s| s.video_id == video_id)?;
        Some((f(session), is_top))
    }

    async fn apply_selection(&self, selection: &PlaybackSelection) {
        self.bind_player(selection, selection.auto_play).await;
    }

    async fn bind_player(&self, selection: &PlaybackSelection, play_when_ready: bool) {
        let quality = selection.selected_link().map(|l| l.quality.clone());
        let result = self
            .player
            .set_media(&selection.available_links, quality.as_deref(), play_when_ready)
            .await;
        if let Err(e) = result {
            tracing::error!(error = %e, "Failed to hand media to the player");
            self.model.set_error(Self::format_error(&e)).await;
        }
    }

    /// Leave the video screen. Presentation modes are exited first.
    pub async fn video_back(&self) {
        {
            let mut sessions = self.model.video_sessions.lock().await;
            if let Some(session) = sessions.last_mut() {
                if session.picture_in_picture {
                    session.picture_in_picture = false;
                    return;
                }
                if session.full_screen {
                    session.full_screen = false;
                    session.full_screen_guard = None;
                    return;
                }
            }
        }
        self.close_video().await;
    }

    pub async fn close_video(&self) {
        let (closed, previous) = {
            let mut sessions = self.model.video_sessions.lock().await;
            let closed = sessions.pop();
            let previous = sessions.last().map(|s| s.selection.clone());
            (closed, previous)
        };
        let Some(closed) = closed else {
            return;
        };

        if let Err(e) = self.player.stop().await {
            tracing::warn!(error = %e, "Failed to stop player");
        }
        tracing::info!(video_id = %closed.video_id, "Video session closed");
        // Cancels the session tasks and restores the status bar
        drop(closed);

        if let Some(selection) = previous {
            self.bind_player(&selection, false).await;
        }
        self.model.pop_route().await;
    }

    /// Tear down every open video, innermost first.
    pub async fn close_all_videos(&self) {
        let sessions = std::mem::take(&mut *self.model.video_sessions.lock().await);
        if sessions.is_empty() {
            return;
        }
        if let Err(e) = self.player.stop().await {
            tracing::warn!(error = %e, "Failed to stop player");
        }
        tracing::debug!(count = sessions.len(), "Closing all video sessions");
        for session in sessions.into_iter().rev() {
            drop(session);
        }
    }

    pub async fn toggle_full_screen(&self) {
        let mut sessions = self.model.video_sessions.lock().await;
        let Some(session) = sessions.last_mut() else {
            return;
        };
        session.full_screen = !session.full_screen;
        session.full_screen_guard = if session.full_screen {
            // The session style must be in place before full screen captures it
            if let Some(guard) = session.status_bar_guard.as_mut() {
                guard.settle();
            }
            Some(self.model.status_bar.override_style(StatusBarStyle::Hidden))
        } else {
            None
        };
        tracing::debug!(full_screen = session.full_screen, "Full screen toggled");
    }

    pub async fn toggle_picture_in_picture(&self) {
        let mut sessions = self.model.video_sessions.lock().await;
        if let Some(session) = sessions.last_mut() {
            session.picture_in_picture = !session.picture_in_picture;
            tracing::debug!(picture_in_picture = session.picture_in_picture, "Picture-in-picture toggled");
        }
    }

    /// Persist the next available quality; the preference watcher re-binds the player.
    pub async fn cycle_quality(&self) {
        let next = {
            let sessions = self.model.video_sessions.lock().await;
            sessions.last().and_then(|s| s.selection.next_quality())
        };
        let Some(quality) = next else {
            return;
        };
        tracing::info!(quality = %quality, "Quality changed");
        if let Err(e) = self.model.preferences.set_string(VIDEO_QUALITY, quality).await {
            self.model.set_error(Self::format_error(&e)).await;
        }
    }

    pub async fn toggle_auto_play(&self) {
        let prefs = self.model.preferences.playback().await;
        if let Err(e) = self.model.preferences.set_bool(AUTO_PLAY_VIDEO, !prefs.auto_play).await {
            self.model.set_error(Self::format_error(&e)).await;
        }
    }

    pub async fn toggle_auto_play_on_wifi(&self) {
        let prefs = self.model.preferences.playback().await;
        if let Err(e) = self
            .model
            .preferences
            .set_bool(AUTO_PLAY_ON_WIFI, !prefs.auto_play_on_wifi)
            .await
        {
            self.model.set_error(Self::format_error(&e)).await;
        }
    }

    pub async fn toggle_playback(&self) {
        let is_playing = {
            let sessions = self.model.video_sessions.lock().await;
            sessions.last().map(|s| s.is_playing)
        };
        let result = match is_playing {
            Some(true) => self.player.stop().await,
            Some(false) => self.player.play().await,
            None => return,
        };
        if let Err(e) = result {
            tracing::error!(error = %e, "Toggle playback failed");
            self.model.set_error(Self::format_error(&e)).await;
        }
    }

    /// Retry whatever failed on the visible tab: the video record, or the comments page.
    pub async fn retry_video(&self) {
        let mut sessions = self.model.video_sessions.lock().await;
        let depth = sessions.len().saturating_sub(1);
        let Some(session) = sessions.last_mut() else {
            return;
        };

        if session.detail.is_error() {
            tracing::debug!(video_id = %session.video_id, "Retrying video load");
            session.detail = DataState::Loading;
            let controller = self.clone();
            let id = session.video_id.clone();
            session.scope.spawn(async move {
                controller.load_video(depth, id).await;
            });
            return;
        }

        if session.tab == VideoTab::Comments {
            let comments = session.comments.clone();
            session.scope.spawn(async move {
                if comments.snapshot().await.status == PageStatus::Error {
                    comments.retry().await;
                }
            });
        }
    }

    pub async fn switch_video_tab(&self, forward: bool) {
        let mut sessions = self.model.video_sessions.lock().await;
        let Some(session) = sessions.last_mut() else {
            return;
        };
        session.tab = if forward { session.tab.next() } else { session.tab.prev() };

        if session.tab == VideoTab::Comments {
            let comments = session.comments.clone();
            session.scope.spawn(async move {
                if comments.snapshot().await.status == PageStatus::Idle {
                    comments.mount().await;
                }
            });
        }
    }

    pub async fn video_move_up(&self) {
        let mut sessions = self.model.video_sessions.lock().await;
        if let Some(session) = sessions.last_mut() {
            match session.tab {
                VideoTab::Comments => session.comments_selected = session.comments_selected.saturating_sub(1),
                VideoTab::Similar => session.similar_selected = session.similar_selected.saturating_sub(1),
                VideoTab::Introduction => {}
            }
        }
    }

    pub async fn video_move_down(&self) {
        let mut sessions = self.model.video_sessions.lock().await;
        let Some(session) = sessions.last_mut() else {
            return;
        };
        match session.tab {
            VideoTab::Comments => {
                let count = session.comments.snapshot().await.items.len();
                if session.comments_selected + 1 < count {
                    session.comments_selected += 1;
                }
                let comments = session.comments.clone();
                let selected = session.comments_selected;
                session.scope.spawn(async move {
                    if comments.should_load_more(selected).await {
                        comments.load_next().await;
                    }
                });
            }
            VideoTab::Similar => {
                if session.similar_selected + 1 < session.similar_count() {
                    session.similar_selected += 1;
                }
            }
            VideoTab::Introduction => {}
        }
    }

    /// Enter on the Similar tab opens that video on top of this one.
    pub async fn open_selected_similar(&self) {
        let target = {
            let sessions = self.model.video_sessions.lock().await;
            sessions.last().and_then(|session| {
                if session.tab != VideoTab::Similar {
                    return None;
                }
                session
                    .detail
                    .read_safely()
                    .and_then(|content| content.detail())
                    .and_then(|d| d.similar.get(session.similar_selected))
                    .map(|p| p.id.clone())
            })
        };
        if let Some(video_id) = target {
            self.open_video(&video_id).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::controller::test_support::{controller, controller_with, settle};
    use crate::model::{
        DataState, LayoutMode, PageStatus, Route, StatusBarStyle, VideoContent, VideoTab, WindowSize,
        AUTO_PLAY_ON_WIFI, DARK_MODE, VIDEO_QUALITY,
    };

    #[tokio::test]
    async fn test_open_video_binds_source_quality() {
        let (controller, player) = controller();
        controller.open_video("v1").await;
        settle().await;

        let view = controller.model.get_video_view().await.unwrap();
        assert!(matches!(view.detail, DataState::Success(VideoContent::Available(_))));
        assert_eq!(view.player.title, "First");
        assert_eq!(view.player.selection.selected_quality, "Source");

        let (links, quality, play) = player.last_call().await.unwrap();
        assert_eq!(links, vec!["Source", "540", "360"]);
        assert_eq!(quality.as_deref(), Some("Source"));
        assert!(play);
    }

    #[tokio::test]
    async fn test_missing_source_quality_defers_to_engine() {
        let (controller, player) = controller();
        controller.open_video("v2").await;
        settle().await;

        let (links, quality, _) = player.last_call().await.unwrap();
        assert_eq!(links, vec!["360"]);
        assert_eq!(quality, None);
    }

    #[tokio::test]
    async fn test_metered_network_with_wifi_only_disables_autoplay() {
        let (controller, player) = controller_with(Some("good"), true);
        controller
            .model
            .preferences
            .set_bool(AUTO_PLAY_ON_WIFI, true)
            .await
            .unwrap();

        controller.open_video("v1").await;
        settle().await;

        let (_, _, play) = player.last_call().await.unwrap();
        assert!(!play);
    }

    #[tokio::test]
    async fn test_private_video_shows_no_sources() {
        let (controller, player) = controller();
        controller.open_video("v3").await;
        settle().await;

        let view = controller.model.get_video_view().await.unwrap();
        assert!(matches!(view.detail, DataState::Success(VideoContent::Private)));
        assert!(!view.player.selection.has_sources());
        let (links, quality, _) = player.last_call().await.unwrap();
        assert!(links.is_empty());
        assert_eq!(quality, None);
    }

    #[tokio::test]
    async fn test_quality_cycle_persists_and_rebinds() {
        let (controller, player) = controller();
        controller.open_video("v1").await;
        settle().await;

        controller.cycle_quality().await;
        settle().await;

        assert_eq!(
            controller.model.preferences.get_string(VIDEO_QUALITY, "").await,
            "540"
        );
        let (_, quality, _) = player.last_call().await.unwrap();
        assert_eq!(quality.as_deref(), Some("540"));
        assert_eq!(player.calls.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_autoplay_toggles_leave_running_player_alone() {
        let (controller, player) = controller_with(Some("good"), true);
        controller.open_video("v1").await;
        settle().await;
        assert_eq!(player.calls.lock().await.len(), 1);

        controller.toggle_auto_play().await;
        controller.toggle_auto_play_on_wifi().await;
        settle().await;

        assert_eq!(player.calls.lock().await.len(), 1);
        assert_eq!(*player.stops.lock().await, 0);
        let view = controller.model.get_video_view().await.unwrap();
        assert!(view.player.selection.auto_play);
        assert!(!controller.model.preferences.playback().await.auto_play);

        // The next link set picks the new setting up
        controller.switch_video_tab(true).await;
        controller.switch_video_tab(true).await;
        controller.open_selected_similar().await;
        settle().await;
        let (links, _, play) = player.last_call().await.unwrap();
        assert_eq!(links, vec!["360"]);
        assert!(!play);
    }

    #[tokio::test]
    async fn test_full_screen_hides_and_restores_status_bar() {
        let (controller, _) = controller();
        controller.model.status_bar.set(StatusBarStyle::Light);
        controller.open_video("v1").await;
        settle().await;

        controller.toggle_full_screen().await;
        assert_eq!(controller.model.status_bar.style(), StatusBarStyle::Hidden);
        let view = controller.model.get_video_view().await.unwrap();
        assert_eq!(view.player.mode, LayoutMode::FullScreen);

        // Esc leaves full screen before leaving the screen; the session's
        // dark style was settled on entry and comes back
        controller.video_back().await;
        assert_eq!(controller.model.status_bar.style(), StatusBarStyle::Dark);
        assert!(matches!(controller.model.current_route().await, Route::Video(_)));
    }

    #[tokio::test]
    async fn test_picture_in_picture_wins_over_full_screen() {
        let (controller, _) = controller();
        controller.model.set_window_size(WindowSize { width: 40, height: 80 }).await;
        controller.open_video("v1").await;

        assert_eq!(controller.model.get_video_view().await.unwrap().player.mode, LayoutMode::Portrait);
        controller.toggle_full_screen().await;
        controller.toggle_picture_in_picture().await;
        let mode = controller.model.get_video_view().await.unwrap().player.mode;
        assert_eq!(mode, LayoutMode::PictureInPicture);
        assert!(!mode.shows_info_column());
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_darkens_status_bar_and_restores_on_close() {
        let (controller, player) = controller();
        controller.model.preferences.set_bool(DARK_MODE, false).await.unwrap();
        controller.model.status_bar.set(StatusBarStyle::Light);
        controller.model.replace_route(Route::Index).await;

        controller.open_video("v1").await;
        assert_eq!(controller.model.status_bar.style(), StatusBarStyle::Light);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(controller.model.status_bar.style(), StatusBarStyle::Dark);

        controller.close_video().await;
        assert_eq!(controller.model.status_bar.style(), StatusBarStyle::Light);
        assert_eq!(controller.model.current_route().await, Route::Index);
        assert_eq!(*player.stops.lock().await, 1);
        assert!(controller.model.video_sessions.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_similar_video_stacks_and_back_rebinds_previous() {
        let (controller, player) = controller();
        controller.model.replace_route(Route::Index).await;
        controller.open_video("v1").await;
        settle().await;

        controller.switch_video_tab(true).await;
        controller.switch_video_tab(true).await;
        controller.open_selected_similar().await;
        settle().await;
        assert_eq!(controller.model.current_route().await, Route::Video("v2".to_string()));
        assert_eq!(controller.model.video_sessions.lock().await.len(), 2);

        controller.video_back().await;
        assert_eq!(controller.model.current_route().await, Route::Video("v1".to_string()));
        let (links, _, play) = player.last_call().await.unwrap();
        assert_eq!(links, vec!["Source", "540", "360"]);
        assert!(!play);
    }

    #[tokio::test]
    async fn test_back_from_similar_keeps_parent_full_screen_hidden() {
        let (controller, _) = controller();
        controller.model.replace_route(Route::Index).await;
        controller.open_video("v1").await;
        settle().await;

        controller.toggle_full_screen().await;
        controller.switch_video_tab(true).await;
        controller.switch_video_tab(true).await;
        controller.open_selected_similar().await;
        settle().await;

        controller.video_back().await;
        let view = controller.model.get_video_view().await.unwrap();
        assert_eq!(view.video_id, "v1");
        assert_eq!(view.player.mode, LayoutMode::FullScreen);
        assert_eq!(controller.model.status_bar.style(), StatusBarStyle::Hidden);

        controller.video_back().await;
        assert_eq!(controller.model.status_bar.style(), StatusBarStyle::Dark);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nested_session_restores_parent_dark_style() {
        let (controller, _) = controller();
        controller.model.preferences.set_bool(DARK_MODE, false).await.unwrap();
        controller.model.status_bar.set(StatusBarStyle::Light);
        controller.model.replace_route(Route::Index).await;

        controller.open_video("v1").await;
        controller.open_video("v2").await;
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(controller.model.status_bar.style(), StatusBarStyle::Dark);

        controller.close_video().await;
        assert_eq!(controller.model.status_bar.style(), StatusBarStyle::Dark);
        controller.close_video().await;
        assert_eq!(controller.model.status_bar.style(), StatusBarStyle::Light);
    }

    #[tokio::test]
    async fn test_comments_tab_mounts_lazily() {
        let (controller, _) = controller();
        controller.open_video("v1").await;
        settle().await;

        let view = controller.model.get_video_view().await.unwrap();
        assert_eq!(view.comments.status, PageStatus::Idle);

        controller.switch_video_tab(true).await;
        settle().await;
        let view = controller.model.get_video_view().await.unwrap();
        assert_eq!(view.tab, VideoTab::Comments);
        assert_eq!(view.comments.status, PageStatus::Success);
        assert_eq!(view.comments.items[0].body, "nice");
    }

    #[tokio::test]
    async fn test_closing_session_stops_preference_watcher() {
        let (controller, player) = controller();
        controller.model.replace_route(Route::Index).await;
        controller.open_video("v1").await;
        settle().await;
        controller.close_video().await;
        let calls = player.calls.lock().await.len();

        controller.model.preferences.set_string(VIDEO_QUALITY, "360").await.unwrap();
        settle().await;
        assert_eq!(player.calls.lock().await.len(), calls);
    }

    #[tokio::test]
    async fn test_close_all_videos_on_shutdown() {
        let (controller, player) = controller();
        controller.model.preferences.set_bool(DARK_MODE, false).await.unwrap();
        controller.model.status_bar.set(StatusBarStyle::Light);
        controller.open_video("v1").await;
        controller.open_video("v2").await;
        controller.toggle_full_screen().await;
        assert_eq!(controller.model.status_bar.style(), StatusBarStyle::Hidden);

        controller.close_all_videos().await;
        assert!(controller.model.video_sessions.lock().await.is_empty());
        assert_eq!(*player.stops.lock().await, 1);
        assert_eq!(controller.model.status_bar.style(), StatusBarStyle::Light);
    }
}
