//! Navigation-related controller methods (index lists, sorting, paging)

use crate::model::{IndexTab, PageStatus, StatusBarStyle, DARK_MODE};
use super::AppController;

impl AppController {
    /// Load page 0 of the active index tab in the background.
    pub async fn mount_index(&self) {
        let tab = self.model.ui_state.lock().await.index_tab;
        let list = self.model.list_for(tab).clone();
        tracing::debug!(tab = tab.title(), "Mounting index list");
        tokio::spawn(async move {
            list.mount().await;
        });
    }

    pub async fn switch_index_tab(&self) {
        let tab = self.model.switch_index_tab().await;
        let list = self.model.list_for(tab).clone();
        if list.snapshot().await.status == PageStatus::Idle {
            tokio::spawn(async move {
                list.mount().await;
            });
        }
    }

    /// Move to the next sort order of the Videos tab and reload from page 0.
    pub async fn cycle_sort(&self) {
        let tab = self.model.ui_state.lock().await.index_tab;
        if tab != IndexTab::Videos {
            return;
        }
        let sort = self.model.cycle_sort().await;
        tracing::info!(sort = %sort, "Sort order changed");
        self.model.reset_selection(IndexTab::Videos).await;

        let list = self.model.videos.clone();
        tokio::spawn(async move {
            list.set_query(Some(sort)).await;
        });
    }

    pub async fn index_move_down(&self) {
        self.model.move_selection_down().await;

        let tab = self.model.ui_state.lock().await.index_tab;
        let selected = self.model.selected_index(tab).await;
        let list = self.model.list_for(tab).clone();
        if list.should_load_more(selected).await {
            tracing::debug!(tab = tab.title(), selected, "Near the end of the list, loading more");
            tokio::spawn(async move {
                list.load_next().await;
            });
        }
    }

    pub async fn retry_index(&self) {
        let tab = self.model.ui_state.lock().await.index_tab;
        let list = self.model.list_for(tab).clone();
        if list.snapshot().await.status != PageStatus::Error {
            return;
        }
        tokio::spawn(async move {
            list.retry().await;
        });
    }

    pub async fn open_selected_preview(&self) {
        if let Some(preview) = self.model.get_selected_preview().await {
            self.open_video(&preview.id).await;
        }
    }

    /// Flip the theme preference and the ambient status bar with it.
    pub async fn toggle_theme(&self) {
        let dark_mode = !self.model.preferences.dark_mode().await;
        if let Err(e) = self.model.preferences.set_bool(DARK_MODE, dark_mode).await {
            tracing::error!(error = %e, "Failed to save theme");
            self.model.set_error(Self::format_error(&e)).await;
            return;
        }
        if self.model.video_sessions.lock().await.is_empty() {
            self.model.status_bar.set(StatusBarStyle::ambient(dark_mode));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::controller::test_support::{controller, settle};
    use crate::model::{IndexTab, PageStatus, Route, StatusBarStyle};

    async fn on_index() -> crate::controller::AppController {
        let (controller, _) = controller();
        controller.check_session().await;
        settle().await;
        controller
    }

    #[tokio::test]
    async fn test_scrolling_loads_next_page() {
        let controller = on_index().await;
        let first = controller.model.videos.snapshot().await;
        assert_eq!(first.items.len(), 2);

        controller.index_move_down().await;
        settle().await;

        let state = controller.model.videos.snapshot().await;
        assert_eq!(state.current_page, 1);
        assert_eq!(state.items.len(), 3);
    }

    #[tokio::test]
    async fn test_subscriptions_tab_mounts_on_first_visit() {
        let controller = on_index().await;
        assert_eq!(controller.model.subscriptions.snapshot().await.status, PageStatus::Idle);

        controller.switch_index_tab().await;
        settle().await;

        let state = controller.model.subscriptions.snapshot().await;
        assert_eq!(state.status, PageStatus::Success);
        assert!(state.items.iter().all(|p| p.author == "alice"));
    }

    #[tokio::test]
    async fn test_cycle_sort_reloads_videos() {
        let controller = on_index().await;
        controller.index_move_down().await;
        settle().await;
        assert_eq!(controller.model.selected_index(IndexTab::Videos).await, 1);

        controller.cycle_sort().await;
        settle().await;

        let state = controller.model.videos.snapshot().await;
        assert_eq!(state.query.as_deref(), Some("views"));
        assert_eq!(state.current_page, 0);
        assert_eq!(state.status, PageStatus::Success);
        assert_eq!(controller.model.selected_index(IndexTab::Videos).await, 0);
    }

    #[tokio::test]
    async fn test_cycle_sort_ignored_on_subscriptions() {
        let controller = on_index().await;
        controller.switch_index_tab().await;
        controller.cycle_sort().await;
        settle().await;
        assert_eq!(controller.model.videos.snapshot().await.query.as_deref(), Some("date"));
        assert_eq!(controller.model.get_ui_state().await.index_tab, IndexTab::Subscriptions);
    }

    #[tokio::test]
    async fn test_open_selected_preview_pushes_video() {
        let controller = on_index().await;
        controller.open_selected_preview().await;
        assert!(matches!(controller.model.current_route().await, Route::Video(_)));
    }

    #[tokio::test]
    async fn test_toggle_theme_updates_ambient_status_bar() {
        let controller = on_index().await;
        assert_eq!(controller.model.status_bar.style(), StatusBarStyle::Dark);
        controller.toggle_theme().await;
        assert_eq!(controller.model.status_bar.style(), StatusBarStyle::Light);
        assert!(!controller.model.preferences.dark_mode().await);
    }
}
