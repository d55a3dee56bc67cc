//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::{Route, VideoTab};
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        // Handle error message first (blocks all other interactions)
        if self.model.has_error().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.model.clear_error().await;
            }
            return Ok(());
        }

        // Handle help popup
        if self.model.is_help_popup_open().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Char('H')) {
                self.model.toggle_help_popup().await;
            }
            return Ok(());
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.model.set_should_quit(true).await;
                return Ok(());
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.model.set_should_quit(true).await;
                return Ok(());
            }
            KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Char('H') => {
                self.model.toggle_help_popup().await;
                return Ok(());
            }
            _ => {}
        }

        match self.model.current_route().await {
            Route::Splash => {}
            Route::Login => self.handle_login_key(key).await,
            Route::Index => self.handle_index_key(key).await,
            Route::Video(_) => self.handle_video_key(key).await,
        }
        Ok(())
    }

    async fn handle_login_key(&self, key: KeyEvent) {
        if let KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter = key.code {
            self.check_session().await;
        }
    }

    async fn handle_index_key(&self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => self.switch_index_tab().await,
            KeyCode::Up | KeyCode::Char('k') => self.model.move_selection_up().await,
            KeyCode::Down | KeyCode::Char('j') => self.index_move_down().await,
            KeyCode::Enter => self.open_selected_preview().await,
            KeyCode::Char('s') | KeyCode::Char('S') => self.cycle_sort().await,
            KeyCode::Char('r') | KeyCode::Char('R') => self.retry_index().await,
            KeyCode::Char('t') | KeyCode::Char('T') => self.toggle_theme().await,
            _ => {}
        }
    }

    async fn handle_video_key(&self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace => self.video_back().await,
            KeyCode::Tab | KeyCode::Right => self.switch_video_tab(true).await,
            KeyCode::BackTab | KeyCode::Left => self.switch_video_tab(false).await,
            KeyCode::Up | KeyCode::Char('k') => self.video_move_up().await,
            KeyCode::Down | KeyCode::Char('j') => self.video_move_down().await,
            KeyCode::Enter => self.open_selected_similar().await,
            KeyCode::Char(' ') => self.toggle_playback().await,
            KeyCode::Char('f') | KeyCode::Char('F') => self.toggle_full_screen().await,
            KeyCode::Char('p') | KeyCode::Char('P') => self.toggle_picture_in_picture().await,
            KeyCode::Char('v') | KeyCode::Char('V') => self.cycle_quality().await,
            KeyCode::Char('a') | KeyCode::Char('A') => self.toggle_auto_play().await,
            KeyCode::Char('w') | KeyCode::Char('W') => self.toggle_auto_play_on_wifi().await,
            KeyCode::Char('r') | KeyCode::Char('R') => self.retry_video().await,
            KeyCode::Char('1') => self.jump_to_video_tab(VideoTab::Introduction).await,
            KeyCode::Char('2') => self.jump_to_video_tab(VideoTab::Comments).await,
            KeyCode::Char('3') => self.jump_to_video_tab(VideoTab::Similar).await,
            _ => {}
        }
    }

    async fn jump_to_video_tab(&self, target: VideoTab) {
        for _ in 0..VideoTab::ALL.len() {
            let current = {
                let sessions = self.model.video_sessions.lock().await;
                match sessions.last() {
                    Some(session) => session.tab,
                    None => return,
                }
            };
            if current == target {
                return;
            }
            self.switch_video_tab(true).await;
        }
    }
}
