//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (formatting, scrollable lists)
//! - `layout`: Status bar, tab headers, splash and login screens
//! - `content`: Paged lists of the index screen and comment threads
//! - `player`: The player panel
//! - `video`: Video screen layouts and info tabs
//! - `overlays`: Modal overlays (error, help)

mod utils;
mod layout;
mod content;
mod player;
mod video;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{ScreenView, StatusBarStyle, UiState};

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, ui_state: &UiState, status_bar: StatusBarStyle, screen: &ScreenView) {
        let area = frame.area();
        let body = if status_bar == StatusBarStyle::Hidden {
            area
        } else {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1), // Status bar
                    Constraint::Min(0),    // Screen
                ])
                .split(area);
            layout::render_status_bar(frame, chunks[0], status_bar, ui_state.current_route());
            chunks[1]
        };

        match screen {
            ScreenView::Splash(splash) => layout::render_splash(frame, body, splash),
            ScreenView::Login => layout::render_login(frame, body),
            ScreenView::Index(index) => content::render_index(frame, body, index),
            ScreenView::Video(Some(view)) => video::render_video(frame, body, view),
            ScreenView::Video(None) => layout::render_splash(frame, body, &Default::default()),
        }

        // Error notification overlay (if there's an error)
        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }

        // Help popup overlay (if open)
        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}
