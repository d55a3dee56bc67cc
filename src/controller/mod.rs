//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input,
//! coordinates between the model and view, and drives the player engine.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `splash`: Session check and initial routing
//! - `navigation`: Index lists, sorting, paging
//! - `playback`: Video sessions, source selection, presentation modes
//! - `player_events`: Player engine event listener

mod input;
mod splash;
mod navigation;
mod playback;
mod player_events;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::model::AppModel;
use crate::player::PlayerEngine;

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<AppModel>,
    pub(crate) player: Arc<dyn PlayerEngine>,
    pub(crate) config: Arc<AppConfig>,
    event_listener_started: Arc<Mutex<bool>>,
}

impl AppController {
    pub fn new(model: Arc<AppModel>, player: Arc<dyn PlayerEngine>, config: Arc<AppConfig>) -> Self {
        Self {
            model,
            player,
            config,
            event_listener_started: Arc::new(Mutex::new(false)),
        }
    }

    /// Start the player event listener once
    pub async fn try_start_event_listener(&self) {
        let mut started = self.event_listener_started.lock().await;
        if *started {
            return;
        }
        *started = true;
        drop(started);
        self.start_player_event_listener(self.player.subscribe());
    }

    pub(crate) fn format_error(error: &anyhow::Error) -> String {
        let error_str = format!("{:#}", error);

        if error_str.contains("no media loaded") {
            "Nothing to play. This video has no sources.".to_string()
        } else if error_str.contains("failed to launch player") {
            "Could not start the media player. Check player.command in the config.".to_string()
        } else if error_str.contains("unknown sort order") {
            "This list cannot be sorted that way.".to_string()
        } else if error_str.contains("preferences") {
            "Settings could not be saved.".to_string()
        } else {
            format!("Error: {}", error_str)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_maps_known_failures() {
        let err = anyhow::anyhow!("no media loaded");
        assert_eq!(
            AppController::format_error(&err),
            "Nothing to play. This video has no sources."
        );

        let err = anyhow::anyhow!("boom").context("failed to launch player 'mpv'");
        assert!(AppController::format_error(&err).contains("player.command"));

        let err = anyhow::anyhow!("disk on fire");
        assert_eq!(AppController::format_error(&err), "Error: disk on fire");
    }
}
