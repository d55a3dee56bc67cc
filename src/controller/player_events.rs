//! Player event listener for engine lifecycle events

use tokio::sync::broadcast::{self, error::RecvError};

use crate::player::PlayerEvent;
use super::AppController;

impl AppController {
    pub fn start_player_event_listener(&self, mut events: broadcast::Receiver<PlayerEvent>) {
        let controller = self.clone();
        tracing::info!("Starting player event listener");

        tokio::spawn(async move {
            loop {
                let event = match events.recv().await {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Player event listener lagged");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };

                if controller.model.should_quit().await {
                    tracing::debug!("Player event listener shutting down");
                    break;
                }
                controller.handle_player_event(event).await;
            }
        });
    }

    pub(crate) async fn handle_player_event(&self, event: PlayerEvent) {
        match event {
            PlayerEvent::MediaLoaded { uri, quality } => {
                tracing::debug!(uri = %uri, quality = %quality, "PlayerEvent::MediaLoaded");
                self.update_now_playing(false, Some(uri)).await;
            }
            PlayerEvent::Playing { uri } => {
                tracing::debug!(uri = %uri, "PlayerEvent::Playing");
                self.update_now_playing(true, Some(uri)).await;
            }
            PlayerEvent::Stopped => {
                tracing::debug!("PlayerEvent::Stopped");
                self.update_now_playing(false, None).await;
            }
            PlayerEvent::Exited { uri, success } => {
                tracing::debug!(uri = %uri, success, "PlayerEvent::Exited");
                self.update_now_playing(false, None).await;
                if !success {
                    self.model
                        .set_error("The media player exited with an error.".to_string())
                        .await;
                }
            }
            PlayerEvent::Failed { error } => {
                tracing::error!(error = %error, "PlayerEvent::Failed");
                self.update_now_playing(false, None).await;
            }
        }
    }

    /// Events describe the visible session; a `None` uri keeps the loaded one.
    async fn update_now_playing(&self, is_playing: bool, uri: Option<String>) {
        let mut sessions = self.model.video_sessions.lock().await;
        if let Some(session) = sessions.last_mut() {
            session.is_playing = is_playing;
            if uri.is_some() {
                session.now_playing = uri;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::controller::test_support::{controller, settle};
    use crate::player::PlayerEvent;

    #[tokio::test]
    async fn test_events_update_visible_session() {
        let (controller, player) = controller();
        controller.try_start_event_listener().await;
        controller.open_video("v1").await;
        settle().await;

        player.emit(PlayerEvent::Playing {
            uri: "https://cdn/v1/source.mp4".to_string(),
        });
        settle().await;
        let view = controller.model.get_video_view().await.unwrap();
        assert!(view.player.is_playing);
        assert_eq!(view.player.now_playing.as_deref(), Some("https://cdn/v1/source.mp4"));

        player.emit(PlayerEvent::Exited {
            uri: "https://cdn/v1/source.mp4".to_string(),
            success: false,
        });
        settle().await;
        let view = controller.model.get_video_view().await.unwrap();
        assert!(!view.player.is_playing);
        assert!(controller.model.has_error().await);
    }

    #[tokio::test]
    async fn test_listener_starts_once() {
        let (controller, player) = controller();
        controller.try_start_event_listener().await;
        controller.try_start_event_listener().await;
        settle().await;
        assert_eq!(player.receiver_count(), 1);
    }
}
