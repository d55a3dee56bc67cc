use std::process::Stdio;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::{broadcast, oneshot, Mutex};

use crate::model::VideoLink;

/// Lifecycle events reported by a player engine
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerEvent {
    MediaLoaded { uri: String, quality: String },
    Playing { uri: String },
    Stopped,
    Exited { uri: String, success: bool },
    Failed { error: String },
}

/// Media engine that decodes and renders the chosen source
#[async_trait]
pub trait PlayerEngine: Send + Sync {
    /// Replace the media items. With no usable `quality` the engine picks its default source.
    async fn set_media(&self, links: &[VideoLink], quality: Option<&str>, play_when_ready: bool) -> Result<()>;

    async fn play(&self) -> Result<()>;

    async fn stop(&self) -> Result<()>;

    fn subscribe(&self) -> broadcast::Receiver<PlayerEvent>;
}

/// Engine default: the requested quality if present, otherwise the first link.
pub fn pick_link<'a>(links: &'a [VideoLink], quality: Option<&str>) -> Option<&'a VideoLink> {
    quality
        .and_then(|q| links.iter().find(|l| l.quality == q))
        .or_else(|| links.first())
}

/// Plays media by launching an external player process (mpv by default)
pub struct ExternalPlayer {
    command: String,
    args: Vec<String>,
    current: Mutex<Option<VideoLink>>,
    running: Mutex<Option<oneshot::Sender<()>>>,
    events: broadcast::Sender<PlayerEvent>,
}

impl ExternalPlayer {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        let (events, _) = broadcast::channel(32);
        Self {
            command: command.into(),
            args,
            current: Mutex::new(None),
            running: Mutex::new(None),
            events,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn emit(&self, event: PlayerEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl PlayerEngine for ExternalPlayer {
    async fn set_media(&self, links: &[VideoLink], quality: Option<&str>, play_when_ready: bool) -> Result<()> {
        self.stop().await?;

        let Some(link) = pick_link(links, quality).cloned() else {
            tracing::info!("No playable sources for this video");
            *self.current.lock().await = None;
            return Ok(());
        };

        tracing::info!(quality = %link.quality, uri = %link.uri, play_when_ready, "Media item set");
        self.emit(PlayerEvent::MediaLoaded {
            uri: link.uri.clone(),
            quality: link.quality.clone(),
        });
        *self.current.lock().await = Some(link);

        if play_when_ready {
            self.play().await?;
        }
        Ok(())
    }

    async fn play(&self) -> Result<()> {
        let link = self
            .current
            .lock()
            .await
            .clone()
            .context("no media loaded")?;
        self.stop().await?;

        let spawned = Command::new(&self.command)
            .args(&self.args)
            .arg(&link.uri)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to launch player '{}'", self.command));

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                self.emit(PlayerEvent::Failed { error: e.to_string() });
                return Err(e);
            }
        };

        let (stop_tx, stop_rx) = oneshot::channel();
        *self.running.lock().await = Some(stop_tx);
        tracing::debug!(command = %self.command, uri = %link.uri, "Player process started");
        self.emit(PlayerEvent::Playing { uri: link.uri.clone() });

        let events = self.events.clone();
        let uri = link.uri;
        tokio::spawn(async move {
            let exited = tokio::select! {
                status = child.wait() => Some(status.map(|s| s.success()).unwrap_or(false)),
                _ = stop_rx => None,
            };
            // kill_on_drop takes care of a stopped process
            drop(child);
            let event = match exited {
                Some(success) => PlayerEvent::Exited { uri, success },
                None => PlayerEvent::Stopped,
            };
            let _ = events.send(event);
        });
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        if let Some(stop) = self.running.lock().await.take() {
            tracing::debug!("Stopping player process");
            let _ = stop.send(());
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(quality: &str, uri: &str) -> VideoLink {
        VideoLink {
            quality: quality.to_string(),
            uri: uri.to_string(),
        }
    }

    #[test]
    fn test_pick_link_defaults_to_first() {
        let links = vec![link("540p", "C"), link("360p", "B")];
        assert_eq!(pick_link(&links, Some("360p")).map(|l| l.uri.as_str()), Some("B"));
        assert_eq!(pick_link(&links, Some("Source")).map(|l| l.uri.as_str()), Some("C"));
        assert_eq!(pick_link(&links, None).map(|l| l.uri.as_str()), Some("C"));
        assert!(pick_link(&[], None).is_none());
    }

    #[tokio::test]
    async fn test_empty_links_do_not_start_playback() {
        let player = ExternalPlayer::new("true", Vec::new());
        player.set_media(&[], None, true).await.unwrap();
        assert!(player.play().await.is_err());
    }

    #[tokio::test]
    async fn test_process_lifecycle_events() {
        let player = ExternalPlayer::new("true", Vec::new());
        let mut events = player.subscribe();

        player
            .set_media(&[link("Source", "file:///tmp/a.mp4")], Some("Source"), true)
            .await
            .unwrap();

        assert!(matches!(events.recv().await.unwrap(), PlayerEvent::MediaLoaded { .. }));
        assert!(matches!(events.recv().await.unwrap(), PlayerEvent::Playing { .. }));
        assert_eq!(
            events.recv().await.unwrap(),
            PlayerEvent::Exited {
                uri: "file:///tmp/a.mp4".to_string(),
                success: true
            }
        );
    }

    #[tokio::test]
    async fn test_missing_binary_reports_failure() {
        let player = ExternalPlayer::new("definitely-not-a-player-binary", Vec::new());
        let mut events = player.subscribe();

        let result = player
            .set_media(&[link("Source", "file:///tmp/a.mp4")], None, true)
            .await;
        assert!(result.is_err());

        assert!(matches!(events.recv().await.unwrap(), PlayerEvent::MediaLoaded { .. }));
        assert!(matches!(events.recv().await.unwrap(), PlayerEvent::Failed { .. }));
    }
}
