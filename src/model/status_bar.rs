//! Status bar appearance with scoped overrides

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::playback::StatusBarStyle;

/// Shared handle to the current status bar style
#[derive(Clone)]
pub struct StatusBar {
    style: std::sync::Arc<watch::Sender<StatusBarStyle>>,
}

impl StatusBar {
    pub fn new(initial: StatusBarStyle) -> Self {
        let (style, _) = watch::channel(initial);
        Self {
            style: std::sync::Arc::new(style),
        }
    }

    pub fn style(&self) -> StatusBarStyle {
        *self.style.borrow()
    }

    pub fn set(&self, style: StatusBarStyle) {
        self.style.send_replace(style);
    }

    pub fn subscribe(&self) -> watch::Receiver<StatusBarStyle> {
        self.style.subscribe()
    }

    /// Apply `style` now and restore the current value when the guard drops.
    pub fn override_style(&self, style: StatusBarStyle) -> StatusBarGuard {
        let restore_to = self.style();
        self.set(style);
        StatusBarGuard {
            bar: self.clone(),
            restore_to,
            pending: None,
        }
    }

    /// Apply `style` after `delay`; restore to `restore_to` when the guard drops.
    ///
    /// Must be called inside a tokio runtime. Dropping the guard before the delay
    /// elapses cancels the pending apply.
    pub fn override_after(
        &self,
        style: StatusBarStyle,
        delay: Duration,
        restore_to: StatusBarStyle,
    ) -> StatusBarGuard {
        let bar = self.clone();
        let pending = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::trace!(?style, "Applying status bar override");
            bar.set(style);
        });
        StatusBarGuard {
            bar: self.clone(),
            restore_to,
            pending: Some((pending, style)),
        }
    }
}

/// Restores the status bar when dropped, on every exit path
pub struct StatusBarGuard {
    bar: StatusBar,
    restore_to: StatusBarStyle,
    pending: Option<(JoinHandle<()>, StatusBarStyle)>,
}

impl StatusBarGuard {
    pub fn restore_to(&self) -> StatusBarStyle {
        self.restore_to
    }

    /// Apply a still-pending delayed style right away.
    pub fn settle(&mut self) {
        if let Some((pending, style)) = self.pending.take() {
            pending.abort();
            self.bar.set(style);
        }
    }
}

impl Drop for StatusBarGuard {
    fn drop(&mut self) {
        if let Some((pending, _)) = self.pending.take() {
            pending.abort();
        }
        tracing::trace!(style = ?self.restore_to, "Restoring status bar");
        self.bar.set(self.restore_to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_screen_restores_exact_previous_style() {
        let bar = StatusBar::new(StatusBarStyle::Light);
        bar.set(StatusBarStyle::Dark);

        let guard = bar.override_style(StatusBarStyle::Hidden);
        assert_eq!(bar.style(), StatusBarStyle::Hidden);
        bar.set(StatusBarStyle::Light);
        bar.set(StatusBarStyle::Hidden);
        drop(guard);

        assert_eq!(bar.style(), StatusBarStyle::Dark);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_override_applies_then_restores() {
        let bar = StatusBar::new(StatusBarStyle::Light);
        let guard = bar.override_after(
            StatusBarStyle::Dark,
            Duration::from_millis(500),
            StatusBarStyle::Light,
        );
        assert_eq!(bar.style(), StatusBarStyle::Light);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(bar.style(), StatusBarStyle::Dark);

        drop(guard);
        assert_eq!(bar.style(), StatusBarStyle::Light);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_before_delay_cancels_apply() {
        let bar = StatusBar::new(StatusBarStyle::Light);
        let guard = bar.override_after(
            StatusBarStyle::Dark,
            Duration::from_millis(500),
            StatusBarStyle::Light,
        );
        drop(guard);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(bar.style(), StatusBarStyle::Light);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nested_guard_after_settle_restores_session_style() {
        let bar = StatusBar::new(StatusBarStyle::Light);
        let mut session = bar.override_after(
            StatusBarStyle::Dark,
            Duration::from_millis(500),
            StatusBarStyle::Light,
        );

        session.settle();
        let full_screen = bar.override_style(StatusBarStyle::Hidden);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(bar.style(), StatusBarStyle::Hidden);

        drop(full_screen);
        assert_eq!(bar.style(), StatusBarStyle::Dark);
        drop(session);
        assert_eq!(bar.style(), StatusBarStyle::Light);
    }

    #[tokio::test]
    async fn test_restores_on_panic_unwind() {
        let bar = StatusBar::new(StatusBarStyle::Light);
        let inner = bar.clone();
        let result = tokio::spawn(async move {
            let _guard = inner.override_style(StatusBarStyle::Hidden);
            panic!("session crashed");
        })
        .await;

        assert!(result.is_err());
        assert_eq!(bar.style(), StatusBarStyle::Light);
    }
}
