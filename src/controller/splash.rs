//! Session check and initial routing

use crate::model::{Route, SplashState};
use super::AppController;

impl AppController {
    /// Ask the source whether the stored session is valid and route accordingly.
    ///
    /// The current entry (Splash or Login) is replaced, never stacked.
    pub async fn check_session(&self) {
        {
            let mut state = self.model.ui_state.lock().await;
            if state.splash.checking {
                return;
            }
            state.splash.checking = true;
        }

        let result = self.model.source.check_session().await;
        crate::log_source_result!("check_session", result);
        let session_valid = match result {
            Ok(valid) => valid,
            Err(e) => {
                self.model.set_error(Self::format_error(&e)).await;
                false
            }
        };

        let next = {
            let mut state = self.model.ui_state.lock().await;
            state.splash = SplashState {
                checking: false,
                checked: true,
                session_valid,
            };
            state.splash.next_route()
        };

        if let Some(route) = next {
            tracing::info!(session_valid, ?route, "Session check finished");
            self.model.replace_route(route.clone()).await;
            if route == Route::Index {
                self.mount_index().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::controller::test_support::{controller_with, settle};
    use crate::model::{PageStatus, Route};

    #[tokio::test]
    async fn test_valid_session_routes_to_index() {
        let (controller, _) = controller_with(Some("good"), false);
        controller.check_session().await;

        let state = controller.model.get_ui_state().await;
        assert_eq!(state.routes, vec![Route::Index]);
        assert!(state.splash.session_valid);

        // The videos list is mounted in the background
        settle().await;
        assert_eq!(controller.model.videos.snapshot().await.status, PageStatus::Success);
    }

    #[tokio::test]
    async fn test_rejected_session_routes_to_login() {
        let (controller, _) = controller_with(Some("stale"), false);
        controller.check_session().await;
        assert_eq!(controller.model.get_ui_state().await.routes, vec![Route::Login]);

        // Re-checking from Login still replaces instead of stacking
        controller.check_session().await;
        assert_eq!(controller.model.get_ui_state().await.routes, vec![Route::Login]);
    }

    #[tokio::test]
    async fn test_missing_session_routes_to_login() {
        let (controller, _) = controller_with(None, false);
        controller.check_session().await;
        assert_eq!(controller.model.current_route().await, Route::Login);
    }
}
