//! Core type definitions for the application

use std::time::Instant;

/// A screen in the navigation stack
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Splash,
    Login,
    Index,
    Video(String),
}

/// Tabs of the index screen
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum IndexTab {
    #[default]
    Videos,
    Subscriptions,
}

impl IndexTab {
    pub fn next(self) -> Self {
        match self {
            IndexTab::Videos => IndexTab::Subscriptions,
            IndexTab::Subscriptions => IndexTab::Videos,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            IndexTab::Videos => "Videos",
            IndexTab::Subscriptions => "Subscriptions",
        }
    }
}

/// Tabs under the player on the video screen
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VideoTab {
    #[default]
    Introduction,
    Comments,
    Similar,
}

impl VideoTab {
    pub const ALL: [VideoTab; 3] = [VideoTab::Introduction, VideoTab::Comments, VideoTab::Similar];

    pub fn next(self) -> Self {
        match self {
            Self::Introduction => Self::Comments,
            Self::Comments => Self::Similar,
            Self::Similar => Self::Introduction,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Introduction => Self::Similar,
            Self::Comments => Self::Introduction,
            Self::Similar => Self::Comments,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Introduction => "Introduction",
            Self::Comments => "Comments",
            Self::Similar => "Similar videos",
        }
    }
}

/// Session check performed by the splash screen
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SplashState {
    pub checking: bool,
    pub checked: bool,
    pub session_valid: bool,
}

impl SplashState {
    /// Where to go once the check has finished.
    pub fn next_route(&self) -> Option<Route> {
        if !self.checked || self.checking {
            return None;
        }
        Some(if self.session_valid {
            Route::Index
        } else {
            Route::Login
        })
    }
}

/// UI state for the application
#[derive(Clone, Debug)]
pub struct UiState {
    pub routes: Vec<Route>,
    pub splash: SplashState,
    pub index_tab: IndexTab,
    pub videos_selected: usize,
    pub subscriptions_selected: usize,
    pub sort_index: usize,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}

impl UiState {
    pub fn current_route(&self) -> &Route {
        self.routes.last().unwrap_or(&Route::Splash)
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            routes: vec![Route::Splash],
            splash: SplashState::default(),
            index_tab: IndexTab::Videos,
            videos_selected: 0,
            subscriptions_selected: 0,
            sort_index: 0,
            error_message: None,
            error_timestamp: None,
            show_help_popup: false,
        }
    }
}
