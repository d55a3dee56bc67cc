//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (routes, tabs, UI state)
//! - `data_state`: Tagged result of an asynchronous fetch
//! - `content`: Video previews, detail records, links and comments
//! - `source`: Video site boundary and the offline catalog
//! - `provider`: Page providers for list screens
//! - `paging`: The paged list engine
//! - `preferences`: Persisted settings store
//! - `playback`: Source selection, autoplay gating, presentation modes
//! - `status_bar`: Status bar style with scoped overrides
//! - `video`: Per-screen state of the video screen
//! - `app_model`: Main application model with state management methods

mod types;
mod data_state;
mod content;
mod source;
mod provider;
mod paging;
mod preferences;
mod playback;
mod status_bar;
mod video;
mod app_model;

// Re-export all public types for convenient access
pub use types::{IndexTab, Route, SplashState, UiState, VideoTab};

pub use data_state::{DataState, DataStateError};

pub use content::{Comment, MediaKind, MediaPreview, Page, VideoContent, VideoDetail, VideoLink};

pub use source::{CatalogSource, VideoSource, SORT_ORDERS};

pub use provider::{CommentsProvider, PageProvider, SubscriptionsProvider, VideoListProvider};

pub use paging::{PageListEngine, PageListState, PageStatus, LOAD_MORE_THRESHOLD};

pub use preferences::{
    PlaybackPrefs, Preferences, AUTO_PLAY_ON_WIFI, AUTO_PLAY_VIDEO, DARK_MODE, VIDEO_QUALITY,
};

pub use playback::{
    compute_autoplay, LayoutMode, PlaybackSelection, PlayerInfo, StatusBarStyle, WindowSize,
};

pub use status_bar::{StatusBar, StatusBarGuard};

pub use video::{VideoSession, VideoView};

pub use app_model::{AppModel, IndexView, ScreenView};
