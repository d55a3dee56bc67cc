//! Playback session types: source selection, autoplay gating, presentation mode

use super::content::VideoLink;
use super::preferences::{PlaybackPrefs, DEFAULT_QUALITY};

/// Autoplay decision from the three persisted flags and the network state.
pub fn compute_autoplay(enabled: bool, wifi_only: bool, network_metered: bool) -> bool {
    enabled && (!wifi_only || !network_metered)
}

/// The resolved source handed to the player engine for the current link set
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PlaybackSelection {
    pub available_links: Vec<VideoLink>,
    pub selected_quality: String,
    pub auto_play: bool,
}

impl PlaybackSelection {
    pub fn resolve(links: Vec<VideoLink>, prefs: &PlaybackPrefs, network_metered: bool) -> Self {
        let preferred = if prefs.quality.is_empty() {
            DEFAULT_QUALITY
        } else {
            prefs.quality.as_str()
        };
        let selected_quality = if links.iter().any(|l| l.quality == preferred) {
            preferred.to_string()
        } else {
            DEFAULT_QUALITY.to_string()
        };

        Self {
            auto_play: compute_autoplay(prefs.auto_play, prefs.auto_play_on_wifi, network_metered),
            available_links: links,
            selected_quality,
        }
    }

    /// The link matching the selected quality. `None` leaves the choice to the engine.
    pub fn selected_link(&self) -> Option<&VideoLink> {
        self.available_links
            .iter()
            .find(|l| l.quality == self.selected_quality)
    }

    pub fn selected_uri(&self) -> Option<&str> {
        self.selected_link().map(|l| l.uri.as_str())
    }

    pub fn has_sources(&self) -> bool {
        !self.available_links.is_empty()
    }

    pub fn qualities(&self) -> Vec<String> {
        self.available_links.iter().map(|l| l.quality.clone()).collect()
    }

    /// Quality after `current` in link order, wrapping around.
    pub fn next_quality(&self) -> Option<String> {
        if self.available_links.is_empty() {
            return None;
        }
        let position = self
            .available_links
            .iter()
            .position(|l| l.quality == self.selected_quality);
        let next = match position {
            Some(i) => (i + 1) % self.available_links.len(),
            None => 0,
        };
        Some(self.available_links[next].quality.clone())
    }
}

/// Window size in logical units
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowSize {
    pub width: u16,
    pub height: u16,
}

impl WindowSize {
    /// Terminal cells are roughly twice as tall as wide.
    pub fn from_terminal(columns: u16, rows: u16) -> Self {
        Self {
            width: columns,
            height: rows.saturating_mul(2),
        }
    }

    pub fn is_portrait(&self) -> bool {
        self.width <= self.height
    }
}

/// Mutually exclusive presentation modes of the video screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutMode {
    /// Single column, player on top
    Portrait,
    /// Two columns, player on the left
    Landscape,
    FullScreen,
    PictureInPicture,
}

impl LayoutMode {
    pub fn resolve(window: WindowSize, full_screen: bool, picture_in_picture: bool) -> Self {
        if picture_in_picture {
            LayoutMode::PictureInPicture
        } else if full_screen {
            LayoutMode::FullScreen
        } else if window.is_portrait() {
            LayoutMode::Portrait
        } else {
            LayoutMode::Landscape
        }
    }

    pub fn shows_info_column(self) -> bool {
        matches!(self, LayoutMode::Portrait | LayoutMode::Landscape)
    }
}

/// Appearance of the top status bar
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusBarStyle {
    /// Light bar with dark text
    Light,
    /// Dark bar with light text
    Dark,
    Hidden,
}

impl StatusBarStyle {
    /// Theme-driven style outside of a video session.
    pub fn ambient(dark_mode: bool) -> Self {
        if dark_mode {
            StatusBarStyle::Dark
        } else {
            StatusBarStyle::Light
        }
    }
}

/// Player panel data for rendering
#[derive(Clone, Debug)]
pub struct PlayerInfo {
    pub title: String,
    pub selection: PlaybackSelection,
    pub is_playing: bool,
    pub now_playing: Option<String>,
    pub mode: LayoutMode,
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

    fn prefs(quality: &str) -> PlaybackPrefs {
        PlaybackPrefs {
            auto_play: true,
            auto_play_on_wifi: false,
            quality: quality.to_string(),
        }
    }

    #[test]
    fn test_persisted_quality_selected() {
        let links = vec![link("Source", "A"), link("360p", "B")];
        let selection = PlaybackSelection::resolve(links, &prefs("360p"), false);
        assert_eq!(selection.selected_quality, "360p");
        assert_eq!(selection.selected_uri(), Some("B"));
    }

    #[test]
    fn test_missing_quality_falls_back_to_source() {
        let links = vec![link("540p", "C"), link("Source", "A")];
        let selection = PlaybackSelection::resolve(links, &prefs("1080p"), false);
        assert_eq!(selection.selected_quality, "Source");
        assert_eq!(selection.selected_uri(), Some("A"));
    }

    #[test]
    fn test_no_match_leaves_choice_to_engine() {
        let links = vec![link("540p", "C"), link("360p", "B")];
        let selection = PlaybackSelection::resolve(links, &prefs("1080p"), false);
        assert_eq!(selection.selected_uri(), None);
        assert!(selection.has_sources());

        let empty = PlaybackSelection::resolve(Vec::new(), &prefs("Source"), false);
        assert!(!empty.has_sources());
        assert_eq!(empty.next_quality(), None);
    }

    #[test]
    fn test_autoplay_gating() {
        assert!(!compute_autoplay(true, true, true));
        assert!(compute_autoplay(true, true, false));
        assert!(compute_autoplay(true, false, true));
        assert!(!compute_autoplay(false, false, false));
        assert!(!compute_autoplay(false, true, false));
    }

    #[test]
    fn test_autoplay_follows_prefs() {
        let mut p = prefs("Source");
        p.auto_play_on_wifi = true;
        let selection = PlaybackSelection::resolve(vec![link("Source", "A")], &p, true);
        assert!(!selection.auto_play);
    }

    #[test]
    fn test_next_quality_wraps() {
        let links = vec![link("Source", "A"), link("540p", "C"), link("360p", "B")];
        let selection = PlaybackSelection::resolve(links, &prefs("360p"), false);
        assert_eq!(selection.next_quality().as_deref(), Some("Source"));
    }

    #[test]
    fn test_layout_modes() {
        let tall = WindowSize { width: 40, height: 80 };
        let wide = WindowSize { width: 200, height: 80 };

        assert_eq!(LayoutMode::resolve(tall, false, false), LayoutMode::Portrait);
        assert_eq!(LayoutMode::resolve(wide, false, false), LayoutMode::Landscape);
        assert_eq!(LayoutMode::resolve(wide, true, false), LayoutMode::FullScreen);
        assert_eq!(LayoutMode::resolve(tall, true, true), LayoutMode::PictureInPicture);

        assert!(LayoutMode::Landscape.shows_info_column());
        assert!(!LayoutMode::FullScreen.shows_info_column());
        assert!(!LayoutMode::PictureInPicture.shows_info_column());
    }

    #[test]
    fn test_terminal_size_accounts_for_cell_shape() {
        assert!(WindowSize::from_terminal(80, 40).is_portrait());
        assert!(!WindowSize::from_terminal(200, 50).is_portrait());
    }
}
