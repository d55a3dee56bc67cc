//! Persisted key/value settings shared across the process

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, RwLock};

pub const AUTO_PLAY_VIDEO: &str = "setting.autoPlayVideo";
pub const AUTO_PLAY_ON_WIFI: &str = "setting.autoPlayVideoOnWifi";
pub const VIDEO_QUALITY: &str = "setting.videoQuality";
pub const DARK_MODE: &str = "setting.darkMode";

pub const DEFAULT_QUALITY: &str = "Source";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Text(String),
}

/// The three settings the playback session reads
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaybackPrefs {
    pub auto_play: bool,
    pub auto_play_on_wifi: bool,
    pub quality: String,
}

/// Keyed settings store, read-many/write-rarely, last write wins.
///
/// Every write bumps a revision on a watch channel so any screen holding a
/// receiver re-reads the values it cares about.
#[derive(Clone)]
pub struct Preferences {
    values: Arc<RwLock<BTreeMap<String, PrefValue>>>,
    path: Option<PathBuf>,
    revision: Arc<watch::Sender<u64>>,
}

impl Preferences {
    pub fn in_memory() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            values: Arc::new(RwLock::new(BTreeMap::new())),
            path: None,
            revision: Arc::new(revision),
        }
    }

    /// Open the store at `path`; a missing file starts empty.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut prefs = Self::in_memory();

        if tokio::fs::try_exists(&path).await? {
            let content = tokio::fs::read_to_string(&path).await?;
            let values: BTreeMap<String, PrefValue> = serde_json::from_str(&content)?;
            tracing::debug!(path = %path.display(), keys = values.len(), "Preferences loaded");
            *prefs.values.write().await = values;
        }
        prefs.path = Some(path);
        Ok(prefs)
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub async fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.values.read().await.get(key) {
            Some(PrefValue::Bool(value)) => *value,
            _ => default,
        }
    }

    pub async fn get_string(&self, key: &str, default: &str) -> String {
        match self.values.read().await.get(key) {
            Some(PrefValue::Text(value)) => value.clone(),
            _ => default.to_string(),
        }
    }

    pub async fn set_bool(&self, key: &str, value: bool) -> Result<()> {
        self.set(key, PrefValue::Bool(value)).await
    }

    pub async fn set_string(&self, key: &str, value: impl Into<String>) -> Result<()> {
        self.set(key, PrefValue::Text(value.into())).await
    }

    pub async fn playback(&self) -> PlaybackPrefs {
        PlaybackPrefs {
            auto_play: self.get_bool(AUTO_PLAY_VIDEO, true).await,
            auto_play_on_wifi: self.get_bool(AUTO_PLAY_ON_WIFI, false).await,
            quality: self.get_string(VIDEO_QUALITY, DEFAULT_QUALITY).await,
        }
    }

    pub async fn dark_mode(&self) -> bool {
        self.get_bool(DARK_MODE, true).await
    }

    async fn set(&self, key: &str, value: PrefValue) -> Result<()> {
        tracing::debug!(key, value = ?value, "Preference updated");
        {
            let mut values = self.values.write().await;
            values.insert(key.to_string(), value);
        }
        self.revision.send_modify(|rev| *rev += 1);

        if let Some(path) = &self.path {
            self.save_to_disk(path)
                .await
                .with_context(|| format!("saving preferences to {}", path.display()))?;
        }
        Ok(())
    }

    async fn save_to_disk(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        let content = {
            let values = self.values.read().await;
            serde_json::to_string_pretty(&*values)?
        };
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self::in_memory()
    }
}
