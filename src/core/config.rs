use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::APP_USER_AGENT;

const GAME_DIR_NAME: &str = ".minecraft";
pub const SETTINGS_FILE: &str = "downloader_settings.json";

pub const DEFAULT_MANIFEST_URL: &str =
    "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";
pub const DEFAULT_RESOURCES_URL: &str = "https://resources.download.minecraft.net";

/// Downloader settings, persisted as `downloader_settings.json`.
///
/// Every field has a default so a partial file only overrides what it names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Root of every acquired file (`versions/`, `libraries/`, `assets/`, `logs/`).
    pub root: PathBuf,
    pub manifest_url: String,
    /// Base URL of the content-addressed asset object store.
    pub resources_url: String,
    /// Maximum simultaneous transfers across all phases.
    pub concurrency: usize,
    /// Attempts per file before an integrity or transport failure is final.
    pub max_attempts: u32,
    pub retry_backoff_ms: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root: default_root(),
            manifest_url: DEFAULT_MANIFEST_URL.to_string(),
            resources_url: DEFAULT_RESOURCES_URL.to_string(),
            concurrency: 16,
            max_attempts: 5,
            retry_backoff_ms: 500,
            request_timeout_secs: 60,
            user_agent: APP_USER_AGENT.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `path`. A missing file yields the defaults; a file
    /// that exists but does not parse is an error.
    pub fn load(path: &Path) -> LauncherResult<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings file at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(e) => return Err(LauncherError::io(path, e)),
        };

        let settings: Settings =
            serde_json::from_str(&raw).map_err(|e| LauncherError::Config {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        settings.validated(path)
    }

    /// Settings file location for a given root.
    pub fn default_path(root: &Path) -> PathBuf {
        root.join(SETTINGS_FILE)
    }

    fn validated(self, path: &Path) -> LauncherResult<Self> {
        let reason = if self.concurrency == 0 {
            Some("concurrency must be at least 1")
        } else if self.max_attempts == 0 {
            Some("max_attempts must be at least 1")
        } else if self.request_timeout_secs == 0 {
            Some("request_timeout_secs must be at least 1")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(LauncherError::Config {
                path: path.to_path_buf(),
                reason: reason.to_string(),
            }),
            None => Ok(self),
        }
    }
}

fn default_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(GAME_DIR_NAME)
}
