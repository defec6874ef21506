// ─── Version Manifest ───
// Handles fetching and parsing the Mojang version manifest v2.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::core::error::{LauncherError, LauncherResult};

/// Requested id that stands for the newest release.
pub const LATEST_RELEASE: &str = "latest";

/// Top-level Mojang version manifest.
#[derive(Debug, Deserialize)]
pub struct VersionManifest {
    #[serde(default)]
    pub latest: Option<LatestVersions>,
    pub versions: Vec<VersionEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatestVersions {
    pub release: String,
    pub snapshot: String,
}

/// A single entry in the manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    pub id: String,
    pub url: String,
    #[serde(rename = "type", default)]
    pub version_type: Option<String>,
    #[serde(default)]
    pub release_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sha1: Option<String>,
}

impl VersionManifest {
    /// Fetch the version manifest from `url` using the shared HTTP client.
    pub async fn fetch(client: &reqwest::Client, url: &str) -> LauncherResult<Self> {
        info!("Fetching Minecraft version manifest...");

        let response = client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let manifest: VersionManifest = response.json().await?;

        info!("Loaded {} versions from manifest", manifest.versions.len());
        Ok(manifest)
    }

    /// Find a specific version entry by ID (e.g. "1.20.4"). First match wins.
    pub fn find_version(&self, id: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// Like [`find_version`](Self::find_version) but absence is an error.
    pub fn require_version(&self, id: &str) -> LauncherResult<&VersionEntry> {
        self.find_version(id)
            .ok_or_else(|| LauncherError::VersionNotFound(id.to_string()))
    }

    /// Pick the entry for a requested id. [`LATEST_RELEASE`] names the newest
    /// release; anything else must match an id exactly.
    pub fn select(&self, requested: &str) -> LauncherResult<&VersionEntry> {
        if requested == LATEST_RELEASE {
            return self
                .latest_release()
                .ok_or_else(|| LauncherError::VersionNotFound(requested.to_string()));
        }
        self.require_version(requested)
    }

    /// List all official stable versions (release only), newest first.
    pub fn releases(&self) -> Vec<&VersionEntry> {
        let mut releases: Vec<_> = self
            .versions
            .iter()
            .filter(|v| v.version_type.as_deref() == Some("release"))
            .collect();
        releases.sort_by(|a, b| b.release_time.cmp(&a.release_time));
        releases
    }

    /// The newest release: the `latest` block if present, otherwise the most
    /// recent release by timestamp.
    pub fn latest_release(&self) -> Option<&VersionEntry> {
        self.latest
            .as_ref()
            .and_then(|latest| self.find_version(&latest.release))
            .or_else(|| self.releases().into_iter().next())
    }
}
