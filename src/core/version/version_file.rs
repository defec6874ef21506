// ─── Version File ───
// Parses a Mojang version JSON (the per-version descriptor).

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::core::error::{LauncherError, LauncherResult};

/// The parts of a Mojang version JSON the downloader needs.
///
/// Launch-only fields (`mainClass`, `arguments`, ...) are left to the
/// launcher and ignored here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionJson {
    pub id: String,
    #[serde(default)]
    pub libraries: Vec<LibraryEntry>,
    #[serde(default)]
    pub downloads: Option<VersionDownloads>,
    #[serde(default)]
    pub asset_index: Option<AssetIndexInfo>,
    #[serde(default)]
    pub logging: Option<LoggingInfo>,
}

#[derive(Debug, Deserialize)]
pub struct VersionDownloads {
    pub client: Option<DownloadArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadArtifact {
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetIndexInfo {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub total_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct LoggingInfo {
    #[serde(default)]
    pub client: Option<LoggingConfig>,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub file: LoggingFile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingFile {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

// ─── Library Entry ───

#[derive(Debug, Deserialize)]
pub struct LibraryEntry {
    pub name: String,
    #[serde(default)]
    pub downloads: Option<LibraryDownloads>,
}

#[derive(Debug, Deserialize)]
pub struct LibraryDownloads {
    #[serde(default)]
    pub artifact: Option<LibDownloadArtifact>,
    /// `natives-<os>` (and similar) → platform bundle.
    #[serde(default)]
    pub classifiers: Option<BTreeMap<String, LibDownloadArtifact>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibDownloadArtifact {
    pub path: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    pub url: String,
}

impl LibDownloadArtifact {
    /// A path is a native bundle iff it mentions `natives`.
    pub fn is_native(&self) -> bool {
        self.path.contains("natives")
    }
}

impl VersionJson {
    /// Fetch and parse a version JSON from the given URL using a shared client.
    ///
    /// The raw text is returned alongside so it can be persisted verbatim.
    pub async fn fetch(client: &reqwest::Client, url: &str) -> LauncherResult<(Self, String)> {
        let response = client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let raw = response.text().await?;
        let version_json: VersionJson = serde_json::from_str(&raw)?;
        Ok((version_json, raw))
    }

    /// Save the raw version JSON to `path`, creating its directory.
    pub async fn save_to(raw_json: &str, path: &Path) -> LauncherResult<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::io(parent, e))?;
        }
        tokio::fs::write(path, raw_json)
            .await
            .map_err(|e| LauncherError::io(path, e))?;
        Ok(())
    }

    pub fn client_download(&self) -> Option<&DownloadArtifact> {
        self.downloads.as_ref()?.client.as_ref()
    }

    pub fn log_config_file(&self) -> Option<&LoggingFile> {
        Some(&self.logging.as_ref()?.client.as_ref()?.file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_descriptor_with_classifiers_and_logging() {
        let parsed: VersionJson = serde_json::from_value(serde_json::json!({
            "id": "1.12.2",
            "mainClass": "net.minecraft.client.main.Main",
            "assetIndex": {
                "id": "1.12",
                "url": "https://example.com/1.12.json",
                "sha1": "1584b57c1d0f8a8b5e9a0c5ea3a5f0f8e0b0f3f7",
                "totalSize": 127227
            },
            "downloads": {
                "client": { "url": "https://example.com/client.jar", "sha1": "0f27", "size": 10 }
            },
            "logging": {
                "client": {
                    "argument": "-Dlog4j.configurationFile=${path}",
                    "file": { "id": "client-1.12.xml", "url": "https://example.com/l.xml", "sha1": "bd65", "size": 888 },
                    "type": "log4j2-xml"
                }
            },
            "libraries": [
                {
                    "name": "org.lwjgl.lwjgl:lwjgl-platform:2.9.4",
                    "downloads": {
                        "classifiers": {
                            "natives-linux": { "path": "lwjgl-platform-natives-linux.jar", "url": "https://example.com/l.jar", "sha1": "aa" },
                            "natives-windows": { "path": "lwjgl-platform-natives-windows.jar", "url": "https://example.com/w.jar", "sha1": "bb" }
                        }
                    },
                    "natives": { "linux": "natives-linux", "windows": "natives-windows" },
                    "rules": [{ "action": "allow" }]
                },
                { "name": "com.example:no-downloads:1.0" }
            ]
        }))
        .unwrap();

        assert_eq!(parsed.id, "1.12.2");
        assert_eq!(parsed.asset_index.as_ref().unwrap().total_size, Some(127227));
        assert_eq!(parsed.client_download().unwrap().sha1.as_deref(), Some("0f27"));
        assert_eq!(parsed.log_config_file().unwrap().id, "client-1.12.xml");

        let classifiers = parsed.libraries[0]
            .downloads
            .as_ref()
            .unwrap()
            .classifiers
            .as_ref()
            .unwrap();
        assert_eq!(classifiers.len(), 2);
        assert!(classifiers["natives-linux"].is_native());
        assert!(parsed.libraries[1].downloads.is_none());
    }

    #[test]
    fn logging_block_is_optional() {
        let parsed: VersionJson = serde_json::from_value(serde_json::json!({
            "id": "rd-132211",
            "libraries": []
        }))
        .unwrap();
        assert!(parsed.log_config_file().is_none());
        assert!(parsed.client_download().is_none());
    }

    #[tokio::test]
    async fn saved_descriptor_keeps_raw_text() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("versions/x/x.json");
        let raw = r#"{"id":"x","libraries":[]}"#;

        VersionJson::save_to(raw, &path).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), raw);
    }
}
