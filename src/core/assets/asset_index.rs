use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::core::downloader::{BatchReport, DownloadEntry, Downloader};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::paths::{hash_prefix, GameLayout};
use crate::core::version::AssetIndexInfo;

/// Manages Minecraft asset downloads (sounds, textures referenced by asset index).
pub struct AssetManager;

/// Top-level asset index JSON structure.
#[derive(Debug, Deserialize)]
pub struct AssetIndex {
    pub objects: HashMap<String, AssetObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetObject {
    pub hash: String,
    pub size: u64,
}

/// What the asset phase fetched.
#[derive(Debug)]
pub struct AssetReport {
    pub index_id: String,
    /// Distinct objects named by the index.
    pub objects: usize,
    pub batch: BatchReport,
}

impl AssetIndex {
    /// Parse an asset index that has already been downloaded and verified.
    pub async fn load(path: &Path) -> LauncherResult<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| LauncherError::io(path, e))?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// One entry per distinct content hash, at `objects/<hh>/<hash>`.
    ///
    /// Several logical names may share one object; they collapse to one task.
    pub fn object_entries(
        &self,
        layout: &GameLayout,
        resources_url: &str,
    ) -> LauncherResult<Vec<DownloadEntry>> {
        let base = resources_url.trim_end_matches('/');
        let unique: BTreeMap<&str, &AssetObject> = self
            .objects
            .values()
            .map(|obj| (obj.hash.as_str(), obj))
            .collect();

        unique
            .into_values()
            .map(|obj| -> LauncherResult<DownloadEntry> {
                let dest = layout.asset_object(&obj.hash)?;
                let url = format!("{}/{}/{}", base, hash_prefix(&obj.hash), obj.hash);
                Ok(DownloadEntry::new(url, dest, Some(obj.hash.clone())).with_size(Some(obj.size)))
            })
            .collect()
    }
}

impl AssetManager {
    /// Download the asset index JSON and all referenced assets.
    ///
    /// The index is fetched and verified first; object tasks are only built
    /// from it afterwards.
    pub async fn download_assets(
        info: &AssetIndexInfo,
        layout: &GameLayout,
        resources_url: &str,
        downloader: &Downloader,
    ) -> LauncherResult<AssetReport> {
        // 1. Asset index JSON
        let index_path = layout.asset_index(&info.id)?;
        let index_entry = DownloadEntry::new(info.url.clone(), &index_path, info.sha1.clone());
        downloader
            .ensure(&index_entry)
            .await
            .map_err(|e| index_entry.failed("asset index", e))?;
        let index = AssetIndex::load(&index_path).await?;

        // 2. Object entries
        let entries = index.object_entries(layout, resources_url)?;
        let objects = entries.len();
        info!(
            "Asset index {}: {} objects ({} names)",
            info.id,
            objects,
            index.objects.len()
        );

        // 3. Batch
        let batch = downloader.download_batch(entries).await.into_result("assets")?;
        info!(
            "Assets ready: {} downloaded, {} already cached",
            batch.downloaded, batch.present
        );

        Ok(AssetReport {
            index_id: info.id.clone(),
            objects,
            batch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_hashes_collapse_to_one_object() {
        let index: AssetIndex = serde_json::from_value(serde_json::json!({
            "objects": {
                "minecraft/sounds/a.ogg": { "hash": "abcdef0123", "size": 10 },
                "minecraft/sounds/b.ogg": { "hash": "abcdef0123", "size": 10 },
                "icons/icon_16x16.png": { "hash": "1234567890", "size": 5 }
            }
        }))
        .unwrap();
        let layout = GameLayout::new("/game");

        let entries = index
            .object_entries(&layout, "https://resources.example.com/")
            .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].url, "https://resources.example.com/12/1234567890");
        assert_eq!(
            entries[0].dest,
            Path::new("/game/assets/objects/12/1234567890")
        );
        assert_eq!(entries[0].sha1.as_deref(), Some("1234567890"));
        assert_eq!(entries[1].dest, Path::new("/game/assets/objects/ab/abcdef0123"));
        assert_eq!(entries[1].size, Some(10));
    }

    #[test]
    fn traversal_in_object_hash_is_refused() {
        let index: AssetIndex = serde_json::from_value(serde_json::json!({
            "objects": { "x": { "hash": "../../../../etc/passwd", "size": 1 } }
        }))
        .unwrap();
        let err = index
            .object_entries(&GameLayout::new("/game"), "https://r.example.com")
            .unwrap_err();
        assert!(matches!(err, LauncherError::UnsafePath(_)));
    }
}
