// ─── Install Pipeline ───
// Resolve a version, fetch everything it needs concurrently, unpack natives.

use std::future::Future;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, warn};

use crate::core::assets::AssetManager;
use crate::core::config::Settings;
use crate::core::downloader::{DownloadEntry, Downloader, TransferOutcome};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::build_http_client;
use crate::core::natives::extract_natives;
use crate::core::paths::GameLayout;
use crate::core::platform::Platform;
use crate::core::version::{
    build_library_plan, client_entry, log_config_entry, resolve_version, LibraryPlan,
    ResolvedVersion,
};

/// Everything the launcher needs to start the version that was just installed.
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    pub version_id: String,
    pub client_jar: PathBuf,
    /// Library files in descriptor order (classpath candidates).
    pub libraries: Vec<PathBuf>,
    pub natives_dir: PathBuf,
    pub natives_extracted: usize,
    pub assets_dir: PathBuf,
    pub asset_index_id: String,
    pub asset_objects: usize,
    pub log_config: Option<PathBuf>,
    /// Files fetched during this run.
    pub downloaded: usize,
    /// Files that were already present and verified.
    pub already_present: usize,
    pub elapsed: Duration,
}

pub struct Pipeline {
    settings: Settings,
    layout: GameLayout,
    downloader: Downloader,
    platform: Option<Platform>,
}

impl Pipeline {
    pub fn new(settings: Settings) -> LauncherResult<Self> {
        let client = build_http_client(&settings)?;
        let downloader = Downloader::from_settings(client, &settings);
        let layout = GameLayout::new(settings.root.clone());
        Ok(Self {
            settings,
            layout,
            downloader,
            platform: None,
        })
    }

    /// Pin the target platform instead of detecting the host.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Install `requested` (a manifest id or `latest`) under the configured root.
    ///
    /// Libraries, client jar, assets and log config run concurrently; the
    /// first phase to fail cancels the others. Natives are extracted only
    /// after every library download has landed.
    pub async fn run(&self, requested: &str) -> LauncherResult<InstallReport> {
        let started = Instant::now();
        let platform = match self.platform {
            Some(platform) => platform,
            None => Platform::current()?,
        };
        info!("Installing {} for {}", requested, platform);

        let ResolvedVersion {
            id: version_id,
            descriptor: version,
        } = timed(
            "manifest",
            resolve_version(
                self.downloader.client(),
                &self.settings.manifest_url,
                requested,
                &self.layout,
            ),
        )
        .await?;
        let version_id = version_id.as_str();

        let asset_info = version.asset_index.clone().ok_or_else(|| {
            LauncherError::MissingDescriptorField {
                version: version_id.to_string(),
                field: "assetIndex",
            }
        })?;
        let client = client_entry(&version, &self.layout)?;
        let log_config = log_config_entry(&version, &self.layout)?;
        let LibraryPlan {
            entries: library_entries,
            native_archives,
        } = build_library_plan(&version, &self.layout, &platform)?;
        let libraries: Vec<PathBuf> = library_entries.iter().map(|e| e.dest.clone()).collect();

        let library_phase = timed("libraries", async {
            self.downloader
                .download_batch(library_entries)
                .await
                .into_result("libraries")
        });
        let client_phase = timed("client", self.ensure_one("client", &client));
        let asset_phase = timed(
            "assets",
            AssetManager::download_assets(
                &asset_info,
                &self.layout,
                &self.settings.resources_url,
                &self.downloader,
            ),
        );
        let log_phase = timed("log config", async {
            match &log_config {
                Some(entry) => self.ensure_one("log config", entry).await.map(Some),
                None => {
                    info!("Version {} declares no log configuration", version_id);
                    Ok(None)
                }
            }
        });

        let (library_batch, client_outcome, assets, log_outcome) =
            tokio::try_join!(library_phase, client_phase, asset_phase, log_phase)?;

        let natives_dir = self.layout.natives_dir(version_id);
        let extraction = timed(
            "natives",
            extract_natives(native_archives, natives_dir.clone(), platform.arch),
        )
        .await?;

        let singles: Vec<TransferOutcome> =
            std::iter::once(client_outcome).chain(log_outcome).collect();
        let fetched_singles = singles
            .iter()
            .filter(|o| matches!(o, TransferOutcome::Downloaded { .. }))
            .count();
        let present_singles = singles.len() - fetched_singles;

        let report = InstallReport {
            version_id: version_id.to_string(),
            client_jar: client.dest,
            libraries,
            natives_dir,
            natives_extracted: extraction.extracted.len(),
            assets_dir: self.layout.assets_dir(),
            asset_index_id: assets.index_id,
            asset_objects: assets.objects,
            log_config: log_config.map(|e| e.dest),
            downloaded: library_batch.downloaded + assets.batch.downloaded + fetched_singles,
            already_present: library_batch.present + assets.batch.present + present_singles,
            elapsed: started.elapsed(),
        };
        info!(
            "Installed {} in {:.2?} ({} downloaded, {} already present)",
            version_id, report.elapsed, report.downloaded, report.already_present
        );
        Ok(report)
    }

    async fn ensure_one(
        &self,
        phase: &'static str,
        entry: &DownloadEntry,
    ) -> LauncherResult<TransferOutcome> {
        self.downloader
            .ensure(entry)
            .await
            .map_err(|e| entry.failed(phase, e))
    }
}

async fn timed<T>(
    phase: &'static str,
    fut: impl Future<Output = LauncherResult<T>>,
) -> LauncherResult<T> {
    let start = Instant::now();
    let result = fut.await;
    match &result {
        Ok(_) => info!("{} phase finished in {:.2?}", phase, start.elapsed()),
        Err(e) => warn!("{} phase failed after {:.2?}: {}", phase, start.elapsed(), e),
    }
    result
}
