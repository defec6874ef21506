pub mod dependencies;
pub mod manifest;
pub mod resolve;
pub mod version_file;

pub use dependencies::{build_library_plan, client_entry, log_config_entry, LibraryPlan};
pub use manifest::{LatestVersions, VersionEntry, VersionManifest, LATEST_RELEASE};
pub use resolve::{resolve_version, ResolvedVersion};
pub use version_file::{
    AssetIndexInfo, DownloadArtifact, LibDownloadArtifact, LibraryDownloads, LibraryEntry,
    LoggingFile, VersionDownloads, VersionJson,
};
