use tracing::info;

use crate::core::error::LauncherResult;
use crate::core::paths::{contained, GameLayout};

use super::manifest::VersionManifest;
use super::version_file::VersionJson;

/// A manifest entry together with its fetched descriptor.
#[derive(Debug)]
pub struct ResolvedVersion {
    /// The manifest id the request resolved to (`latest` becomes e.g. `1.20.4`).
    pub id: String,
    pub descriptor: VersionJson,
}

/// Look `requested` up in the manifest at `manifest_url`, fetch its
/// descriptor and persist it verbatim under `versions/<id>/<id>.json`.
///
/// An id missing from the manifest is `VersionNotFound`.
pub async fn resolve_version(
    client: &reqwest::Client,
    manifest_url: &str,
    requested: &str,
    layout: &GameLayout,
) -> LauncherResult<ResolvedVersion> {
    let manifest = VersionManifest::fetch(client, manifest_url).await?;
    let entry = manifest.select(requested)?;
    let id = contained(&entry.id)?.to_string();

    let (descriptor, raw_json) = VersionJson::fetch(client, &entry.url).await?;
    let path = layout.version_json(&id);
    VersionJson::save_to(&raw_json, &path).await?;

    info!(
        "Resolved version {} as {} ({} libraries) -> {:?}",
        requested,
        id,
        descriptor.libraries.len(),
        path
    );
    Ok(ResolvedVersion { id, descriptor })
}
