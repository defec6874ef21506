// ─── Dependency Sets ───
// Turns a version descriptor into download work lists.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::debug;

use crate::core::downloader::DownloadEntry;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::paths::{contained, GameLayout};
use crate::core::platform::Platform;

use super::version_file::{LibDownloadArtifact, VersionJson};

/// Library downloads plus the subset that are this platform's native bundles.
#[derive(Debug, Default)]
pub struct LibraryPlan {
    pub entries: Vec<DownloadEntry>,
    /// Destinations to unpack once every library download has landed.
    pub native_archives: Vec<PathBuf>,
}

/// Build the library work list.
///
/// Every artifact and every classifier is downloaded, except native
/// *artifacts* for another OS, which are dropped. Anything whose path carries
/// the current platform's native marker is also queued for extraction.
/// A library path that would land outside `libraries/` fails the plan.
pub fn build_library_plan(
    version: &VersionJson,
    layout: &GameLayout,
    platform: &Platform,
) -> LauncherResult<LibraryPlan> {
    let marker = platform.native_marker();
    let mut plan = LibraryPlan::default();
    let mut seen = HashSet::new();

    let mut push = |artifact: &LibDownloadArtifact,
                    plan: &mut LibraryPlan|
     -> LauncherResult<()> {
        let dest = layout.library(&artifact.path)?;
        if !seen.insert(dest.clone()) {
            return Ok(());
        }
        if artifact.path.contains(&marker) {
            plan.native_archives.push(dest.clone());
        }
        plan.entries.push(
            DownloadEntry::new(artifact.url.clone(), dest, artifact.sha1.clone())
                .with_size(artifact.size),
        );
        Ok(())
    };

    for lib in &version.libraries {
        let Some(downloads) = &lib.downloads else {
            continue;
        };

        if let Some(artifact) = &downloads.artifact {
            if artifact.is_native() && !artifact.path.contains(&marker) {
                debug!("Skipping foreign native artifact: {}", artifact.path);
            } else {
                push(artifact, &mut plan)?;
            }
        }

        if let Some(classifiers) = &downloads.classifiers {
            for classifier in classifiers.values() {
                push(classifier, &mut plan)?;
            }
        }
    }

    debug!(
        "Library plan: {} downloads, {} native archives for {}",
        plan.entries.len(),
        plan.native_archives.len(),
        platform
    );
    Ok(plan)
}

/// The version's main client jar at `versions/<id>/<id>.jar`.
pub fn client_entry(version: &VersionJson, layout: &GameLayout) -> LauncherResult<DownloadEntry> {
    let client = version
        .client_download()
        .ok_or_else(|| LauncherError::MissingDescriptorField {
            version: version.id.clone(),
            field: "downloads.client",
        })?;
    Ok(DownloadEntry::new(
        client.url.clone(),
        layout.client_jar(contained(&version.id)?),
        client.sha1.clone(),
    )
    .with_size(client.size))
}

/// The logging configuration file, if the descriptor declares one.
pub fn log_config_entry(
    version: &VersionJson,
    layout: &GameLayout,
) -> LauncherResult<Option<DownloadEntry>> {
    let Some(file) = version.log_config_file() else {
        return Ok(None);
    };
    Ok(Some(
        DownloadEntry::new(file.url.clone(), layout.log_config(&file.id)?, file.sha1.clone())
            .with_size(file.size),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn linux() -> Platform {
        Platform::detect("linux", "x86_64").unwrap()
    }

    fn descriptor(libraries: serde_json::Value) -> VersionJson {
        serde_json::from_value(serde_json::json!({
            "id": "1.20.1",
            "downloads": {
                "client": { "url": "https://example.com/client.jar", "sha1": "c0ffee", "size": 3 }
            },
            "libraries": libraries
        }))
        .unwrap()
    }

    fn dests(plan: &LibraryPlan) -> Vec<String> {
        plan.entries
            .iter()
            .map(|e| {
                e.dest
                    .strip_prefix("/game/libraries")
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }

    #[test]
    fn foreign_classifiers_download_but_only_own_are_extracted() {
        let version = descriptor(serde_json::json!([{
            "name": "org.lwjgl:lwjgl:3.3.1",
            "downloads": {
                "artifact": { "path": "org/lwjgl/lwjgl.jar", "url": "https://e/lwjgl.jar", "sha1": "01" },
                "classifiers": {
                    "natives-linux": { "path": "org/lwjgl/lwjgl-natives-linux.jar", "url": "https://e/l.jar", "sha1": "02" },
                    "natives-windows": { "path": "org/lwjgl/lwjgl-natives-windows.jar", "url": "https://e/w.jar", "sha1": "03" }
                }
            }
        }]));
        let layout = GameLayout::new("/game");

        let plan = build_library_plan(&version, &layout, &linux()).unwrap();

        assert_eq!(
            dests(&plan),
            [
                "org/lwjgl/lwjgl.jar",
                "org/lwjgl/lwjgl-natives-linux.jar",
                "org/lwjgl/lwjgl-natives-windows.jar"
            ]
        );
        assert_eq!(
            plan.native_archives,
            [Path::new("/game/libraries/org/lwjgl/lwjgl-natives-linux.jar")]
        );
    }

    #[test]
    fn foreign_native_artifacts_are_never_downloaded() {
        let version = descriptor(serde_json::json!([
            {
                "name": "org.lwjgl:lwjgl:3.3.3:natives-windows",
                "downloads": {
                    "artifact": { "path": "org/lwjgl/lwjgl-3.3.3-natives-windows.jar", "url": "https://e/w", "sha1": "aa" }
                }
            },
            {
                "name": "org.lwjgl:lwjgl:3.3.3:natives-windows-arm64",
                "downloads": {
                    "artifact": { "path": "org/lwjgl/lwjgl-3.3.3-natives-windows-arm64.jar", "url": "https://e/wa", "sha1": "ab" }
                }
            },
            {
                "name": "org.lwjgl:lwjgl:3.3.3:natives-linux",
                "downloads": {
                    "artifact": { "path": "org/lwjgl/lwjgl-3.3.3-natives-linux.jar", "url": "https://e/l", "sha1": "bb" }
                }
            }
        ]));
        let layout = GameLayout::new("/game");

        let plan = build_library_plan(&version, &layout, &linux()).unwrap();
        assert_eq!(dests(&plan), ["org/lwjgl/lwjgl-3.3.3-natives-linux.jar"]);
        assert_eq!(plan.native_archives.len(), 1);

        let windows = Platform::detect("windows", "x86_64").unwrap();
        let plan = build_library_plan(&version, &layout, &windows).unwrap();
        assert_eq!(dests(&plan), ["org/lwjgl/lwjgl-3.3.3-natives-windows.jar"]);
    }

    #[test]
    fn duplicate_library_paths_yield_one_task() {
        let lib = serde_json::json!({
            "name": "com.mojang:brigadier:1.0.18",
            "downloads": {
                "artifact": { "path": "com/mojang/brigadier.jar", "url": "https://e/b", "sha1": "cc" }
            }
        });
        let version = descriptor(serde_json::json!([lib.clone(), lib]));
        let plan = build_library_plan(&version, &GameLayout::new("/game"), &linux()).unwrap();
        assert_eq!(plan.entries.len(), 1);
    }

    #[test]
    fn client_and_optional_log_config_entries() {
        let version = descriptor(serde_json::json!([]));
        let layout = GameLayout::new("/game");

        let client = client_entry(&version, &layout).unwrap();
        assert_eq!(client.dest, Path::new("/game/versions/1.20.1/1.20.1.jar"));
        assert_eq!(client.sha1.as_deref(), Some("c0ffee"));
        assert_eq!(client.size, Some(3));

        assert!(log_config_entry(&version, &layout).unwrap().is_none());
    }

    #[test]
    fn library_path_escaping_the_root_fails_the_plan() {
        let version = descriptor(serde_json::json!([{
            "name": "evil:evil:1.0",
            "downloads": {
                "artifact": { "path": "../../../etc/cron.d/evil", "url": "https://e/x", "sha1": "dd" }
            }
        }]));
        let err = build_library_plan(&version, &GameLayout::new("/game"), &linux()).unwrap_err();
        assert!(matches!(err, LauncherError::UnsafePath(path) if path.contains("cron.d")));
    }

    #[test]
    fn descriptor_without_client_is_reported() {
        let version: VersionJson =
            serde_json::from_value(serde_json::json!({ "id": "old" })).unwrap();
        let err = client_entry(&version, &GameLayout::new("/game")).unwrap_err();
        assert!(err.to_string().contains("downloads.client"));
    }
}
