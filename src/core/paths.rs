// ─── Game Layout ───
// Every on-disk location the downloader writes, derived from one root.

use std::path::{Component, Path, PathBuf};

use crate::core::error::{LauncherError, LauncherResult};

/// Filesystem layout rooted at the configured game directory.
///
/// ```text
/// <root>/
///   versions/<id>/<id>.json
///   versions/<id>/<id>.jar
///   versions/<id>/<id>-natives/
///   libraries/<maven path>
///   assets/indexes/<index id>.json
///   assets/objects/<hh>/<hash>
///   logs/<log config id>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameLayout {
    root: PathBuf,
}

impl GameLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn version_dir(&self, version_id: &str) -> PathBuf {
        self.root.join("versions").join(version_id)
    }

    pub fn version_json(&self, version_id: &str) -> PathBuf {
        self.version_dir(version_id)
            .join(format!("{}.json", version_id))
    }

    pub fn client_jar(&self, version_id: &str) -> PathBuf {
        self.version_dir(version_id).join(format!("{}.jar", version_id))
    }

    pub fn natives_dir(&self, version_id: &str) -> PathBuf {
        self.version_dir(version_id)
            .join(format!("{}-natives", version_id))
    }

    pub fn libraries_dir(&self) -> PathBuf {
        self.root.join("libraries")
    }

    /// Resolve a library's repository-relative path (`org/lwjgl/.../x.jar`).
    pub fn library(&self, relative: &str) -> LauncherResult<PathBuf> {
        Ok(self.libraries_dir().join(contained(relative)?))
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root.join("assets")
    }

    pub fn asset_index(&self, index_id: &str) -> LauncherResult<PathBuf> {
        Ok(self
            .assets_dir()
            .join("indexes")
            .join(format!("{}.json", contained(index_id)?)))
    }

    /// Content-addressed object location: `objects/<hash[0:2]>/<hash>`.
    pub fn asset_object(&self, hash: &str) -> LauncherResult<PathBuf> {
        let hash = contained(hash)?;
        Ok(self
            .assets_dir()
            .join("objects")
            .join(hash_prefix(hash))
            .join(hash))
    }

    pub fn log_config(&self, file_id: &str) -> LauncherResult<PathBuf> {
        Ok(self.root.join("logs").join(contained(file_id)?))
    }
}

/// Accept a path fragment from upstream metadata only if joining it keeps
/// the result under the directory it is joined to.
///
/// Absolute paths, drive prefixes, `.` and `..` components are all refused.
pub fn contained(fragment: &str) -> LauncherResult<&str> {
    let mut components = Path::new(fragment).components().peekable();
    let escapes = components.peek().is_none()
        || components.any(|c| !matches!(c, Component::Normal(_)));
    if escapes {
        return Err(LauncherError::UnsafePath(fragment.to_string()));
    }
    Ok(fragment)
}

/// First two characters of a content hash, the fan-out directory name.
pub fn hash_prefix(hash: &str) -> &str {
    hash.get(..2).unwrap_or(hash)
}
