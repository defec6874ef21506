use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Central error type for the downloader.
/// Every module returns `Result<T, LauncherError>`.
#[derive(Debug, Error)]
pub enum LauncherError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    // ── Integrity ───────────────────────────────────────
    #[error(
        "Hash mismatch for {path:?} after {attempts} attempt(s): expected {expected}, got {actual}"
    )]
    IntegrityMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
        attempts: u32,
    },

    // ── Manifest ────────────────────────────────────────
    #[error("Minecraft version {0} not found in manifest")]
    VersionNotFound(String),

    #[error("Version {version} has no {field} in its descriptor")]
    MissingDescriptorField {
        version: String,
        field: &'static str,
    },

    // ── Layout ──────────────────────────────────────────
    #[error("Refusing to write {0:?} outside the game directory")]
    UnsafePath(String),

    // ── Platform ────────────────────────────────────────
    #[error("Unsupported platform: os={os}, arch={arch}")]
    UnsupportedPlatform { os: String, arch: String },

    // ── Pipeline ────────────────────────────────────────
    #[error("{phase} phase failed for {} resource(s): {}", .failures.len(), FailureList(.failures))]
    PhaseFailed {
        phase: &'static str,
        failures: Vec<(PathBuf, String)>,
    },

    /// The transfer semaphore is never closed while a `Downloader` is alive,
    /// so this only surfaces if that ownership changes.
    #[error("Download pool was closed before {0} could start")]
    PoolClosed(String),

    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Config ──────────────────────────────────────────
    #[error("Invalid settings file {path:?}: {reason}")]
    Config { path: PathBuf, reason: String },

    // ── Archive ─────────────────────────────────────────
    #[error("Zip extraction error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Convenience alias used throughout the crate.
pub type LauncherResult<T> = Result<T, LauncherError>;

impl From<std::io::Error> for LauncherError {
    fn from(source: std::io::Error) -> Self {
        LauncherError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

impl LauncherError {
    /// Build an `Io` variant bound to the path that caused it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LauncherError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether a fresh attempt at the same transfer could succeed.
    ///
    /// Client errors (4xx) are final; everything on the wire or a 5xx is not.
    pub fn is_transient(&self) -> bool {
        match self {
            LauncherError::Http(e) => {
                e.is_timeout() || e.is_connect() || e.is_body() || e.is_request()
            }
            LauncherError::DownloadFailed { status, .. } => *status >= 500,
            LauncherError::IntegrityMismatch { .. } => true,
            _ => false,
        }
    }
}

struct FailureList<'a>(&'a [(PathBuf, String)]);

impl fmt::Display for FailureList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (path, reason)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{} ({})", path.display(), reason)?;
        }
        Ok(())
    }
}
