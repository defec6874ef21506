use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, StreamExt};
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::core::config::Settings;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::verify::{self, HashAlgorithm};

/// A single file to download with optional SHA-1 for validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadEntry {
    pub url: String,
    pub dest: PathBuf,
    pub sha1: Option<String>,
    pub size: Option<u64>,
}

impl DownloadEntry {
    pub fn new(url: impl Into<String>, dest: impl Into<PathBuf>, sha1: Option<String>) -> Self {
        Self {
            url: url.into(),
            dest: dest.into(),
            sha1,
            size: None,
        }
    }

    pub fn with_size(mut self, size: Option<u64>) -> Self {
        self.size = size;
        self
    }

    /// Attribute `err` to this entry within `phase`.
    pub fn failed(&self, phase: &'static str, err: LauncherError) -> LauncherError {
        LauncherError::PhaseFailed {
            phase,
            failures: vec![(self.dest.clone(), err.to_string())],
        }
    }
}

/// What `ensure` had to do to satisfy an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// The destination already held acceptable content; nothing was fetched.
    Present,
    /// The file was (re)fetched and, if a hash was given, verified.
    Downloaded { attempts: u32, bytes: u64 },
}

/// Bounded retry for integrity mismatches and transient transport errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Delay before attempt `n + 1` is `backoff * n`.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Result of a batch: counts for the happy paths, every failure kept.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub present: usize,
    pub downloaded: usize,
    pub failures: Vec<(DownloadEntry, LauncherError)>,
}

impl BatchReport {
    /// Turn a batch with failures into a `PhaseFailed` naming each resource.
    pub fn into_result(self, phase: &'static str) -> LauncherResult<Self> {
        if self.failures.is_empty() {
            return Ok(self);
        }
        let failures = self
            .failures
            .into_iter()
            .map(|(entry, err)| (entry.dest, err.to_string()))
            .collect();
        Err(LauncherError::PhaseFailed { phase, failures })
    }
}

/// Concurrent, SHA-1 validated downloader.
///
/// One instance is shared by every phase of a run: the HTTP client reuses
/// connections and the semaphore caps simultaneous transfers globally.
pub struct Downloader {
    client: Client,
    /// Maximum number of parallel downloads.
    concurrency: usize,
    permits: Arc<Semaphore>,
    retry: RetryPolicy,
}

impl Downloader {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            concurrency: 8,
            permits: Arc::new(Semaphore::new(8)),
            retry: RetryPolicy::default(),
        }
    }

    pub fn from_settings(client: Client, settings: &Settings) -> Self {
        Self::new(client)
            .with_concurrency(settings.concurrency)
            .with_retry(RetryPolicy {
                max_attempts: settings.max_attempts,
                backoff: Duration::from_millis(settings.retry_backoff_ms),
            })
    }

    pub fn with_concurrency(mut self, n: usize) -> Self {
        let n = n.max(1);
        self.concurrency = n;
        self.permits = Arc::new(Semaphore::new(n));
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = RetryPolicy {
            max_attempts: retry.max_attempts.max(1),
            ..retry
        };
        self
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    // ── Single file ─────────────────────────────────────

    /// Make sure `entry.dest` exists and, when a hash is given, matches it.
    ///
    /// An existing file without an expected hash is trusted as-is. Content is
    /// streamed to a sibling `.part` file and only moved into place once it
    /// verifies, so `dest` never holds a rejected download.
    pub async fn ensure(&self, entry: &DownloadEntry) -> LauncherResult<TransferOutcome> {
        let dest = entry.dest.as_path();
        let expected = entry.sha1.as_deref();

        if tokio::fs::try_exists(dest)
            .await
            .map_err(|e| LauncherError::io(dest, e))?
        {
            match expected {
                None => {
                    debug!("{:?} exists and has no known hash, skipping", dest);
                    return Ok(TransferOutcome::Present);
                }
                Some(sha1) if verify::matches_sha1(dest, sha1).await? => {
                    debug!("{:?} already present and verified", dest);
                    return Ok(TransferOutcome::Present);
                }
                Some(_) => debug!("{:?} exists but fails verification, refetching", dest),
            }
        }

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::io(parent, e))?;
        }

        let part = PartFile::new(dest);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let fetched = self.fetch_to(&entry.url, part.path()).await;
            let err = match fetched {
                Ok(bytes) => {
                    let mismatch = self.check(part.path(), dest, expected, attempt).await?;
                    let Some(mismatch) = mismatch else {
                        part.persist(dest).await?;
                        debug!("Downloaded: {} -> {:?} ({} bytes)", entry.url, dest, bytes);
                        return Ok(TransferOutcome::Downloaded {
                            attempts: attempt,
                            bytes,
                        });
                    };
                    mismatch
                }
                Err(err) => err,
            };

            let _ = tokio::fs::remove_file(part.path()).await;
            if !err.is_transient() || attempt >= self.retry.max_attempts {
                return Err(err);
            }
            warn!(
                "Attempt {}/{} for {} failed: {}",
                attempt, self.retry.max_attempts, entry.url, err
            );
            tokio::time::sleep(self.retry.backoff * attempt).await;
        }
    }

    /// Convenience wrapper over [`Downloader::ensure`].
    pub async fn download_file(
        &self,
        url: &str,
        dest: &Path,
        sha1_expected: Option<&str>,
    ) -> LauncherResult<TransferOutcome> {
        self.ensure(&DownloadEntry::new(
            url,
            dest,
            sha1_expected.map(str::to_string),
        ))
        .await
    }

    /// Stream one response body into `part`. Returns the number of bytes written.
    async fn fetch_to(&self, url: &str, part: &Path) -> LauncherResult<u64> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| LauncherError::PoolClosed(url.to_string()))?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Write inside a block so the handle is closed before the rename.
        let mut written = 0u64;
        {
            let mut file = tokio::fs::File::create(part)
                .await
                .map_err(|e| LauncherError::io(part, e))?;
            let mut body = response.bytes_stream();
            while let Some(chunk) = body.next().await {
                let chunk = chunk?;
                file.write_all(&chunk)
                    .await
                    .map_err(|e| LauncherError::io(part, e))?;
                written += chunk.len() as u64;
            }
            file.flush().await.map_err(|e| LauncherError::io(part, e))?;
        }
        Ok(written)
    }

    /// Re-hash a freshly written file. `Some(err)` on mismatch.
    async fn check(
        &self,
        part: &Path,
        dest: &Path,
        expected: Option<&str>,
        attempt: u32,
    ) -> LauncherResult<Option<LauncherError>> {
        let Some(expected) = expected else {
            return Ok(None);
        };
        let actual = verify::hash_file(part, HashAlgorithm::Sha1)
            .await?
            .unwrap_or_default();
        if actual.eq_ignore_ascii_case(expected) {
            return Ok(None);
        }
        Ok(Some(LauncherError::IntegrityMismatch {
            path: dest.to_path_buf(),
            expected: expected.to_string(),
            actual,
            attempts: attempt,
        }))
    }

    // ── Batch concurrent downloads ──────────────────────

    /// Download many files concurrently using `buffer_unordered`.
    ///
    /// A failing entry does not stop its siblings; every failure is reported.
    pub async fn download_batch(&self, entries: Vec<DownloadEntry>) -> BatchReport {
        info!(
            "Starting batch download: {} files, concurrency={}",
            entries.len(),
            self.concurrency
        );

        let results: Vec<_> = stream::iter(entries)
            .map(|entry| async move {
                let result = self.ensure(&entry).await;
                (entry, result)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut report = BatchReport::default();
        for (entry, result) in results {
            match result {
                Ok(TransferOutcome::Present) => report.present += 1,
                Ok(TransferOutcome::Downloaded { .. }) => report.downloaded += 1,
                Err(e) => {
                    warn!("Download failed for {:?}: {}", entry.dest, e);
                    report.failures.push((entry, e));
                }
            }
        }
        report
    }
}

/// Sibling `.part` file for one transfer.
///
/// Dropping the guard removes the file, so a transfer cancelled mid-stream
/// (a sibling phase failed, the run was aborted) leaves nothing behind.
struct PartFile {
    path: PathBuf,
    armed: bool,
}

impl PartFile {
    fn new(dest: &Path) -> Self {
        Self {
            path: part_path(dest),
            armed: true,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    /// Move the verified file into place; the guard no longer owns it.
    async fn persist(mut self, dest: &Path) -> LauncherResult<()> {
        tokio::fs::rename(&self.path, dest)
            .await
            .map_err(|e| LauncherError::io(dest, e))?;
        self.armed = false;
        Ok(())
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        if self.armed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}
