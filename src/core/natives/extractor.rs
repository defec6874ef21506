use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::platform::Arch;

use super::rules::{flattened_name, EntryDecision, NativeRules};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    pub archives: usize,
    /// Flattened names written, in extraction order (repeats mean overwrite).
    pub extracted: Vec<String>,
    pub skipped: usize,
}

/// Unpack every archive into `natives_dir`, flattening entry paths.
///
/// Entries are filtered by [`NativeRules`] for `arch`. Later archives
/// overwrite earlier files with the same basename.
pub async fn extract_natives(
    archives: Vec<PathBuf>,
    natives_dir: PathBuf,
    arch: Arch,
) -> LauncherResult<ExtractionReport> {
    tokio::fs::create_dir_all(&natives_dir)
        .await
        .map_err(|e| LauncherError::io(&natives_dir, e))?;

    let rules = NativeRules::for_arch(arch);
    let report = tokio::task::spawn_blocking(move || {
        let mut report = ExtractionReport::default();
        for archive in &archives {
            extract_archive(archive, &natives_dir, &rules, &mut report)?;
            report.archives += 1;
        }
        Ok::<_, LauncherError>(report)
    })
    .await??;

    info!(
        "Extracted {} native files from {} archives ({} entries skipped)",
        report.extracted.len(),
        report.archives,
        report.skipped
    );
    Ok(report)
}

fn extract_archive(
    archive_path: &Path,
    dest_dir: &Path,
    rules: &NativeRules,
    report: &mut ExtractionReport,
) -> LauncherResult<()> {
    let file = File::open(archive_path).map_err(|e| LauncherError::io(archive_path, e))?;
    let mut archive = zip::ZipArchive::new(file)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let name = entry.name().to_string();

        if entry.is_dir() || rules.decide(&name) == EntryDecision::Skip {
            report.skipped += 1;
            continue;
        }
        let Some(flat) = flattened_name(&name) else {
            report.skipped += 1;
            continue;
        };

        let dest = dest_dir.join(flat);
        let mut out = File::create(&dest).map_err(|e| LauncherError::io(&dest, e))?;
        std::io::copy(&mut entry, &mut out).map_err(|e| LauncherError::io(&dest, e))?;
        debug!("Extracted native: {} -> {:?}", name, dest);
        report.extracted.push(flat.to_string());
    }

    Ok(())
}
