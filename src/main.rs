use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mcfetch::{InstallReport, LauncherResult, Pipeline, Settings};

/// Download and verify a Minecraft client version.
#[derive(Debug, Parser)]
#[command(name = "mcfetch", version, about)]
struct Cli {
    /// Version id as listed in the manifest (e.g. "1.20.1"), or "latest".
    version: String,

    /// Game directory; overrides the settings file.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Settings file (default: <root>/downloader_settings.json).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,mcfetch=debug")),
        )
        .init();

    let cli = Cli::parse();
    match install(cli).await {
        Ok(report) => {
            print_summary(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Install failed: {}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn install(cli: Cli) -> LauncherResult<InstallReport> {
    let config_path = match (&cli.config, &cli.root) {
        (Some(path), _) => path.clone(),
        (None, Some(root)) => Settings::default_path(root),
        (None, None) => Settings::default_path(&Settings::default().root),
    };
    let mut settings = Settings::load(&config_path)?;
    if let Some(root) = cli.root {
        settings.root = root;
    }

    Pipeline::new(settings)?.run(&cli.version).await
}

fn print_summary(report: &InstallReport) {
    println!("Installed {} in {:.2?}", report.version_id, report.elapsed);
    println!("  client jar:   {}", report.client_jar.display());
    println!("  libraries:    {}", report.libraries.len());
    println!(
        "  natives:      {} ({} files)",
        report.natives_dir.display(),
        report.natives_extracted
    );
    println!(
        "  assets:       {} (index {}, {} objects)",
        report.assets_dir.display(),
        report.asset_index_id,
        report.asset_objects
    );
    if let Some(log_config) = &report.log_config {
        println!("  log config:   {}", log_config.display());
    }
    println!(
        "  {} downloaded, {} already present",
        report.downloaded, report.already_present
    );
}
