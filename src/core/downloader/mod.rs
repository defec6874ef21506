mod client;

pub use client::{BatchReport, DownloadEntry, Downloader, RetryPolicy, TransferOutcome};
