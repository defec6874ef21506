// ─── mcfetch Core ───
// Manifest-driven, hash-verified client downloader.
//
// Architecture:
//   core/
//     config      — Settings file + defaults (root, URLs, limits)
//     paths       — On-disk layout derived from the root
//     platform    — Host OS/arch and native classifier tags
//     verify      — Streaming file digests
//     downloader/ — Concurrent downloads with SHA-1 validation and bounded retry
//     version/    — Mojang manifest, version JSON, dependency work lists
//     assets/     — Asset index + object downloads
//     natives/    — Arch rule table + flattened native extraction
//     pipeline    — Orchestrates one install run

pub mod assets;
pub mod config;
pub mod downloader;
pub mod error;
pub mod http;
pub mod natives;
pub mod paths;
pub mod pipeline;
pub mod platform;
pub mod verify;
pub mod version;
