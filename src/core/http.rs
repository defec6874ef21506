use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;

use crate::core::config::Settings;

pub const APP_USER_AGENT: &str = concat!("mcfetch/", env!("CARGO_PKG_VERSION"));

/// Build the single shared client every transfer of a run goes through.
///
/// Transparent decompression is disabled: hashes in the manifest are over the
/// raw bytes on the wire. The request timeout is an idle limit between reads,
/// so a slow transfer that keeps making progress is never cut off.
pub fn build_http_client(settings: &Settings) -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(settings.user_agent.as_str())
        .default_headers(default_headers)
        .connect_timeout(Duration::from_secs(settings.request_timeout_secs.min(30)))
        .read_timeout(Duration::from_secs(settings.request_timeout_secs))
        .build()
}
