//! HTTP client initialization.

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::Config;
use crate::error_handling::InitializationError;

/// Initializes the shared HTTP client used for source fetching and
/// geolocation.
///
/// Per-request timeouts are set at each call site, so the client itself only
/// carries the User-Agent and a connect timeout.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client(config: &Config) -> Result<reqwest::Client, InitializationError> {
    let client = ClientBuilder::new()
        .user_agent(config.user_agent.clone())
        .connect_timeout(Duration::from_secs(config.geo_timeout_secs.max(1)))
        .build()?;
    Ok(client)
}

/// Builds a client whose requests to `host` go to `addr` instead of DNS.
///
/// Used to push benchmark downloads through one specific candidate while the
/// request still carries the benchmark host's name (Host header and SNI).
/// Certificate validation is disabled.
pub fn init_pinned_client(
    user_agent: &str,
    host: &str,
    addr: SocketAddr,
    timeout: Duration,
) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .user_agent(user_agent)
        .resolve(host, addr)
        .danger_accept_invalid_certs(true)
        .timeout(timeout)
        .connect_timeout(timeout)
        .no_proxy()
        .build()
}
