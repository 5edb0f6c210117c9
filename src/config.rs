//! Configuration for the tracking HTTP transport.
//!
//! All tunable transport parameters live here so they are not
//! hard-coded inside the client.

use std::time::Duration;

/// HTTP transport settings for tracking requests.
///
/// Timeouts and identification for the underlying HTTP client.
/// The tracker client itself defines no timeout semantics; whatever
/// is configured here is what bounds a `track` call.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// HTTP request timeout for tracking calls
    pub request_timeout: Duration,
    /// User agent for HTTP requests
    pub user_agent: &'static str,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            user_agent: "piwik-tracker/0.1.0",
        }
    }
}
