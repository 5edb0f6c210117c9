//! HTTP transport seam for tracking requests.

use async_trait::async_trait;

use super::TrackerError;
use crate::config::ClientConfig;

/// Abstract transport for issuing tracking requests.
///
/// The client only needs the response status code of a single GET, so
/// that is all the trait exposes. Implementations must be safe to use
/// from concurrent tracking calls.
#[async_trait]
pub trait TrackerTransport: Send + Sync {
    /// Issues one GET request and returns the response status code.
    ///
    /// # Errors
    ///
    /// - `TrackerError::Http` - Connection, DNS resolution, or timeout failure
    async fn get(&self, url: &str) -> Result<u16, TrackerError>;
}

/// Reqwest-backed transport used by default.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates the transport from the given configuration.
    ///
    /// Redirects are not followed: a 301 from the endpoint is reported
    /// as a 301, so the client can treat it as an unsuccessful outcome
    /// instead of silently chasing it.
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(config.request_timeout)
                .user_agent(config.user_agent)
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .expect("HTTP client creation should not fail"),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}

#[async_trait]
impl TrackerTransport for HttpTransport {
    async fn get(&self, url: &str) -> Result<u16, TrackerError> {
        let response = self.client.get(url).send().await?;
        Ok(response.status().as_u16())
    }
}
