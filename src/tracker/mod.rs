//! Piwik/Matomo tracking client abstractions and implementations.
//!
//! One client type, one operation: merge tracking parameters, encode
//! them as a query string, issue a single HTTP GET, and report whether
//! the endpoint answered 200. Transport access sits behind a trait so
//! tests can script responses without a live endpoint.

pub mod client;
pub mod params;
pub mod simulated;
pub mod transport;

// Re-export public API
pub use client::PiwikTracker;
pub use params::{SiteId, TrackingOptions, merge_layers};
pub use simulated::SimulatedTransport;
pub use transport::{HttpTransport, TrackerTransport};

/// Errors that can bubble up from tracker construction or tracking calls.
///
/// The first three variants are construction-time validation failures;
/// the caller must fix its configuration and construct a new client.
/// `Http` wraps whatever the transport raised during a tracking call
/// and is propagated untouched, never caught or retried.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Piwik site id must not be empty")]
    MissingSiteId,

    #[error("Piwik tracker URL must not be empty, e.g. http://example.org/piwik.php")]
    MissingTrackerUrl,

    #[error("A tracker URL must end with \"piwik.php\": {url}")]
    InvalidTrackerUrl { url: String },

    #[error("HTTP error")]
    Http(#[from] reqwest::Error),
}
