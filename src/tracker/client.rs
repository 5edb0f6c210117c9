//! Piwik tracking client: validated construction and the tracking call.

use std::sync::Arc;

use super::TrackerError;
use super::params::{SiteId, TrackingOptions, merge_layers};
use super::transport::{HttpTransport, TrackerTransport};
use crate::config::ClientConfig;

/// Tracker URLs must point at the Piwik tracking endpoint script.
const TRACKER_URL_SUFFIX: &str = "piwik.php";

/// Client for one Piwik/Matomo tracking endpoint.
///
/// Holds the site id, the tracker endpoint URL, and default options
/// applied to every call. All fields are immutable after construction;
/// concurrent [`track`](Self::track) calls on one instance are
/// independent.
pub struct PiwikTracker {
    site_id: SiteId,
    tracker_url: String,
    default_options: TrackingOptions,
    transport: Arc<dyn TrackerTransport>,
}

impl std::fmt::Debug for PiwikTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PiwikTracker")
            .field("site_id", &self.site_id)
            .field("tracker_url", &self.tracker_url)
            .field("default_options", &self.default_options)
            .finish_non_exhaustive()
    }
}

impl PiwikTracker {
    /// Creates a client with no default options and the default HTTP
    /// transport.
    ///
    /// # Errors
    ///
    /// - `TrackerError::MissingSiteId` - Empty site id
    /// - `TrackerError::MissingTrackerUrl` - Empty tracker URL
    /// - `TrackerError::InvalidTrackerUrl` - URL does not end with `piwik.php`
    pub fn new(
        site_id: impl Into<SiteId>,
        tracker_url: impl Into<String>,
    ) -> Result<Self, TrackerError> {
        Self::with_defaults(site_id, tracker_url, TrackingOptions::new())
    }

    /// Creates a client with default options applied to every call.
    ///
    /// # Errors
    ///
    /// Same validation as [`new`](Self::new).
    pub fn with_defaults(
        site_id: impl Into<SiteId>,
        tracker_url: impl Into<String>,
        default_options: TrackingOptions,
    ) -> Result<Self, TrackerError> {
        Self::with_transport(
            site_id,
            tracker_url,
            default_options,
            Arc::new(HttpTransport::default()),
        )
    }

    /// Creates a client with an HTTP transport built from `config`.
    ///
    /// # Errors
    ///
    /// Same validation as [`new`](Self::new).
    pub fn with_config(
        site_id: impl Into<SiteId>,
        tracker_url: impl Into<String>,
        default_options: TrackingOptions,
        config: &ClientConfig,
    ) -> Result<Self, TrackerError> {
        Self::with_transport(
            site_id,
            tracker_url,
            default_options,
            Arc::new(HttpTransport::new(config)),
        )
    }

    /// Creates a client over an explicit transport.
    ///
    /// Validation runs before any state is stored; a failed check
    /// leaves nothing behind.
    ///
    /// # Errors
    ///
    /// Same validation as [`new`](Self::new).
    pub fn with_transport(
        site_id: impl Into<SiteId>,
        tracker_url: impl Into<String>,
        default_options: TrackingOptions,
        transport: Arc<dyn TrackerTransport>,
    ) -> Result<Self, TrackerError> {
        let site_id = site_id.into();
        let tracker_url = tracker_url.into();

        if site_id.is_empty() {
            return Err(TrackerError::MissingSiteId);
        }
        if tracker_url.is_empty() {
            return Err(TrackerError::MissingTrackerUrl);
        }
        if !tracker_url.ends_with(TRACKER_URL_SUFFIX) {
            return Err(TrackerError::InvalidTrackerUrl { url: tracker_url });
        }

        Ok(Self {
            site_id,
            tracker_url,
            default_options,
            transport,
        })
    }

    /// Returns the site id this client tracks.
    pub fn site_id(&self) -> &SiteId {
        &self.site_id
    }

    /// Returns the tracker endpoint URL.
    pub fn tracker_url(&self) -> &str {
        &self.tracker_url
    }

    /// Returns the default options applied to every call.
    pub fn default_options(&self) -> &TrackingOptions {
        &self.default_options
    }

    /// Build the full request URL for one tracking call.
    ///
    /// Merge precedence rises through the layers: per-call `options`,
    /// then the stored defaults, then the mandatory fields `rec=1`,
    /// `url` and `idsite`. Mandatory fields cannot be overridden.
    fn build_request_url(&self, url: &str, options: &TrackingOptions) -> String {
        let mandatory = TrackingOptions::new()
            .set("rec", 1)
            .set("url", url)
            .set("idsite", self.site_id.as_str());

        let merged = merge_layers(&[options, &self.default_options, &mandatory]);
        format!("{}?{}", self.tracker_url, merged.to_query())
    }

    /// Sends a tracking request for `url` to the Piwik API.
    ///
    /// Returns `Ok(true)` if the endpoint answered with status 200 and
    /// `Ok(false)` for any other status, redirects and server errors
    /// included. A non-200 status is a normal observed outcome, not an
    /// error.
    ///
    /// # Errors
    ///
    /// - `TrackerError::Http` - Transport failure (connection, DNS,
    ///   timeout); propagated from the transport without retries
    pub async fn track(&self, url: &str, options: &TrackingOptions) -> Result<bool, TrackerError> {
        let request_url = self.build_request_url(url, options);
        tracing::debug!("Tracking {} via {}", url, self.tracker_url);

        let status = self.transport.get(&request_url).await?;
        tracing::debug!("Tracker {} answered status {}", self.tracker_url, status);

        Ok(status == 200)
    }
}

#[cfg(test)]
mod tracker_client_tests {
    use super::*;
    use crate::tracker::SimulatedTransport;

    fn create_test_tracker(transport: Arc<SimulatedTransport>) -> PiwikTracker {
        PiwikTracker::with_transport(
            "1",
            "http://example.org/piwik.php",
            TrackingOptions::new(),
            transport,
        )
        .unwrap()
    }

    #[test]
    fn test_numeric_and_string_site_id_equivalent() {
        let from_number = PiwikTracker::new(1u32, "http://example.org/piwik.php").unwrap();
        let from_string = PiwikTracker::new("1", "http://example.org/piwik.php").unwrap();

        assert_eq!(from_number.site_id(), from_string.site_id());
        assert_eq!(from_number.site_id().as_str(), "1");
    }

    #[test]
    fn test_new_rejects_empty_site_id() {
        let result = PiwikTracker::new("", "http://example.org/piwik.php");
        assert!(matches!(result.unwrap_err(), TrackerError::MissingSiteId));
    }

    #[test]
    fn test_new_rejects_empty_tracker_url() {
        let result = PiwikTracker::new("1", "");
        assert!(matches!(
            result.unwrap_err(),
            TrackerError::MissingTrackerUrl
        ));
    }

    #[test]
    fn test_new_rejects_tracker_url_without_piwik_suffix() {
        let result = PiwikTracker::new("1", "http://example.org/track");
        assert!(matches!(
            result.unwrap_err(),
            TrackerError::InvalidTrackerUrl { url } if url == "http://example.org/track"
        ));
    }

    #[test]
    fn test_build_request_url_contains_mandatory_fields() {
        let tracker = create_test_tracker(Arc::new(SimulatedTransport::always(200)));
        let url = tracker.build_request_url("http://mysite.org/page", &TrackingOptions::new());

        assert!(url.starts_with("http://example.org/piwik.php?"));
        assert!(url.contains("rec=1"));
        assert!(url.contains("idsite=1"));
        assert!(url.contains("url=http%3A%2F%2Fmysite.org%2Fpage"));
    }

    #[test]
    fn test_mandatory_fields_win_over_options_and_defaults() {
        let tracker = PiwikTracker::with_transport(
            "1",
            "http://example.org/piwik.php",
            TrackingOptions::new().set("idsite", 99),
            Arc::new(SimulatedTransport::always(200)),
        )
        .unwrap();

        let options = TrackingOptions::new()
            .set("rec", 0)
            .set("url", "http://spoofed.org/")
            .set("idsite", 42);
        let url = tracker.build_request_url("http://mysite.org/page", &options);

        assert!(url.contains("rec=1"));
        assert!(url.contains("idsite=1"));
        assert!(url.contains("url=http%3A%2F%2Fmysite.org%2Fpage"));
        assert!(!url.contains("spoofed"));
    }

    #[test]
    fn test_default_options_override_per_call_options() {
        // Defaults sit above per-call options in the layer order.
        let tracker = PiwikTracker::with_transport(
            "1",
            "http://example.org/piwik.php",
            TrackingOptions::new().set("lang", "de"),
            Arc::new(SimulatedTransport::always(200)),
        )
        .unwrap();

        let options = TrackingOptions::new().set("lang", "en").set("uid", "alice");
        let url = tracker.build_request_url("http://mysite.org/page", &options);

        assert!(url.contains("lang=de"));
        assert!(!url.contains("lang=en"));
        assert!(url.contains("uid=alice"));
    }

    #[tokio::test]
    async fn test_track_true_on_200() {
        let tracker = create_test_tracker(Arc::new(SimulatedTransport::always(200)));
        let tracked = tracker
            .track("http://mysite.org/page", &TrackingOptions::new())
            .await
            .unwrap();
        assert!(tracked);
    }

    #[tokio::test]
    async fn test_track_false_on_non_200() {
        for status in [404, 500, 301] {
            let tracker = create_test_tracker(Arc::new(SimulatedTransport::always(status)));
            let tracked = tracker
                .track("http://mysite.org/page", &TrackingOptions::new())
                .await
                .unwrap();
            assert!(!tracked, "status {status} must report false");
        }
    }

    #[tokio::test]
    async fn test_track_end_to_end_request_url() {
        let transport = Arc::new(SimulatedTransport::always(200));
        let tracker = PiwikTracker::with_transport(
            "1",
            "http://example.org/piwik.php",
            TrackingOptions::new().lang("en"),
            transport.clone(),
        )
        .unwrap();

        let options = TrackingOptions::new().action_name("Home");
        let tracked = tracker
            .track("http://mysite.org/page", &options)
            .await
            .unwrap();
        assert!(tracked);

        // Keys come out sorted, so the full URL is deterministic.
        assert_eq!(
            transport.requested_urls(),
            vec![
                "http://example.org/piwik.php?action_name=Home&idsite=1&lang=en&rec=1\
                 &url=http%3A%2F%2Fmysite.org%2Fpage"
            ]
        );
    }
}
