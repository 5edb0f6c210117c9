//! Piwik Tracker - client for the Piwik/Matomo Tracking HTTP API
//!
//! This crate provides a thin client around the analytics tracking
//! endpoint: build a query string from a site id, a tracked URL, and
//! optional Tracking API parameters, issue one GET request, and report
//! whether the endpoint answered 200.

pub mod config;
pub mod tracker;

// Re-export main types for convenient access
pub use config::ClientConfig;
pub use tracker::{
    HttpTransport, PiwikTracker, SimulatedTransport, SiteId, TrackerError, TrackerTransport,
    TrackingOptions,
};

pub type Result<T> = std::result::Result<T, TrackerError>;
