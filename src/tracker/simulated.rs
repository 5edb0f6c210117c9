//! Simulated transport for testing without a live tracking endpoint.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::TrackerError;
use super::transport::TrackerTransport;

/// Scripted transport that answers with configured status codes.
///
/// Responses are consumed front to back; once the script is exhausted,
/// the last configured status repeats. Every requested URL is recorded
/// so tests can assert on the exact outbound query.
pub struct SimulatedTransport {
    statuses: Mutex<VecDeque<u16>>,
    last_status: u16,
    requests: Mutex<Vec<String>>,
}

impl SimulatedTransport {
    /// Creates a transport that always answers with `status`.
    pub fn always(status: u16) -> Self {
        Self::with_statuses([status])
    }

    /// Creates a transport that answers with `statuses` in order.
    ///
    /// # Panics
    ///
    /// Panics if `statuses` is empty (test setup error).
    pub fn with_statuses(statuses: impl IntoIterator<Item = u16>) -> Self {
        let statuses: VecDeque<u16> = statuses.into_iter().collect();
        let last_status = *statuses.back().expect("at least one status required");
        Self {
            statuses: Mutex::new(statuses),
            last_status,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns every URL requested so far, in request order.
    pub fn requested_urls(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl TrackerTransport for SimulatedTransport {
    async fn get(&self, url: &str) -> Result<u16, TrackerError> {
        self.requests.lock().push(url.to_string());
        Ok(self.statuses.lock().pop_front().unwrap_or(self.last_status))
    }
}
