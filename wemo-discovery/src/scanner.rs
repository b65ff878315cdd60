//! Core scan logic and iterator implementation.
//!
//! A scan sends one SSDP M-SEARCH request and then drains replies until the
//! idle timeout elapses. Every datagram becomes one record; replies are not
//! filtered or deduplicated here, callers decide what to keep.

use std::time::Duration;

use crate::error::Result;
use crate::ssdp::SsdpClient;
use crate::DiscoveryRecord;

/// Iterator over the replies of one SSDP scan.
///
/// Yields one [`DiscoveryRecord`] per received datagram and ends once no
/// reply arrives within the idle timeout. A reply that arrives re-arms the
/// timeout window, so a scan lasts as long as devices keep answering.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use wemo_discovery::scan_iter_with_timeout;
///
/// for record in scan_iter_with_timeout(Duration::from_secs(3)) {
///     println!("{} -> {}", record.address, record.location);
/// }
/// ```
pub struct ScanIterator {
    client: Option<SsdpClient>,
}

impl ScanIterator {
    /// Create a new scan iterator with the specified idle timeout.
    pub(crate) fn new(timeout: Duration) -> Result<Self> {
        let client = SsdpClient::new(timeout)?;
        client.send_search()?;
        Ok(Self {
            client: Some(client),
        })
    }

    /// Create an empty iterator that yields no results.
    /// Used as a fallback when scan setup fails.
    pub(crate) fn empty() -> Self {
        Self { client: None }
    }
}

impl Iterator for ScanIterator {
    type Item = DiscoveryRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let client = self.client.as_mut()?;
        match client.recv_reply() {
            Some(reply) => Some(DiscoveryRecord {
                address: reply.address,
                location: reply.location,
            }),
            None => {
                // Timeout or socket error: the scan is over. Dropping the
                // client closes the UDP socket.
                self.client = None;
                None
            }
        }
    }
}
