//! UPnP device discovery library
//!
//! This crate discovers UPnP root devices on the local network using SSDP
//! (Simple Service Discovery Protocol). A scan captures one record per reply
//! datagram: the source address and the description URI from the Location
//! header. Records are intentionally raw, duplicates and replies without a
//! Location header are preserved so that callers can decide how to filter.
//!
//! # Quick Start
//!
//! ```no_run
//! use wemo_discovery::scan;
//!
//! for record in scan() {
//!     println!("{} -> {}", record.address, record.location);
//! }
//! ```
//!
//! # Iterator-based Scanning
//!
//! For streaming processing or early termination, use the iterator API:
//!
//! ```no_run
//! use wemo_discovery::scan_iter;
//!
//! for record in scan_iter() {
//!     if !record.location.is_empty() {
//!         println!("Found: {}", record.location);
//!         break;
//!     }
//! }
//! ```

mod error;
mod scanner;
mod ssdp;

pub use error::{DiscoveryError, Result};
pub use scanner::ScanIterator;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Idle timeout used by [`scan`] and [`scan_iter`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// One SSDP reply captured during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryRecord {
    /// Source address the reply came from
    #[serde(rename = "host")]
    pub address: String,
    /// Device description URI from the Location header, empty if absent
    #[serde(rename = "uri")]
    pub location: String,
}

/// Scan the local network for UPnP devices with the default idle timeout.
///
/// Collects all replies into a Vec. An empty result means no device
/// answered, it is not an error.
pub fn scan() -> Vec<DiscoveryRecord> {
    scan_with_timeout(DEFAULT_TIMEOUT)
}

/// Scan the local network for UPnP devices with a custom idle timeout.
///
/// The timeout bounds how long a single receive may block; every reply that
/// arrives re-arms the window. Setup failures (no socket, send error) yield
/// an empty result rather than an error.
pub fn scan_with_timeout(timeout: Duration) -> Vec<DiscoveryRecord> {
    scan_iter_with_timeout(timeout).collect()
}

/// Get an iterator over scan replies with the default idle timeout.
pub fn scan_iter() -> ScanIterator {
    scan_iter_with_timeout(DEFAULT_TIMEOUT)
}

/// Get an iterator over scan replies with a custom idle timeout.
///
/// The M-SEARCH request is sent when this function returns; iteration drains
/// replies until the idle timeout elapses.
pub fn scan_iter_with_timeout(timeout: Duration) -> ScanIterator {
    debug!("starting discovery with idle timeout {:?}", timeout);
    ScanIterator::new(timeout).unwrap_or_else(|e| {
        // A scan that cannot start yields no records.
        debug!("scan setup failed: {}", e);
        ScanIterator::empty()
    })
}
