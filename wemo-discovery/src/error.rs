//! Error types for the discovery scanner.

use std::fmt;

/// Error type for discovery operations.
///
/// Only setup failures (socket creation, multicast send) are represented.
/// Receive-side timeouts and errors terminate a scan without being errors.
#[derive(Debug)]
pub enum DiscoveryError {
    /// Network-related errors (socket creation, send failures, etc.)
    NetworkError(String),
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryError::NetworkError(msg) => write!(f, "Network error: {}", msg),
        }
    }
}

impl std::error::Error for DiscoveryError {}

/// Convenience Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
