//! Error types for device construction.

use thiserror::Error;

/// Failure to resolve a device description.
///
/// Only used at the fetch/parse boundary inside construction; the public
/// API recovers it into an empty descriptor instead of propagating.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The description could not be fetched over HTTP
    #[error("description fetch failed: {0}")]
    Fetch(String),

    /// The description body was not a usable device description
    #[error("malformed device description: {0}")]
    Malformed(String),
}
