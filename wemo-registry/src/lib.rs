//! Persisted registry of discovered Wemo devices
//!
//! The registry bridges discovery output to a durable JSON document and
//! rebuilds [`WemoDevice`] handles from it on later runs, keyed by a
//! normalized name tag for lookup. A registry that cannot be read forces
//! one fresh scan before the failure is surfaced.
//!
//! # Quick Start
//!
//! ```no_run
//! use wemo_registry::Registry;
//!
//! let registry = Registry::default_location();
//! for (tag, device) in registry.devices()? {
//!     println!("{} -> {} ({})", tag, device.name(), device.state());
//! }
//! # Ok::<(), wemo_registry::RegistryError>(())
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use wemo_device::WemoDevice;
use wemo_discovery::DiscoveryRecord;

/// Errors raised by registry persistence.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry file could not be read or written
    #[error("registry I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The registry file exists but is not a valid registry document
    #[error("registry is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Convenience Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// One persisted discovery result.
///
/// Wire form is one JSON object with `host` and `uri` keys; unknown extra
/// keys are tolerated and missing keys fall back to defaults, so documents
/// written by other tooling still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Source address observed during discovery
    #[serde(rename = "host", default = "unknown_host")]
    pub address: String,
    /// Device description URI, may be empty
    #[serde(rename = "uri", default)]
    pub location: String,
}

fn unknown_host() -> String {
    "unknown".to_string()
}

impl From<DiscoveryRecord> for RegistryEntry {
    fn from(record: DiscoveryRecord) -> Self {
        Self {
            address: record.address,
            location: record.location,
        }
    }
}

/// A device registry stored as a JSON document on disk.
pub struct Registry {
    path: PathBuf,
    scan_timeout: Duration,
}

impl Registry {
    /// Registry stored at the default per-user config location.
    pub fn default_location() -> Self {
        let path = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wemoctl")
            .join("registry.json");
        Self::at(path)
    }

    /// Registry stored at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            scan_timeout: wemo_discovery::DEFAULT_TIMEOUT,
        }
    }

    /// Override the idle timeout used for the scans this registry triggers.
    pub fn with_scan_timeout(mut self, timeout: Duration) -> Self {
        self.scan_timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist a scan result, replacing any previous contents.
    pub fn update(&self, records: &[DiscoveryRecord]) -> Result<()> {
        let entries: Vec<RegistryEntry> = records.iter().cloned().map(RegistryEntry::from).collect();
        debug!("writing {} entries to {}", entries.len(), self.path.display());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Scan the network and persist the result.
    pub fn refresh(&self) -> Result<()> {
        let records = wemo_discovery::scan_with_timeout(self.scan_timeout);
        self.update(&records)
    }

    /// Load persisted entries, scanning first if the registry does not
    /// exist yet.
    pub fn load(&self) -> Result<Vec<RegistryEntry>> {
        if !self.path.exists() {
            debug!("registry {} missing, scanning", self.path.display());
            self.refresh()?;
        }
        let json = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Build device handles from the registry, keyed by their lookup tag.
    ///
    /// Entries without a description URI are dropped here. A corrupt or
    /// unreadable registry forces one rescan before the load is retried;
    /// the second failure is returned to the caller.
    pub fn devices(&self) -> Result<HashMap<String, WemoDevice>> {
        match self.load_devices() {
            Ok(devices) => Ok(devices),
            Err(e) => {
                warn!("rebuilding registry after load failure: {}", e);
                self.refresh()?;
                self.load_devices()
            }
        }
    }

    fn load_devices(&self) -> Result<HashMap<String, WemoDevice>> {
        let mut devices = HashMap::new();
        for entry in self.load()? {
            if entry.location.is_empty() {
                debug!("skipping {} without description uri", entry.address);
                continue;
            }
            let device = WemoDevice::new(entry.address, entry.location);
            devices.insert(tag(device.name()), device);
        }
        Ok(devices)
    }
}

/// Normalize a display name into a lookup tag.
///
/// Lowercases and replaces spaces with hyphens, so `"Living Room Plug"`
/// becomes `"living-room-plug"`.
pub fn tag(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}
