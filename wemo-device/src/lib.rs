//! Belkin Wemo smart device control
//!
//! This crate provides a handle for a single Wemo device: it fetches the
//! UPnP description document once at construction and exposes the device's
//! binary ON/OFF state through the Belkin `basicevent` SOAP service.
//!
//! # Quick Start
//!
//! ```no_run
//! use wemo_device::{BinaryState, WemoDevice};
//!
//! let device = WemoDevice::new("192.168.1.42", "http://192.168.1.42:49153/setup.xml");
//! println!("{} is {}", device.name(), device.state());
//!
//! if device.state() == BinaryState::Off {
//!     device.on();
//! }
//! ```
//!
//! Every failure mode on the way to a state observation (transport error,
//! malformed XML, missing response element) collapses to
//! [`BinaryState::Unknown`]; none of the public operations return errors.

mod description;
mod device;
mod error;

pub use description::{DeviceDescriptor, ServiceInfo};
pub use device::{WemoDevice, UNKNOWN_DEVICE};
pub use error::DeviceError;

use std::fmt;

/// Binary ON/OFF state of a Wemo device.
///
/// Never cached: every observation is a live query against the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryState {
    On,
    Off,
    Unknown,
}

impl BinaryState {
    /// Map the wire text of a `BinaryState` element.
    ///
    /// Exactly `"1"` means on and exactly `"0"` means off; anything else is
    /// unknown.
    pub fn from_text(text: &str) -> Self {
        match text {
            "1" => BinaryState::On,
            "0" => BinaryState::Off,
            _ => BinaryState::Unknown,
        }
    }
}

impl fmt::Display for BinaryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BinaryState::On => "ON",
            BinaryState::Off => "OFF",
            BinaryState::Unknown => "UNKNOWN",
        };
        f.pad(label)
    }
}
