//! Wemo device handle and binary state control.

use std::time::Duration;

use soap_client::SoapClient;
use tracing::debug;
use xmltree::Element;

use crate::description::DeviceDescriptor;
use crate::error::DeviceError;
use crate::BinaryState;

/// Service URN of the Belkin basicevent control service.
const BASICEVENT_SERVICE: &str = "urn:Belkin:service:basicevent:1";
/// Control path shared by all Wemo devices, appended to the description
/// URI's scheme and authority.
const CONTROL_PATH: &str = "upnp/control/basicevent1";

const GET_BINARY_STATE: &str = "GetBinaryState";
const SET_BINARY_STATE: &str = "SetBinaryState";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Name reported for devices whose description has no friendly name.
pub const UNKNOWN_DEVICE: &str = "Unknown Device";

/// A Belkin Wemo smart device.
///
/// Construction never fails: the one description fetch it performs degrades
/// to an empty descriptor on any error, leaving a handle that still knows
/// its address and URIs. State is never cached; [`state`](Self::state) and
/// [`set_state`](Self::set_state) are live round trips.
#[derive(Debug, Clone)]
pub struct WemoDevice {
    address: String,
    location: String,
    control_url: String,
    descriptor: DeviceDescriptor,
    soap: SoapClient,
}

impl WemoDevice {
    /// Create a handle for the device at `address`, described by `location`.
    ///
    /// `address` is the discovery source address and is kept as-is; it may
    /// legitimately differ from the host inside `location`. Fetches and
    /// parses the description once; failures leave the descriptor empty and
    /// the name unresolved.
    pub fn new(address: impl Into<String>, location: impl Into<String>) -> Self {
        let address = address.into();
        let location = location.into();

        let control_url = control_url_for(&location).unwrap_or_default();
        let descriptor = match fetch_descriptor(&location) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                debug!("device at {} unresolved: {}", address, e);
                DeviceDescriptor::default()
            }
        };

        Self {
            address,
            location,
            control_url,
            descriptor,
            soap: SoapClient::with_timeout(REQUEST_TIMEOUT),
        }
    }

    /// Network address this device was discovered at.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Description URI this handle was built from.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Control URL the SOAP actions are sent to.
    pub fn control_url(&self) -> &str {
        &self.control_url
    }

    /// Parsed description metadata.
    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    /// Friendly name for this device, or [`UNKNOWN_DEVICE`] if the
    /// description did not resolve.
    pub fn name(&self) -> &str {
        self.descriptor.friendly_name().unwrap_or(UNKNOWN_DEVICE)
    }

    /// Query the device's current binary state.
    ///
    /// Exactly one SOAP round trip; any transport or parse failure, and any
    /// response without the expected `BinaryState` element, collapses to
    /// [`BinaryState::Unknown`].
    pub fn state(&self) -> BinaryState {
        match self
            .soap
            .call(&self.control_url, BASICEVENT_SERVICE, GET_BINARY_STATE, "")
        {
            Ok(response) => binary_state_of(&response),
            Err(e) => {
                debug!("'{}' state query failed: {}", self.name(), e);
                BinaryState::Unknown
            }
        }
    }

    /// Switch the device on or off and report the state it echoed back.
    ///
    /// Same round-trip and fallback rules as [`state`](Self::state), applied
    /// to the set action's own response element.
    pub fn set_state(&self, on: bool) -> BinaryState {
        let payload = format!("<BinaryState>{}</BinaryState>", if on { 1 } else { 0 });

        match self
            .soap
            .call(&self.control_url, BASICEVENT_SERVICE, SET_BINARY_STATE, &payload)
        {
            Ok(response) => binary_state_of(&response),
            Err(e) => {
                debug!("'{}' set state failed: {}", self.name(), e);
                BinaryState::Unknown
            }
        }
    }

    /// Switch on the device.
    pub fn on(&self) -> BinaryState {
        debug!("turning on '{}'", self.name());
        self.set_state(true)
    }

    /// Switch off the device.
    pub fn off(&self) -> BinaryState {
        debug!("turning off '{}'", self.name());
        self.set_state(false)
    }

    /// JSON representation of this device: live state plus everything the
    /// description reported.
    pub fn describe(&self) -> serde_json::Value {
        let mut info = serde_json::Map::new();
        info.insert("state".to_string(), self.state().to_string().into());
        info.insert("address".to_string(), self.address.clone().into());
        info.insert("version".to_string(), env!("CARGO_PKG_VERSION").into());

        for (tag, text) in &self.descriptor.fields {
            info.insert(tag.clone(), text.clone().into());
        }
        if !self.descriptor.services.is_empty() {
            info.insert(
                "services".to_string(),
                serde_json::json!(self.descriptor.services),
            );
        }

        serde_json::Value::Object(info)
    }
}

/// Derive the basicevent control URL from a description URI.
///
/// Keeps the URI's scheme and authority (host and port) and swaps in the
/// fixed control path. Returns `None` for URIs without both.
fn control_url_for(location: &str) -> Option<String> {
    let (scheme, rest) = location.split_once("://")?;
    let authority = rest.split('/').next()?;
    if scheme.is_empty() || authority.is_empty() {
        return None;
    }
    Some(format!("{}://{}/{}", scheme, authority, CONTROL_PATH))
}

/// Fetch and parse the description document at `location`.
fn fetch_descriptor(location: &str) -> Result<DeviceDescriptor, DeviceError> {
    if location.is_empty() {
        return Err(DeviceError::Fetch("no description uri".to_string()));
    }

    debug!("fetching device description from {}", location);
    let agent = ureq::AgentBuilder::new()
        .timeout_connect(REQUEST_TIMEOUT)
        .timeout_read(REQUEST_TIMEOUT)
        .build();

    let body = agent
        .get(location)
        .call()
        .map_err(|e| DeviceError::Fetch(e.to_string()))?
        .into_string()
        .map_err(|e| DeviceError::Fetch(e.to_string()))?;

    DeviceDescriptor::from_xml(&body)
        .ok_or_else(|| DeviceError::Malformed(format!("no device element in {}", location)))
}

/// Read the `BinaryState` text out of an action response element.
fn binary_state_of(response: &Element) -> BinaryState {
    match response.get_child("BinaryState").and_then(|el| el.get_text()) {
        Some(text) => BinaryState::from_text(&text),
        None => BinaryState::Unknown,
    }
}
