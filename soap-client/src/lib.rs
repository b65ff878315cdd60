//! Private SOAP client for UPnP device communication
//!
//! This crate provides a minimal SOAP client for talking to UPnP devices
//! such as Belkin Wemo smart plugs. It builds the request envelope, posts it
//! to a device control URL, and extracts the namespaced action response
//! element from the reply.

mod error;

pub use error::SoapError;

use std::time::Duration;

use tracing::debug;
use xmltree::Element;

const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const SOAP_ENCODING_NS: &str = "http://schemas.xmlsoap.org/soap/encoding/";

/// A minimal SOAP client for UPnP device communication
///
/// Timeouts are fixed at construction; the client holds no other state and
/// instances are independent, so per-device clients share nothing.
#[derive(Debug, Clone)]
pub struct SoapClient {
    agent: ureq::Agent,
}

impl SoapClient {
    /// Create a new SOAP client with default timeouts
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(5))
    }

    /// Create a SOAP client whose connect and read timeouts are `timeout`
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(timeout)
                .timeout_read(timeout)
                .build(),
        }
    }

    /// Send a SOAP action to a device control URL and return the parsed
    /// `<ActionResponse>` element.
    ///
    /// The action element is placed in the `service_uri` namespace and the
    /// response is matched against the same namespace; get and set actions
    /// answer with distinct response tags and must not be conflated.
    pub fn call(
        &self,
        control_url: &str,
        service_uri: &str,
        action: &str,
        payload: &str,
    ) -> Result<Element, SoapError> {
        let body = build_envelope(service_uri, action, payload);
        let soap_action = format!("\"{}#{}\"", service_uri, action);

        debug!("sending {} to {}", action, control_url);
        let response = self
            .agent
            .post(control_url)
            .set("Content-Type", "text/xml; charset=\"utf-8\"")
            .set("SOAPACTION", &soap_action)
            .send_string(&body)
            .map_err(|e| SoapError::Network(e.to_string()))?;

        let xml_text = response
            .into_string()
            .map_err(|e| SoapError::Network(e.to_string()))?;
        debug!("{} response: {}", action, xml_text.trim());

        let xml = Element::parse(xml_text.as_bytes())
            .map_err(|e| SoapError::Parse(e.to_string()))?;

        extract_response(&xml, service_uri, action)
    }
}

impl Default for SoapClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the request envelope for one action.
fn build_envelope(service_uri: &str, action: &str, payload: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
         <soap:Envelope xmlns:soap=\"{envelope_ns}\"\n     \
         soap:encodingStyle=\"{encoding_ns}\">\n  \
         <soap:Body>\n    \
         <u:{action} xmlns:u=\"{service_uri}\">{payload}</u:{action}>\n  \
         </soap:Body>\n\
         </soap:Envelope>\n",
        envelope_ns = SOAP_ENVELOPE_NS,
        encoding_ns = SOAP_ENCODING_NS,
        action = action,
        service_uri = service_uri,
        payload = payload,
    )
}

/// Extract the action response element or surface a SOAP fault.
fn extract_response(xml: &Element, service_uri: &str, action: &str) -> Result<Element, SoapError> {
    let body = xml
        .get_child("Body")
        .ok_or_else(|| SoapError::Parse("Missing SOAP Body".to_string()))?;

    // Check for SOAP fault first
    if let Some(fault) = body.get_child("Fault") {
        let error_code = fault
            .get_child("detail")
            .and_then(|d| d.get_child("UPnPError").or_else(|| d.get_child("UpnPError")))
            .and_then(|e| e.get_child("errorCode"))
            .and_then(|c| c.get_text())
            .and_then(|t| t.parse::<u16>().ok())
            .unwrap_or(500);
        return Err(SoapError::Fault(error_code));
    }

    // Match the response element on local name AND namespace: get and set
    // responses differ only in the tag within the same service namespace.
    let response_name = format!("{}Response", action);
    body.children
        .iter()
        .filter_map(|node| node.as_element())
        .find(|el| el.name == response_name && el.namespace.as_deref() == Some(service_uri))
        .cloned()
        .ok_or_else(|| SoapError::Parse(format!("Missing {} element", response_name)))
}
