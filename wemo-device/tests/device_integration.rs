//! Integration tests for the Wemo device handle
//!
//! These tests run the full HTTP paths (description fetch, SOAP get/set)
//! against a local mock server instead of real hardware.

use mockito::{Matcher, Server, ServerGuard};
use wemo_device::{BinaryState, WemoDevice, UNKNOWN_DEVICE};

const SETUP_XML: &str = r#"<?xml version="1.0"?>
<root xmlns="urn:Belkin:device-1-0">
  <device>
    <deviceType>urn:Belkin:device:controllee:1</deviceType>
    <friendlyName>Living Room Plug</friendlyName>
    <manufacturer>Belkin International Inc.</manufacturer>
    <modelName>Socket</modelName>
    <UDN>uuid:Socket-1_0-221344K0101769</UDN>
    <serviceList>
      <service>
        <serviceType>urn:Belkin:service:basicevent:1</serviceType>
        <serviceId>urn:Belkin:serviceId:basicevent1</serviceId>
        <controlURL>/upnp/control/basicevent1</controlURL>
      </service>
    </serviceList>
  </device>
</root>"#;

const GET_STATE_ACTION: &str = "\"urn:Belkin:service:basicevent:1#GetBinaryState\"";
const SET_STATE_ACTION: &str = "\"urn:Belkin:service:basicevent:1#SetBinaryState\"";

fn get_state_response(state: &str) -> String {
    format!(
        r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"
    s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">
  <s:Body>
    <u:GetBinaryStateResponse xmlns:u="urn:Belkin:service:basicevent:1">
      <BinaryState>{}</BinaryState>
    </u:GetBinaryStateResponse>
  </s:Body>
</s:Envelope>"#,
        state
    )
}

fn set_state_response(state: &str) -> String {
    format!(
        r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"
    s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">
  <s:Body>
    <u:SetBinaryStateResponse xmlns:u="urn:Belkin:service:basicevent:1">
      <BinaryState>{}</BinaryState>
    </u:SetBinaryStateResponse>
  </s:Body>
</s:Envelope>"#,
        state
    )
}

/// Serve the standard description document and build a handle against it.
fn device_with_description(server: &mut ServerGuard) -> WemoDevice {
    let _description = server
        .mock("GET", "/setup.xml")
        .with_status(200)
        .with_body(SETUP_XML)
        .create();

    WemoDevice::new("127.0.0.1", format!("{}/setup.xml", server.url()))
}

#[test]
fn test_construction_resolves_name_and_control_url() {
    let mut server = Server::new();
    let device = device_with_description(&mut server);

    assert_eq!(device.name(), "Living Room Plug");
    assert_eq!(device.address(), "127.0.0.1");
    assert_eq!(
        device.control_url(),
        format!("{}/upnp/control/basicevent1", server.url())
    );
    assert_eq!(device.descriptor().services.len(), 1);
}

#[test]
fn test_construction_without_friendly_name() {
    let mut server = Server::new();
    let _description = server
        .mock("GET", "/setup.xml")
        .with_status(200)
        .with_body(
            r#"<root xmlns="urn:Belkin:device-1-0">
  <device><modelName>Socket</modelName></device>
</root>"#,
        )
        .create();

    let device = WemoDevice::new("127.0.0.1", format!("{}/setup.xml", server.url()));
    assert_eq!(device.name(), UNKNOWN_DEVICE);
}

#[test]
fn test_construction_survives_failed_description_fetch() {
    let mut server = Server::new();
    // No GET mock: the fetch fails, the handle stays usable.
    let location = format!("{}/setup.xml", server.url());
    let device = WemoDevice::new("127.0.0.1", location.clone());

    assert_eq!(device.name(), UNKNOWN_DEVICE);
    assert_eq!(device.location(), location);
    assert!(device.descriptor().is_empty());
}

#[test]
fn test_construction_survives_malformed_description() {
    let mut server = Server::new();
    let _description = server
        .mock("GET", "/setup.xml")
        .with_status(200)
        .with_body("not xml at all")
        .create();

    let device = WemoDevice::new("127.0.0.1", format!("{}/setup.xml", server.url()));
    assert_eq!(device.name(), UNKNOWN_DEVICE);
    assert!(device.descriptor().is_empty());
}

#[test]
fn test_state_on() {
    let mut server = Server::new();
    let device = device_with_description(&mut server);

    let mock = server
        .mock("POST", "/upnp/control/basicevent1")
        .match_header("SOAPACTION", GET_STATE_ACTION)
        .match_header("Content-Type", "text/xml; charset=\"utf-8\"")
        .with_status(200)
        .with_body(get_state_response("1"))
        .create();

    assert_eq!(device.state(), BinaryState::On);
    mock.assert();
}

#[test]
fn test_state_off() {
    let mut server = Server::new();
    let device = device_with_description(&mut server);

    let _mock = server
        .mock("POST", "/upnp/control/basicevent1")
        .match_header("SOAPACTION", GET_STATE_ACTION)
        .with_status(200)
        .with_body(get_state_response("0"))
        .create();

    assert_eq!(device.state(), BinaryState::Off);
}

#[test]
fn test_state_with_unexpected_text_is_unknown() {
    let mut server = Server::new();
    let device = device_with_description(&mut server);

    let _mock = server
        .mock("POST", "/upnp/control/basicevent1")
        .with_status(200)
        .with_body(get_state_response("8"))
        .create();

    assert_eq!(device.state(), BinaryState::Unknown);
}

#[test]
fn test_state_with_malformed_response_is_unknown() {
    let mut server = Server::new();
    let device = device_with_description(&mut server);

    let _mock = server
        .mock("POST", "/upnp/control/basicevent1")
        .with_status(200)
        .with_body("<Envelope><Body></Envelope>")
        .create();

    assert_eq!(device.state(), BinaryState::Unknown);
}

#[test]
fn test_state_with_http_error_is_unknown() {
    let mut server = Server::new();
    let device = device_with_description(&mut server);

    let _mock = server
        .mock("POST", "/upnp/control/basicevent1")
        .with_status(500)
        .with_body("boom")
        .create();

    assert_eq!(device.state(), BinaryState::Unknown);
}

#[test]
fn test_state_with_fault_body_is_unknown() {
    let mut server = Server::new();
    let device = device_with_description(&mut server);

    let _mock = server
        .mock("POST", "/upnp/control/basicevent1")
        .with_status(200)
        .with_body(
            r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
  <s:Body>
    <s:Fault>
      <faultcode>s:Client</faultcode>
      <faultstring>UPnPError</faultstring>
      <detail>
        <UPnPError xmlns="urn:schemas-upnp-org:control-1-0">
          <errorCode>401</errorCode>
        </UPnPError>
      </detail>
    </s:Fault>
  </s:Body>
</s:Envelope>"#,
        )
        .create();

    assert_eq!(device.state(), BinaryState::Unknown);
}

#[test]
fn test_set_state_on_sends_binary_state_one() {
    let mut server = Server::new();
    let device = device_with_description(&mut server);

    let mock = server
        .mock("POST", "/upnp/control/basicevent1")
        .match_header("SOAPACTION", SET_STATE_ACTION)
        .match_body(Matcher::Regex("<BinaryState>1</BinaryState>".to_string()))
        .with_status(200)
        .with_body(set_state_response("1"))
        .create();

    assert_eq!(device.set_state(true), BinaryState::On);
    mock.assert();
}

#[test]
fn test_set_state_off_sends_binary_state_zero() {
    let mut server = Server::new();
    let device = device_with_description(&mut server);

    let mock = server
        .mock("POST", "/upnp/control/basicevent1")
        .match_header("SOAPACTION", SET_STATE_ACTION)
        .match_body(Matcher::Regex("<BinaryState>0</BinaryState>".to_string()))
        .with_status(200)
        .with_body(set_state_response("0"))
        .create();

    assert_eq!(device.off(), BinaryState::Off);
    mock.assert();
}

#[test]
fn test_set_state_rejects_get_response_tag() {
    let mut server = Server::new();
    let device = device_with_description(&mut server);

    // Device answers the set action with the get action's response tag;
    // the client must not accept it.
    let _mock = server
        .mock("POST", "/upnp/control/basicevent1")
        .match_header("SOAPACTION", SET_STATE_ACTION)
        .with_status(200)
        .with_body(get_state_response("1"))
        .create();

    assert_eq!(device.set_state(true), BinaryState::Unknown);
}

#[test]
fn test_describe_includes_state_and_description_fields() {
    let mut server = Server::new();
    let device = device_with_description(&mut server);

    let _mock = server
        .mock("POST", "/upnp/control/basicevent1")
        .with_status(200)
        .with_body(get_state_response("1"))
        .create();

    let info = device.describe();

    assert_eq!(info["state"], "ON");
    assert_eq!(info["friendlyName"], "Living Room Plug");
    assert_eq!(info["address"], "127.0.0.1");
    assert_eq!(
        info["services"][0]["serviceType"],
        "urn:Belkin:service:basicevent:1"
    );
}
