//! SSDP (Simple Service Discovery Protocol) client for device discovery
//!
//! This module provides internal SSDP client functionality for discovering UPnP
//! root devices on the local network. It is not part of the public API.

use std::net::UdpSocket;
use std::time::Duration;

use tracing::debug;

use crate::error::{DiscoveryError, Result};

const MULTICAST_GROUP: &str = "239.255.255.250";
const MULTICAST_PORT: u16 = 1900;

const READ_BUFFER_SIZE: usize = 4096;

/// One raw SSDP reply datagram.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SsdpReply {
    /// Source address of the datagram
    pub address: String,
    /// Value of the Location header, empty if the reply carried none
    pub location: String,
}

/// SSDP client owning the UDP socket for one scan.
pub(crate) struct SsdpClient {
    socket: UdpSocket,
    buffer: [u8; READ_BUFFER_SIZE],
}

impl SsdpClient {
    /// Create a new SSDP client whose receive calls block for at most `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to bind UDP socket: {}", e)))?;

        socket
            .set_read_timeout(Some(timeout))
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to set read timeout: {}", e)))?;

        socket
            .set_multicast_loop_v4(true)
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to set multicast loop: {}", e)))?;

        Ok(Self {
            socket,
            buffer: [0; READ_BUFFER_SIZE],
        })
    }

    /// Send one M-SEARCH request for root devices to the multicast group.
    pub fn send_search(&self) -> Result<()> {
        let request = format!(
            "M-SEARCH * HTTP/1.1\r\n\
             HOST: {}:{}\r\n\
             ST: upnp:rootdevice\r\n\
             MX: 3\r\n\
             MAN: \"ssdp:discover\"\r\n\
             \r\n",
            MULTICAST_GROUP, MULTICAST_PORT
        );

        self.socket
            .send_to(request.as_bytes(), (MULTICAST_GROUP, MULTICAST_PORT))
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to send M-SEARCH: {}", e)))?;

        debug!("sent M-SEARCH to {}:{}", MULTICAST_GROUP, MULTICAST_PORT);
        Ok(())
    }

    /// Receive the next reply datagram.
    ///
    /// Returns `None` once the idle timeout elapses or the socket fails;
    /// either way the scan is over, not in error. Every received datagram
    /// yields a reply, even when it carries no Location header.
    pub fn recv_reply(&mut self) -> Option<SsdpReply> {
        match self.socket.recv_from(&mut self.buffer) {
            Ok((size, addr)) => {
                let text = String::from_utf8_lossy(&self.buffer[..size]);
                debug!("reply from {}: {} bytes", addr, size);
                Some(SsdpReply {
                    address: addr.ip().to_string(),
                    location: extract_location(&text),
                })
            }
            Err(e) => {
                match e.kind() {
                    std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut => {
                        debug!("discovery complete");
                    }
                    _ => {
                        debug!("socket error ended scan: {}", e);
                    }
                }
                None
            }
        }
    }
}

/// Find the Location header in a CRLF-delimited pseudo-HTTP reply.
///
/// Headers are matched case-insensitively; the first match wins. Returns an
/// empty string when the reply has no Location header.
fn extract_location(reply: &str) -> String {
    for line in reply.lines() {
        if let Some(value) = extract_header_value(line.trim(), "LOCATION:") {
            return value;
        }
    }
    String::new()
}

/// Extract header value from a line like "HEADER: value"
fn extract_header_value(line: &str, header: &str) -> Option<String> {
    // Datagrams are decoded lossily, so the prefix slice must respect char
    // boundaries.
    let prefix = line.get(..header.len())?;
    if line.len() > header.len() && prefix.eq_ignore_ascii_case(header) {
        Some(line[header.len()..].trim().to_string())
    } else {
        None
    }
}
