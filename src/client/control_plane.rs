//! Control plane trait for server communication
//!
//! Abstracts the status queries the sampler issues (INFO, CLUSTER
//! NODES, PING, AUTH) from the underlying transport, so topology
//! discovery and node sampling can be tested against canned responses
//! without a live server.

use std::io;

use super::raw_connection::RawConnection;
use crate::utils::{RespEncoder, RespValue};

/// Control plane operations trait
///
/// Implementations handle the underlying protocol and connection
/// management; the status-query helpers live in [`ControlPlaneExt`].
pub trait ControlPlane {
    /// Execute a command with string arguments
    fn execute(&mut self, args: &[&str]) -> io::Result<RespValue>;
}

impl ControlPlane for RawConnection {
    fn execute(&mut self, args: &[&str]) -> io::Result<RespValue> {
        let mut encoder = RespEncoder::with_capacity(64);
        encoder.encode_command_str(args);
        self.round_trip(&encoder)
    }
}

/// Extension trait with the sampler's status queries
pub trait ControlPlaneExt: ControlPlane {
    /// Send PING and verify PONG response
    fn ping(&mut self) -> io::Result<bool> {
        match self.execute(&["PING"])? {
            RespValue::SimpleString(s) => Ok(s == "PONG"),
            _ => Ok(false),
        }
    }

    /// Get INFO for a section as raw bytes (empty section returns the
    /// default report)
    fn info(&mut self, section: &str) -> io::Result<Vec<u8>> {
        let response = if section.is_empty() {
            self.execute(&["INFO"])?
        } else {
            self.execute(&["INFO", section])?
        };

        match response {
            RespValue::BulkString(data) => Ok(data),
            RespValue::Error(e) => Err(io::Error::new(io::ErrorKind::Other, e)),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unexpected INFO response: {:?}", other),
            )),
        }
    }

    /// Get CLUSTER NODES response as string
    fn cluster_nodes(&mut self) -> io::Result<String> {
        match self.execute(&["CLUSTER", "NODES"])? {
            RespValue::BulkString(data) => String::from_utf8(data).map_err(|e| {
                io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {}", e))
            }),
            RespValue::Error(e) => Err(io::Error::new(io::ErrorKind::Other, e)),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unexpected CLUSTER NODES response: {:?}", other),
            )),
        }
    }

    /// Send AUTH command
    fn authenticate(&mut self, password: &str, username: Option<&str>) -> io::Result<()> {
        let response = match username {
            Some(user) => self.execute(&["AUTH", user, password])?,
            None => self.execute(&["AUTH", password])?,
        };

        match response {
            RespValue::SimpleString(s) if s == "OK" => Ok(()),
            RespValue::Error(e) => Err(io::Error::new(io::ErrorKind::PermissionDenied, e)),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unexpected AUTH response: {:?}", other),
            )),
        }
    }
}

// Blanket implementation: any ControlPlane automatically gets ControlPlaneExt
impl<T: ControlPlane> ControlPlaneExt for T {}
