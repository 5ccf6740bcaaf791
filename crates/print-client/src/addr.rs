//! Printer endpoint resolution.
//!
//! The endpoint is configured once as a host plus port. Hosts may be IPv4 or
//! IPv6 literals or DNS names; the port defaults to 9100 (JetDirect / RAW).

use std::fmt;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};

use crate::PrintError;

/// Default raw printing port.
pub const DEFAULT_PORT: u16 = 9100;

/// Where the printer listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterEndpoint {
    /// IP literal or hostname.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl PrinterEndpoint {
    /// Endpoint from an explicit host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Resolve to a socket address. For hostnames with several addresses the
    /// first one is used.
    pub fn resolve(&self) -> Result<SocketAddr, PrintError> {
        if self.host.is_empty() {
            return Err(PrintError::InvalidAddress("empty printer host".into()));
        }
        if let Ok(ip) = self.host.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, self.port));
        }
        if let Ok(mut addrs) = (self.host.as_str(), self.port).to_socket_addrs()
            && let Some(addr) = addrs.next()
        {
            return Ok(addr);
        }
        Err(PrintError::NoAddressFound(self.host.clone()))
    }
}

impl fmt::Display for PrinterEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_ip_literal() {
        let addr = PrinterEndpoint::new("10.0.0.1", 9100).resolve().unwrap();
        assert_eq!(addr.to_string(), "10.0.0.1:9100");
    }

    #[test]
    fn resolve_localhost() {
        let addr = PrinterEndpoint::new("localhost", 9100).resolve().unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 9100);
    }

    #[test]
    fn resolve_unknown_host() {
        match PrinterEndpoint::new("no-such-host.invalid", 9100).resolve() {
            Err(PrintError::NoAddressFound(h)) => assert_eq!(h, "no-such-host.invalid"),
            other => panic!("expected NoAddressFound, got {other:?}"),
        }
    }

    #[test]
    fn display_brackets_ipv6() {
        assert_eq!(PrinterEndpoint::new("::1", 9100).to_string(), "[::1]:9100");
        assert_eq!(
            PrinterEndpoint::new("printer", 9100).to_string(),
            "printer:9100"
        );
    }
}
