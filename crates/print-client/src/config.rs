//! Configuration types for the print client.

use std::time::Duration;

/// Printer connection configuration.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct PrinterConfig {
    /// Network timeout settings.
    pub timeouts: PrinterTimeouts,
}

/// Timeout settings for printer connections.
///
/// Both default to 5 seconds, which is generous on a LAN. Label documents
/// here are a few hundred bytes, so the write timeout does not need to cover
/// large graphics payloads.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct PrinterTimeouts {
    /// Maximum time to wait for the TCP connection to establish.
    pub connect: Duration,
    /// Maximum time a single write may block.
    pub write: Duration,
}

impl Default for PrinterTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(5),
            write: Duration::from_secs(5),
        }
    }
}

impl PrinterConfig {
    /// Use the same timeout for connecting and writing.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.connect = timeout;
        self.timeouts.write = timeout;
        self
    }
}
