//! Typed error types for the print client.

use std::io;
use std::time::Duration;

/// Reasons a label document could not be delivered to the printer.
///
/// Every variant means the print job failed as a whole. Copies written
/// before a failure are not tracked; the printer may already have printed
/// some of them.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    // -- Address --
    /// The configured printer host is empty or malformed.
    #[error("invalid printer address: {0}")]
    InvalidAddress(String),

    /// DNS resolution found no addresses for the configured host.
    #[error("no address found for printer host: {0}")]
    NoAddressFound(String),

    // -- Connection --
    /// The printer actively refused the connection (e.g. port not open).
    #[error("connection refused by printer at {addr}")]
    ConnectionRefused {
        /// The address that was attempted.
        addr: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// TCP connect timed out before the printer responded.
    #[error("timed out connecting to printer at {addr} ({timeout:?})")]
    ConnectionTimeout {
        /// The address that was attempted.
        addr: String,
        /// The configured timeout that elapsed.
        timeout: Duration,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Connection failed for a reason other than refusal or timeout.
    #[error("could not connect to printer at {addr}: {source}")]
    ConnectionFailed {
        /// The address that was attempted.
        addr: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    // -- I/O --
    /// Writing the document to the printer failed or timed out.
    #[error("write to printer failed: {0}")]
    WriteFailed(#[source] io::Error),

    // -- Job --
    /// A job asked for zero copies.
    #[error("nothing to print: copies must be at least 1")]
    NoCopies,
}

impl PrintError {
    /// `true` when the printer was never reached (address or connect
    /// failure), `false` when the connection was made but communication
    /// failed afterwards.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            PrintError::InvalidAddress(_)
                | PrintError::NoAddressFound(_)
                | PrintError::ConnectionRefused { .. }
                | PrintError::ConnectionTimeout { .. }
                | PrintError::ConnectionFailed { .. }
        )
    }
}
