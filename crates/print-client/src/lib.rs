//! Batch label print client: deliver ZPL documents to network printers.
//!
//! One job is one TCP connection: connect, write the whole document once per
//! copy, close. There is no retry and no per-copy acknowledgement; any
//! failure fails the job. The API is synchronous (`std::net`); async callers
//! run it on a blocking thread.
mod addr;
mod config;
mod error;
mod tcp;

pub use addr::{DEFAULT_PORT, PrinterEndpoint};
pub use config::{PrinterConfig, PrinterTimeouts};
pub use error::PrintError;
pub use tcp::{TcpConnector, TcpPrinter};

use tracing::{info, instrument, warn};

// ── Traits ──────────────────────────────────────────────────────────────

/// Send data to a printer.
pub trait Printer: Send {
    /// Send raw bytes to the printer.
    fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError>;

    /// Send a ZPL string to the printer (convenience wrapper over `send_raw`).
    fn send_zpl(&mut self, zpl: &str) -> Result<(), PrintError> {
        self.send_raw(zpl.as_bytes())
    }
}

/// Opens a connection to the configured printer.
///
/// The request boundary depends on this rather than on [`TcpConnector`]
/// directly so that tests can substitute an in-memory printer.
pub trait Connector: Send + Sync {
    /// The connected printer type.
    type Printer: Printer;

    /// Open a new connection.
    fn connect(&self) -> Result<Self::Printer, PrintError>;
}

// ── Jobs ────────────────────────────────────────────────────────────────

/// Result of a completed job.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopiesSent {
    /// Copies written.
    pub copies: u32,
    /// Total bytes written.
    pub bytes: usize,
}

/// Write `document` to an open printer `copies` times, back to back.
///
/// Stops at the first failed write and returns its error.
pub fn send_copies<P>(printer: &mut P, document: &[u8], copies: u32) -> Result<CopiesSent, PrintError>
where
    P: Printer + ?Sized,
{
    if copies == 0 {
        return Err(PrintError::NoCopies);
    }
    for _ in 0..copies {
        printer.send_raw(document)?;
    }
    Ok(CopiesSent {
        copies,
        bytes: document.len() * copies as usize,
    })
}

/// Connect, send `copies` copies of a ZPL document, and close the connection.
#[instrument(skip_all, fields(copies = copies, bytes = document.len()))]
pub fn print_document<C>(connector: &C, document: &str, copies: u32) -> Result<CopiesSent, PrintError>
where
    C: Connector + ?Sized,
{
    if copies == 0 {
        return Err(PrintError::NoCopies);
    }
    let result = connector
        .connect()
        .and_then(|mut printer| send_copies(&mut printer, document.as_bytes(), copies));
    match &result {
        Ok(sent) => info!(copies = sent.copies, "label job sent"),
        Err(e) => warn!(error = %e, "label job failed"),
    }
    result
}
