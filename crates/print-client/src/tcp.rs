//! TCP transport for ZPL printers (port 9100 / JetDirect / RAW).

use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};

use tracing::{debug, instrument};

use crate::{Connector, PrintError, Printer, PrinterConfig, PrinterEndpoint};

/// A synchronous TCP connection to a label printer.
///
/// The connection is closed when the value is dropped.
#[derive(Debug)]
pub struct TcpPrinter {
    stream: TcpStream,
}

impl TcpPrinter {
    /// Resolve the endpoint and connect, applying the configured connect and
    /// write timeouts.
    #[instrument(skip_all, fields(printer = %endpoint))]
    pub fn connect(endpoint: &PrinterEndpoint, config: &PrinterConfig) -> Result<Self, PrintError> {
        let addr = endpoint.resolve()?;
        let stream = open_stream(&addr, config)?;
        debug!(%addr, "connected");
        Ok(Self { stream })
    }
}

impl Printer for TcpPrinter {
    fn send_raw(&mut self, data: &[u8]) -> Result<(), PrintError> {
        self.stream
            .write_all(data)
            .map_err(PrintError::WriteFailed)?;
        self.stream.flush().map_err(PrintError::WriteFailed)?;
        Ok(())
    }
}

impl Drop for TcpPrinter {
    fn drop(&mut self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

/// Connects a fresh [`TcpPrinter`] for every job.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    endpoint: PrinterEndpoint,
    config: PrinterConfig,
}

impl TcpConnector {
    /// Connector for a fixed endpoint.
    pub fn new(endpoint: PrinterEndpoint, config: PrinterConfig) -> Self {
        Self { endpoint, config }
    }

    /// The configured endpoint.
    pub fn endpoint(&self) -> &PrinterEndpoint {
        &self.endpoint
    }
}

impl Connector for TcpConnector {
    type Printer = TcpPrinter;

    fn connect(&self) -> Result<TcpPrinter, PrintError> {
        TcpPrinter::connect(&self.endpoint, &self.config)
    }
}

// ── Helpers ────────────────────────────────────────────────────────────

fn open_stream(addr: &SocketAddr, config: &PrinterConfig) -> Result<TcpStream, PrintError> {
    let stream = TcpStream::connect_timeout(addr, config.timeouts.connect).map_err(|e| {
        match e.kind() {
            io::ErrorKind::ConnectionRefused => PrintError::ConnectionRefused {
                addr: addr.to_string(),
                source: e,
            },
            io::ErrorKind::TimedOut => PrintError::ConnectionTimeout {
                addr: addr.to_string(),
                timeout: config.timeouts.connect,
                source: e,
            },
            _ => PrintError::ConnectionFailed {
                addr: addr.to_string(),
                source: e,
            },
        }
    })?;

    // Small documents: send each copy immediately.
    stream
        .set_nodelay(true)
        .and_then(|()| stream.set_write_timeout(Some(config.timeouts.write)))
        .map_err(|e| PrintError::ConnectionFailed {
            addr: addr.to_string(),
            source: e,
        })?;

    Ok(stream)
}
