use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::protocol::error::{LatticeError, Result};
use crate::protocol::{Request, Response};
use crate::transport::codec::JsonCodec;
use crate::transport::Transport;

/// Default timeout for TCP connect/read/write (5 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum message size (100 MB), to prevent allocation of excessively
/// large buffers from a corrupt length prefix.
const MAX_MESSAGE_SIZE: usize = 100 * 1024 * 1024;

/// Synchronous TCP transport to one node.
///
/// Holds at most one open stream. `open` dials the configured address,
/// trying each resolved socket address until one succeeds; `close` drops
/// the stream so the next `open` dials fresh.
///
/// # Example
///
/// ```no_run
/// use lattice_common::transport::{TcpTransport, Transport};
/// use lattice_common::protocol::Request;
/// use serde_json::json;
///
/// let mut transport = TcpTransport::new("127.0.0.1:9160");
/// transport.open().unwrap();
///
/// let request = Request::new("get", json!({"key": "row1"}));
/// let response = transport.send_request(&request).unwrap();
/// ```
pub struct TcpTransport {
    addr: String,
    stream: Option<TcpStream>,
    timeout: Duration,
}

impl TcpTransport {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            stream: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the connect/read/write timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn dial(&self) -> Result<TcpStream> {
        let socket_addrs = self.addr.to_socket_addrs().map_err(|e| {
            LatticeError::transport(format!("Invalid address '{}': {}", self.addr, e))
        })?;

        // Try each resolved address until one succeeds
        let mut last_err = None;
        for socket_addr in socket_addrs {
            match TcpStream::connect_timeout(&socket_addr, self.timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(self.timeout)).map_err(|e| {
                        LatticeError::transport(format!("Failed to set read timeout: {}", e))
                    })?;
                    stream.set_write_timeout(Some(self.timeout)).map_err(|e| {
                        LatticeError::transport(format!("Failed to set write timeout: {}", e))
                    })?;
                    return Ok(stream);
                }
                Err(e) => {
                    last_err = Some(e);
                }
            }
        }

        Err(LatticeError::transport(format!(
            "Failed to connect to {}: {}",
            self.addr,
            last_err
                .map(|e| e.to_string())
                .unwrap_or_else(|| "Unknown error".to_string())
        )))
    }

    /// Sends a message with length prefix.
    ///
    /// Wire format: `[4-byte length as u32 big-endian] + [data]`
    fn send_message(stream: &mut TcpStream, data: &[u8], timeout: &Duration) -> Result<()> {
        let len = data.len() as u32;

        stream
            .write_all(&len.to_be_bytes())
            .map_err(|e| Self::map_io_error(e, "writing length prefix", timeout))?;

        stream
            .write_all(data)
            .map_err(|e| Self::map_io_error(e, "writing data", timeout))?;

        stream
            .flush()
            .map_err(|e| Self::map_io_error(e, "flushing stream", timeout))?;

        Ok(())
    }

    /// Receives a message with length prefix.
    fn receive_message(stream: &mut TcpStream, timeout: &Duration) -> Result<Vec<u8>> {
        let mut len_buf = [0u8; 4];
        stream
            .read_exact(&mut len_buf)
            .map_err(|e| Self::map_io_error(e, "reading length prefix", timeout))?;

        let len = u32::from_be_bytes(len_buf) as usize;

        if len > MAX_MESSAGE_SIZE {
            return Err(LatticeError::InvalidResponse(format!(
                "Message too large: {} bytes (max {} bytes)",
                len, MAX_MESSAGE_SIZE
            )));
        }

        let mut buf = vec![0u8; len];
        stream
            .read_exact(&mut buf)
            .map_err(|e| Self::map_io_error(e, "reading data", timeout))?;

        Ok(buf)
    }

    /// Maps IO errors to transport error variants:
    /// - Timeouts/would block -> `Timeout`
    /// - Connection errors -> `Transport`
    /// - Other IO errors -> `Io` (propagated unclassified)
    fn map_io_error(err: std::io::Error, context: &str, timeout: &Duration) -> LatticeError {
        match err.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => {
                LatticeError::Timeout(timeout.as_millis() as u64)
            }
            std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::BrokenPipe
            | std::io::ErrorKind::NotConnected
            | std::io::ErrorKind::UnexpectedEof => {
                LatticeError::transport(format!("{}: Connection lost", context))
            }
            _ => LatticeError::Io(err),
        }
    }
}

impl Transport for TcpTransport {
    fn open(&mut self) -> Result<()> {
        let stream = self.dial()?;
        tracing::debug!(addr = %self.addr, "Transport opened");
        self.stream = Some(stream);
        Ok(())
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            // Best-effort shutdown; the stream is dropped either way.
            let _ = stream.shutdown(Shutdown::Both);
            tracing::debug!(addr = %self.addr, "Transport closed");
        }
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn send_request(&mut self, request: &Request) -> Result<Response> {
        let timeout = self.timeout;
        let stream = self.stream.as_mut().ok_or_else(|| {
            LatticeError::transport(format!("Not connected to {}", self.addr))
        })?;

        let encoded = JsonCodec::encode_request(request)?;
        Self::send_message(stream, &encoded, &timeout)?;

        let response_data = Self::receive_message(stream, &timeout)?;
        JsonCodec::decode_response(&response_data)
    }

    fn addr(&self) -> &str {
        &self.addr
    }
}
