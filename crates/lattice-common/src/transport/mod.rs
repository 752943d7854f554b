//! Transport layer: the connection seam between the client and one node.
//!
//! A [`Transport`] owns a single connection to a single node and executes
//! one request/response exchange at a time. The stock implementation is
//! [`TcpTransport`], speaking length-prefixed JSON:
//!
//! ```text
//! [4-byte length prefix as u32 big-endian] + [JSON data]
//! ```
//!
//! All I/O is synchronous and blocking. Reconnect policy lives above this
//! layer; a transport only knows how to open, close, and exchange.

pub mod codec;
pub mod tcp;

#[cfg(test)]
mod tests;

pub use codec::JsonCodec;
pub use tcp::TcpTransport;

use crate::protocol::{Request, Response, Result};

/// A single connection to a single node.
///
/// Implementations report their own open state; callers are expected to
/// check [`is_open`](Transport::is_open) and [`open`](Transport::open)
/// before sending. `close` must be safe to call in any state, since error
/// paths close defensively.
pub trait Transport: Send {
    /// Opens the connection. Calling this on an already-open transport is
    /// allowed and reopens it.
    fn open(&mut self) -> Result<()>;

    /// Closes the connection, dropping any buffered state. Idempotent.
    fn close(&mut self);

    /// Whether the connection is currently open.
    fn is_open(&self) -> bool;

    /// Sends one request and blocks for its response.
    fn send_request(&mut self, request: &Request) -> Result<Response>;

    /// The address this transport dials.
    fn addr(&self) -> &str;
}
