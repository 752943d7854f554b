//! Lattice Common Types and Transport
//!
//! This crate provides the protocol definitions and blocking TCP transport
//! layer shared by the lattice store client.
//!
//! # Overview
//!
//! Lattice is a client-side access layer for a partitioned, multi-node data
//! store. This crate contains the pieces every component agrees on:
//!
//! - **Protocol Layer**: Request/Response types and the uniform error type
//! - **Transport Layer**: the [`transport::Transport`] seam and its TCP
//!   implementation
//!
//! # Wire format
//!
//! - **Transport**: TCP, synchronous blocking I/O
//! - **Serialization**: JSON
//! - **Message Format**: `[4-byte length prefix as u32 big-endian] + [JSON data]`
//! - **Max Message Size**: 100 MB
//!
//! # Example
//!
//! ```no_run
//! use lattice_common::protocol::Request;
//! use lattice_common::transport::{TcpTransport, Transport};
//! use serde_json::json;
//!
//! let mut transport = TcpTransport::new("127.0.0.1:9160");
//! transport.open()?;
//!
//! let request = Request::new("get", json!({"key": "row1"}));
//! let response = transport.send_request(&request)?;
//! # Ok::<(), lattice_common::protocol::LatticeError>(())
//! ```

pub mod protocol;
pub mod transport;

pub use protocol::*;
