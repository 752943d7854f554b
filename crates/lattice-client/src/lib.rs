//! Lattice Client
//!
//! Load-balancing, reconnecting client for a partitioned, multi-node data
//! store. The embedding application supplies a keyspace-to-addresses
//! mapping once; the [`Cluster`] hands out one shared [`ClientGroup`] per
//! keyspace, which round-robins requests over the keyspace's nodes and
//! re-dials a node transparently after any transport failure.
//!
//! # Layers
//!
//! - [`ClusterConfig`] — immutable keyspace → `host:port` list mapping
//! - [`Cluster`] — lazy per-keyspace registry of client groups
//! - [`ClientGroup`] — round-robin rotation and the typed operation surface
//! - [`NodeClient`] — one node, one connection, teardown-on-failure
//!
//! # Example
//!
//! ```no_run
//! use lattice_client::{Cluster, ClusterConfig};
//! use serde_json::json;
//!
//! let config = ClusterConfig::default()
//!     .keyspace("events", ["10.0.0.1:9160", "10.0.0.2:9160"]);
//! let cluster = Cluster::new(config);
//!
//! let events = cluster.client("events")?;
//! events.insert("row1", "name", json!("alice"), None)?;
//! let value = events.get("row1", "name", None)?;
//! # Ok::<(), lattice_common::protocol::LatticeError>(())
//! ```
//!
//! # Failure model
//!
//! A failed call is not retried: the affected connection is torn down so
//! the *next* rotation to that node dials fresh, and the current call's
//! error surfaces to the caller. A node that fails stays in rotation; there
//! is no health tracking or circuit breaking at this layer.

pub mod cluster;
pub mod config;
pub mod group;
pub mod node;

#[cfg(test)]
pub(crate) mod testing;

pub use cluster::{Cluster, GroupConnector};
pub use config::ClusterConfig;
pub use group::ClientGroup;
pub use node::NodeClient;

pub use lattice_common::protocol::{LatticeError, Result};
