use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use serde_json::{json, Value};

use lattice_common::protocol::{LatticeError, Request, Result, RpcResult};

use crate::node::NodeClient;

/// Round-robin client group for one keyspace.
///
/// Owns one [`NodeClient`] per configured address and selects the next node
/// with a monotonically increasing cursor, wrapped modulo the node count.
/// The cursor never resets on failure: a failed node is simply revisited on
/// its next turn, and per-call reconnect inside [`NodeClient`] handles
/// transient outages. There is no health tracking or node exclusion.
///
/// The group is thread-safe and meant to be shared: the cursor is atomic
/// and each node sits behind its own mutex, so concurrent callers rotate
/// over disjoint nodes without serializing on each other.
pub struct ClientGroup {
    keyspace: String,
    addrs: Vec<String>,
    nodes: Vec<Mutex<NodeClient>>,
    cursor: AtomicUsize,
}

impl std::fmt::Debug for ClientGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientGroup")
            .field("keyspace", &self.keyspace)
            .field("addrs", &self.addrs)
            .finish_non_exhaustive()
    }
}

impl ClientGroup {
    /// Builds a group over the stock TCP transport and eagerly connects
    /// every node. A single unreachable node fails the whole construction.
    pub fn connect(keyspace: impl Into<String>, addrs: &[String]) -> Result<Self> {
        let nodes = addrs.iter().map(|addr| NodeClient::tcp(addr.as_str())).collect();
        Self::from_nodes(keyspace, nodes)
    }

    /// Builds a group from pre-assembled node clients, eagerly connecting
    /// each one. Connection failures propagate; nothing is constructed
    /// half-open.
    pub fn from_nodes(keyspace: impl Into<String>, mut nodes: Vec<NodeClient>) -> Result<Self> {
        let keyspace = keyspace.into();

        for node in &mut nodes {
            node.ensure_connected()?;
        }

        let addrs: Vec<String> = nodes.iter().map(|n| n.addr().to_string()).collect();
        tracing::debug!(keyspace = %keyspace, nodes = nodes.len(), "Client group connected");

        Ok(Self {
            keyspace,
            addrs,
            nodes: nodes.into_iter().map(Mutex::new).collect(),
            cursor: AtomicUsize::new(0),
        })
    }

    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    /// Addresses of all nodes in this group, in configuration order.
    pub fn node_addrs(&self) -> &[String] {
        &self.addrs
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Picks the next node index. The cursor grows without bound; the
    /// modulo keeps the index valid.
    fn next_index(&self) -> Result<usize> {
        if self.nodes.is_empty() {
            return Err(LatticeError::NoServersConfigured);
        }
        Ok(self.cursor.fetch_add(1, Ordering::Relaxed) % self.nodes.len())
    }

    /// Routes one request to the next node in rotation: connect if needed,
    /// then send. Failures surface to the caller; the node's connection has
    /// already been torn down so the next rotation to it dials fresh.
    pub fn dispatch(&self, request: &Request) -> Result<RpcResult> {
        let index = self.next_index()?;
        let mut node = self.nodes[index]
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        node.ensure_connected()?;
        node.call(request)
    }

    /// Sends an operation this layer does not enumerate. The store's
    /// operation set is opaque here; anything the server understands goes.
    pub fn invoke(&self, method: impl Into<String>, args: Value) -> Result<RpcResult> {
        self.dispatch(&Request::new(method, args))
    }

    /// Fetches one column of one row.
    pub fn get(&self, key: &str, column: &str, consistency: Option<u32>) -> Result<RpcResult> {
        self.dispatch(&with_consistency(
            Request::new(
                "get",
                json!({"keyspace": self.keyspace, "key": key, "column": column}),
            ),
            consistency,
        ))
    }

    /// Fetches a contiguous slice of columns of one row.
    pub fn get_slice(
        &self,
        key: &str,
        columns: &[&str],
        consistency: Option<u32>,
    ) -> Result<RpcResult> {
        self.dispatch(&with_consistency(
            Request::new(
                "get_slice",
                json!({"keyspace": self.keyspace, "key": key, "columns": columns}),
            ),
            consistency,
        ))
    }

    /// Writes one column of one row.
    pub fn insert(
        &self,
        key: &str,
        column: &str,
        value: Value,
        consistency: Option<u32>,
    ) -> Result<RpcResult> {
        self.dispatch(&with_consistency(
            Request::new(
                "insert",
                json!({
                    "keyspace": self.keyspace,
                    "key": key,
                    "column": column,
                    "value": value
                }),
            ),
            consistency,
        ))
    }

    /// Writes several columns of one row in a single call.
    pub fn batch_insert(
        &self,
        key: &str,
        columns: Value,
        consistency: Option<u32>,
    ) -> Result<RpcResult> {
        self.dispatch(&with_consistency(
            Request::new(
                "batch_insert",
                json!({"keyspace": self.keyspace, "key": key, "columns": columns}),
            ),
            consistency,
        ))
    }

    /// Removes one column of one row.
    pub fn remove(&self, key: &str, column: &str, consistency: Option<u32>) -> Result<RpcResult> {
        self.dispatch(&with_consistency(
            Request::new(
                "remove",
                json!({"keyspace": self.keyspace, "key": key, "column": column}),
            ),
            consistency,
        ))
    }
}

fn with_consistency(request: Request, consistency: Option<u32>) -> Request {
    match consistency {
        Some(level) => request.with_consistency(level),
        None => request,
    }
}
