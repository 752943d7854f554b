use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use lattice_common::protocol::Result;

use crate::config::ClusterConfig;
use crate::group::ClientGroup;

/// Builds a client group for a keyspace. The default connector dials TCP;
/// embedders and tests can substitute their own.
pub type GroupConnector = dyn Fn(&str, &[String]) -> Result<ClientGroup> + Send + Sync;

/// Registry of client groups, one per keyspace.
///
/// Owns the immutable [`ClusterConfig`] and a lazy cache of
/// [`ClientGroup`]s. Groups are built on first use, connected eagerly, and
/// kept for the lifetime of the `Cluster`; entries are never evicted.
/// Because groups are thread-safe, one `Cluster` is meant to be shared
/// across all threads of the embedding application.
///
/// # Example
///
/// ```no_run
/// use lattice_client::{Cluster, ClusterConfig};
///
/// let config = ClusterConfig::default()
///     .keyspace("events", ["10.0.0.1:9160", "10.0.0.2:9160"]);
/// let cluster = Cluster::new(config);
///
/// let events = cluster.client("events")?;
/// let value = events.get("row1", "name", None)?;
/// # Ok::<(), lattice_common::protocol::LatticeError>(())
/// ```
pub struct Cluster {
    config: ClusterConfig,
    connector: Box<GroupConnector>,
    groups: Mutex<HashMap<String, Arc<ClientGroup>>>,
}

impl Cluster {
    pub fn new(config: ClusterConfig) -> Self {
        Self::with_connector(config, Box::new(|keyspace, addrs| {
            ClientGroup::connect(keyspace, addrs)
        }))
    }

    /// Builds a cluster with a custom group connector.
    pub fn with_connector(config: ClusterConfig, connector: Box<GroupConnector>) -> Self {
        Self {
            config,
            connector,
            groups: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Returns the client group for a keyspace.
    ///
    /// A cached group is returned as-is, without re-validation. On a miss
    /// the keyspace is resolved against the config (failing with
    /// `UnknownKeyspace` when absent), a group is built and eagerly
    /// connected, stored, and returned. Construction failures propagate and
    /// cache nothing, so a later call retries from scratch.
    ///
    /// When two threads race on the same fresh keyspace, both may build a
    /// group; the first insert wins and the loser's group is dropped.
    pub fn client(&self, keyspace: &str) -> Result<Arc<ClientGroup>> {
        {
            let groups = self.groups.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(group) = groups.get(keyspace) {
                return Ok(Arc::clone(group));
            }
        }

        let addrs = self.config.resolve(keyspace)?.to_vec();

        // Connect outside the lock; other keyspaces stay serviceable while
        // this one dials.
        let group = Arc::new((self.connector)(keyspace, &addrs)?);
        tracing::debug!(keyspace = %keyspace, nodes = addrs.len(), "Client group registered");

        let mut groups = self.groups.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(
            groups.entry(keyspace.to_string()).or_insert(group),
        ))
    }
}
