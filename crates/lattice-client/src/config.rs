use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use lattice_common::protocol::{LatticeError, Result};

/// Immutable keyspace configuration: keyspace name to the ordered list of
/// `host:port` addresses serving it.
///
/// Supplied once by the embedding application, either built in code or
/// deserialized from a config file:
///
/// ```
/// use lattice_client::ClusterConfig;
///
/// let config = ClusterConfig::default()
///     .keyspace("events", ["10.0.0.1:9160", "10.0.0.2:9160"])
///     .keyspace("users", ["10.0.0.3:9160"]);
///
/// assert_eq!(config.resolve("users").unwrap(), ["10.0.0.3:9160"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterConfig {
    keyspaces: HashMap<String, Vec<String>>,
}

impl ClusterConfig {
    pub fn new(keyspaces: HashMap<String, Vec<String>>) -> Self {
        Self { keyspaces }
    }

    /// Adds a keyspace, replacing any previous address list for the name.
    pub fn keyspace<S, I>(mut self, name: impl Into<String>, addrs: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        self.keyspaces
            .insert(name.into(), addrs.into_iter().map(Into::into).collect());
        self
    }

    /// Resolves a keyspace name to its configured address list.
    ///
    /// Fails with [`LatticeError::UnknownKeyspace`] when the name is absent.
    pub fn resolve(&self, keyspace: &str) -> Result<&[String]> {
        self.keyspaces
            .get(keyspace)
            .map(Vec::as_slice)
            .ok_or_else(|| LatticeError::UnknownKeyspace(keyspace.to_string()))
    }

    pub fn contains(&self, keyspace: &str) -> bool {
        self.keyspaces.contains_key(keyspace)
    }

    pub fn keyspace_names(&self) -> impl Iterator<Item = &str> {
        self.keyspaces.keys().map(String::as_str)
    }
}

impl FromIterator<(String, Vec<String>)> for ClusterConfig {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        Self {
            keyspaces: iter.into_iter().collect(),
        }
    }
}
