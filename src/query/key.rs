use std::fmt;

use serde::Serialize;

use crate::cluster::ClusterConfig;

pub const ENTRIES_NAMESPACE: &str = "cruddapp";
pub const PROGRAM_ACCOUNT_NAMESPACE: &str = "get-program-account";
pub const MUTATION_NAMESPACE: &str = "journalEntry";

/// Identity of one cached query or mutation channel.
///
/// `(namespace, operation, cluster, params)`; equal inputs always give equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct QueryKey {
    pub namespace: String,
    pub operation: Option<String>,
    pub cluster: String,
    pub params: Vec<String>,
}

impl QueryKey {
    pub fn new(
        namespace: &str,
        operation: Option<&str>,
        cluster: &ClusterConfig,
        params: Vec<String>,
    ) -> Self {
        Self {
            namespace: namespace.to_string(),
            operation: operation.map(str::to_string),
            cluster: cluster.cache_id(),
            params,
        }
    }

    /// `(cruddapp, all, cluster)`
    pub fn entries(cluster: &ClusterConfig) -> Self {
        Self::new(ENTRIES_NAMESPACE, Some("all"), cluster, Vec::new())
    }

    /// `(cruddapp, fetch, cluster, account)`
    pub fn entry(cluster: &ClusterConfig, account: &str) -> Self {
        Self::new(ENTRIES_NAMESPACE, Some("fetch"), cluster, vec![account.to_string()])
    }

    /// `(get-program-account, cluster)`
    pub fn program_account(cluster: &ClusterConfig) -> Self {
        Self::new(PROGRAM_ACCOUNT_NAMESPACE, None, cluster, Vec::new())
    }

    /// `(journalEntry, operation, cluster)`
    pub fn mutation(operation: &str, cluster: &ClusterConfig) -> Self {
        Self::new(MUTATION_NAMESPACE, Some(operation), cluster, Vec::new())
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.namespace)?;
        if let Some(operation) = &self.operation {
            write!(f, "/{}", operation)?;
        }
        write!(f, "@{}", self.cluster)?;
        for param in &self.params {
            write!(f, "/{}", param)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_same_key() {
        let cluster = ClusterConfig::devnet();
        assert_eq!(QueryKey::entries(&cluster), QueryKey::entries(&cluster.clone()));
        assert_eq!(QueryKey::entry(&cluster, "abc"), QueryKey::entry(&cluster, "abc"));
    }

    #[test]
    fn cluster_and_params_separate_keys() {
        let devnet = ClusterConfig::devnet();
        let localnet = ClusterConfig::localnet();
        assert_ne!(QueryKey::entries(&devnet), QueryKey::entries(&localnet));
        assert_ne!(QueryKey::entry(&devnet, "a"), QueryKey::entry(&devnet, "b"));
        assert_ne!(QueryKey::entries(&devnet), QueryKey::program_account(&devnet));
        assert_ne!(
            QueryKey::mutation("create", &devnet),
            QueryKey::mutation("update", &devnet)
        );
    }

    #[test]
    fn display_lists_every_component() {
        let key = QueryKey::entry(&ClusterConfig::devnet(), "abc");
        let text = key.to_string();
        assert!(text.starts_with("cruddapp/fetch@devnet:"));
        assert!(text.ends_with("/abc"));
    }
}
