//! Configuration module for environment variables and application settings

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;

use crate::cluster::ClusterConfig;
use crate::notify::DEFAULT_TOAST_CAPACITY;
use crate::query::DEFAULT_STALE_TIME;

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Load the global configuration from the environment on first call.
pub fn init() -> Result<&'static Config> {
    CONFIG.get_or_try_init(Config::from_env)
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Cluster the program accessors are bound to
    pub cluster: ClusterConfig,

    /// Wallet keypair used to sign entry transactions
    pub keypair_path: PathBuf,

    pub query_stale_time: Duration,

    /// Number of notifications kept for `/api/v1/notifications`
    pub notification_capacity: usize,

    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let moniker = lookup("CRUDDAPP_CLUSTER").unwrap_or_else(|| "devnet".to_string());
        let mut cluster = ClusterConfig::from_moniker(&moniker)
            .with_context(|| format!("CRUDDAPP_CLUSTER is not a known cluster: {}", moniker))?;
        if let Some(url) = lookup("SOLANA_RPC_URL") {
            cluster = cluster.with_endpoint(url);
        }

        let keypair_path = match lookup("SOLANA_KEYPAIR_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_keypair_path(&lookup),
        };

        let stale_secs: Option<u64> = parse_var(&lookup, "QUERY_STALE_SECS")?;

        Ok(Self {
            cluster,
            keypair_path,
            query_stale_time: stale_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_STALE_TIME),
            notification_capacity: parse_var(&lookup, "NOTIFICATION_CAPACITY")?
                .unwrap_or(DEFAULT_TOAST_CAPACITY),
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
                port: parse_var(&lookup, "SERVER_PORT")?.unwrap_or(3000),
            },
        })
    }
}

/// `None` when `name` is unset; an error when it is set but does not parse.
fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(name)
        .map(|raw| {
            raw.parse::<T>()
                .with_context(|| format!("{} has an invalid value: {}", name, raw))
        })
        .transpose()
}

fn default_keypair_path(lookup: &impl Fn(&str) -> Option<String>) -> PathBuf {
    let home = lookup("HOME").unwrap_or_else(|| ".".to_string());
    PathBuf::from(home).join(".config/solana/id.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::ClusterNetwork;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_to_devnet_and_local_server() {
        let config = Config::from_lookup(lookup_from(&[("HOME", "/home/dev")])).unwrap();
        assert_eq!(config.cluster.network, ClusterNetwork::Devnet);
        assert_eq!(config.keypair_path, PathBuf::from("/home/dev/.config/solana/id.json"));
        assert_eq!(config.query_stale_time, DEFAULT_STALE_TIME);
        assert_eq!(config.notification_capacity, DEFAULT_TOAST_CAPACITY);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn rpc_url_overrides_the_cluster_endpoint() {
        let config = Config::from_lookup(lookup_from(&[
            ("CRUDDAPP_CLUSTER", "localnet"),
            ("SOLANA_RPC_URL", "http://10.0.0.5:8899"),
            ("QUERY_STALE_SECS", "5"),
            ("SERVER_PORT", "8080"),
        ]))
        .unwrap();
        assert_eq!(config.cluster.network, ClusterNetwork::Localnet);
        assert_eq!(config.cluster.endpoint, "http://10.0.0.5:8899");
        assert_eq!(config.query_stale_time, Duration::from_secs(5));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn malformed_numbers_are_errors() {
        for (name, value) in [
            ("QUERY_STALE_SECS", "soon"),
            ("NOTIFICATION_CAPACITY", "lots"),
            ("SERVER_PORT", "99999"),
        ] {
            let err = Config::from_lookup(lookup_from(&[(name, value)])).unwrap_err();
            assert!(err.to_string().contains(name), "{}", err);
        }
    }

    #[test]
    fn notification_capacity_is_read() {
        let config = Config::from_lookup(lookup_from(&[("NOTIFICATION_CAPACITY", "7")])).unwrap();
        assert_eq!(config.notification_capacity, 7);
    }
}
