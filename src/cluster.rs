//! Cluster selection and program id resolution.

use std::fmt;
use std::str::FromStr;

use anchor_client::Cluster;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

/// Program id deployed on devnet and testnet.
pub const CRUDDAPP_DEVNET_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("CJKhQ1zukJXjBtsoe138EYishVsehzyFbTmnFKzTov8w");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClusterNetwork {
    #[serde(rename = "mainnet-beta")]
    Mainnet,
    Testnet,
    Devnet,
    Localnet,
    Custom,
}

impl ClusterNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterNetwork::Mainnet => "mainnet-beta",
            ClusterNetwork::Testnet => "testnet",
            ClusterNetwork::Devnet => "devnet",
            ClusterNetwork::Localnet => "localnet",
            ClusterNetwork::Custom => "custom",
        }
    }
}

impl fmt::Display for ClusterNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Program id for the given network.
pub fn resolve_program_address(network: ClusterNetwork) -> Pubkey {
    match network {
        ClusterNetwork::Devnet | ClusterNetwork::Testnet => CRUDDAPP_DEVNET_PROGRAM_ID,
        ClusterNetwork::Mainnet | ClusterNetwork::Localnet | ClusterNetwork::Custom => crate::ID,
    }
}

/// The currently selected cluster.
///
/// Two configs that differ in any field are different clusters as far as the
/// query cache is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub name: String,
    pub network: ClusterNetwork,
    pub endpoint: String,
}

impl ClusterConfig {
    pub fn new(name: impl Into<String>, network: ClusterNetwork, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            network,
            endpoint: endpoint.into(),
        }
    }

    /// Build a config from a moniker (`devnet`, `mainnet`, `localnet`, ...) or an RPC url.
    pub fn from_moniker(moniker: &str) -> anyhow::Result<Self> {
        let cluster = Cluster::from_str(moniker)?;
        let network = match &cluster {
            Cluster::Mainnet => ClusterNetwork::Mainnet,
            Cluster::Testnet => ClusterNetwork::Testnet,
            Cluster::Devnet => ClusterNetwork::Devnet,
            Cluster::Localnet | Cluster::Debug => ClusterNetwork::Localnet,
            _ => ClusterNetwork::Custom,
        };
        let name = match network {
            ClusterNetwork::Custom => "custom".to_string(),
            _ => network.as_str().to_string(),
        };
        Ok(Self::new(name, network, cluster.url()))
    }

    pub fn devnet() -> Self {
        Self::new("devnet", ClusterNetwork::Devnet, Cluster::Devnet.url())
    }

    pub fn localnet() -> Self {
        Self::new("localnet", ClusterNetwork::Localnet, Cluster::Localnet.url())
    }

    /// Replace the RPC endpoint, keeping name and network.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn program_id(&self) -> Pubkey {
        resolve_program_address(self.network)
    }

    /// Solana explorer link for a transaction signature on this cluster.
    pub fn explorer_url(&self, signature: &str) -> String {
        let base = format!("https://explorer.solana.com/tx/{}", signature);
        match self.network {
            ClusterNetwork::Mainnet => base,
            ClusterNetwork::Testnet | ClusterNetwork::Devnet => {
                format!("{}?cluster={}", base, self.network)
            }
            ClusterNetwork::Localnet | ClusterNetwork::Custom => {
                format!("{}?cluster=custom&customUrl={}", base, self.endpoint)
            }
        }
    }

    /// Stable identifier used in cache keys.
    pub fn cache_id(&self) -> String {
        format!("{}:{}:{}", self.name, self.network, self.endpoint)
    }
}
