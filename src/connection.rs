//! Connection to a Solana RPC node and the context handed to accessors.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer, read_keypair_file},
    transaction::Transaction,
};

use crate::cluster::ClusterConfig;
use crate::error::CruddappError;

/// The chain operations the data-access layer needs from a node.
#[async_trait]
pub trait ChainConnection: Send + Sync {
    /// Fetch an account, `None` when it does not exist.
    async fn account(&self, address: &Pubkey) -> Result<Option<Account>, CruddappError>;

    /// All accounts owned by `program_id`.
    async fn program_accounts(
        &self,
        program_id: &Pubkey,
    ) -> Result<Vec<(Pubkey, Account)>, CruddappError>;

    /// Sign with `signer` (also the fee payer), submit and wait for confirmation.
    async fn send_instructions(
        &self,
        instructions: &[Instruction],
        signer: &Keypair,
    ) -> Result<Signature, CruddappError>;
}

/// `ChainConnection` over the nonblocking RPC client.
pub struct RpcConnection {
    rpc_client: RpcClient,
}

impl RpcConnection {
    pub fn new(cluster: &ClusterConfig) -> Self {
        Self::with_commitment(cluster, CommitmentConfig::confirmed())
    }

    pub fn with_commitment(cluster: &ClusterConfig, commitment: CommitmentConfig) -> Self {
        Self {
            rpc_client: RpcClient::new_with_commitment(cluster.endpoint.clone(), commitment),
        }
    }
}

#[async_trait]
impl ChainConnection for RpcConnection {
    async fn account(&self, address: &Pubkey) -> Result<Option<Account>, CruddappError> {
        let response = self
            .rpc_client
            .get_account_with_commitment(address, self.rpc_client.commitment())
            .await?;
        Ok(response.value)
    }

    async fn program_accounts(
        &self,
        program_id: &Pubkey,
    ) -> Result<Vec<(Pubkey, Account)>, CruddappError> {
        Ok(self.rpc_client.get_program_accounts(program_id).await?)
    }

    async fn send_instructions(
        &self,
        instructions: &[Instruction],
        signer: &Keypair,
    ) -> Result<Signature, CruddappError> {
        let blockhash = self.rpc_client.get_latest_blockhash().await?;
        let transaction = Transaction::new_signed_with_payer(
            instructions,
            Some(&signer.pubkey()),
            &[signer],
            blockhash,
        );

        let signature = self
            .rpc_client
            .send_and_confirm_transaction(&transaction)
            .await?;
        tracing::debug!("Confirmed transaction {}", signature);
        Ok(signature)
    }
}

/// Network, connection and signing context for one cluster.
#[derive(Clone)]
pub struct NetworkContext {
    pub cluster: ClusterConfig,
    pub connection: Arc<dyn ChainConnection>,
    pub signer: Arc<Keypair>,
}

impl NetworkContext {
    pub fn new(
        cluster: ClusterConfig,
        connection: Arc<dyn ChainConnection>,
        signer: Arc<Keypair>,
    ) -> Self {
        Self {
            cluster,
            connection,
            signer,
        }
    }

    /// Context backed by an RPC connection to `cluster.endpoint`.
    pub fn connect(cluster: ClusterConfig, signer: Arc<Keypair>) -> Self {
        let connection = Arc::new(RpcConnection::new(&cluster));
        Self::new(cluster, connection, signer)
    }

    pub fn signer_pubkey(&self) -> Pubkey {
        self.signer.pubkey()
    }

    pub fn program_id(&self) -> Pubkey {
        self.cluster.program_id()
    }
}

/// Read a keypair file in the Solana CLI JSON format.
pub fn load_keypair(path: &Path) -> Result<Keypair, CruddappError> {
    read_keypair_file(path)
        .map_err(|e| CruddappError::Keypair(format!("{}: {}", path.display(), e)))
}
