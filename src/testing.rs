//! Test doubles shared by the unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use solana_sdk::{
    account::Account,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
};

use crate::cluster::ClusterConfig;
use crate::connection::{ChainConnection, NetworkContext};
use crate::data_access::ProgramAccessor;
use crate::error::CruddappError;
use crate::notify::{Notifier, ToastLog};
use crate::onchain_instance::RemoteProgramClient;
use crate::query::QueryCache;
use crate::state_structs::JournalEntry;

/// Connection with no accounts that confirms every transaction.
pub struct OfflineConnection;

#[async_trait]
impl ChainConnection for OfflineConnection {
    async fn account(&self, _address: &Pubkey) -> Result<Option<Account>, CruddappError> {
        Ok(None)
    }

    async fn program_accounts(
        &self,
        _program_id: &Pubkey,
    ) -> Result<Vec<(Pubkey, Account)>, CruddappError> {
        Ok(Vec::new())
    }

    async fn send_instructions(
        &self,
        _instructions: &[Instruction],
        _signer: &Keypair,
    ) -> Result<Signature, CruddappError> {
        Ok(Signature::new_unique())
    }
}

/// Program client whose outcomes are scripted by the test.
#[derive(Default)]
pub struct ScriptedClient {
    pub reject_with: Mutex<Option<String>>,
    pub entries: Mutex<Vec<JournalEntry>>,
    pub list_calls: AtomicUsize,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn outcome(&self, call: String) -> Result<Signature, CruddappError> {
        self.calls.lock().push(call);
        match self.reject_with.lock().clone() {
            Some(message) => Err(CruddappError::InvalidEntry(message)),
            None => Ok(Signature::new_unique()),
        }
    }
}

#[async_trait]
impl RemoteProgramClient for ScriptedClient {
    fn program_id(&self) -> Pubkey {
        crate::ID
    }

    async fn create_journal_entry(
        &self,
        title: &str,
        message: &str,
    ) -> Result<Signature, CruddappError> {
        self.outcome(format!("create {} {}", title, message))
    }

    async fn update_journal_entry(
        &self,
        title: &str,
        message: &str,
    ) -> Result<Signature, CruddappError> {
        self.outcome(format!("update {} {}", title, message))
    }

    async fn delete_journal_entry(&self, title: &str) -> Result<Signature, CruddappError> {
        self.outcome(format!("delete {}", title))
    }

    async fn all_entries(&self) -> Result<Vec<JournalEntry>, CruddappError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.lock().clone())
    }

    async fn fetch_entry(&self, address: &Pubkey) -> Result<JournalEntry, CruddappError> {
        let wanted = address.to_string();
        self.entries
            .lock()
            .iter()
            .find(|entry| entry.public_key == wanted)
            .cloned()
            .ok_or(CruddappError::AccountNotFound(*address))
    }
}

pub struct Harness {
    pub program: Arc<ProgramAccessor>,
    pub client: Arc<ScriptedClient>,
    pub toasts: Arc<ToastLog>,
    pub signer: Arc<Keypair>,
}

pub fn harness() -> Harness {
    let signer = Arc::new(Keypair::new());
    let ctx = NetworkContext::new(
        ClusterConfig::localnet(),
        Arc::new(OfflineConnection),
        signer.clone(),
    );
    let client = Arc::new(ScriptedClient::default());
    let toasts = Arc::new(ToastLog::default());
    let program = Arc::new(ProgramAccessor::with_client(
        ctx,
        client.clone(),
        Arc::new(QueryCache::default()),
        toasts.clone() as Arc<dyn Notifier>,
    ));
    Harness {
        program,
        client,
        toasts,
        signer,
    }
}
