use std::future::Future;
use std::sync::Arc;

use solana_sdk::{pubkey::Pubkey, signature::Signature};

use crate::cluster::ClusterConfig;
use crate::connection::NetworkContext;
use crate::data_access::account::AccountAccessor;
use crate::error::{CruddappError, EntryOperation, MutationFailure};
use crate::notify::Notifier;
use crate::onchain_instance::{CruddappProgramClient, RemoteProgramClient};
use crate::query::{QueryCache, QueryKey};
use crate::state_structs::{CreateEntryArgs, JournalEntry, ProgramAccountInfo};

/// Program-level access: the entry list, program account info and entry creation.
pub struct ProgramAccessor {
    ctx: NetworkContext,
    program_id: Pubkey,
    client: Arc<dyn RemoteProgramClient>,
    cache: Arc<QueryCache>,
    notifier: Arc<dyn Notifier>,
}

impl ProgramAccessor {
    /// Bind to the program resolved for `ctx.cluster`, talking through `ctx.connection`.
    pub fn new(ctx: NetworkContext, cache: Arc<QueryCache>, notifier: Arc<dyn Notifier>) -> Self {
        let client = Arc::new(CruddappProgramClient::new(&ctx));
        Self::with_client(ctx, client, cache, notifier)
    }

    pub fn with_client(
        ctx: NetworkContext,
        client: Arc<dyn RemoteProgramClient>,
        cache: Arc<QueryCache>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let program_id = client.program_id();
        tracing::debug!(
            "Program accessor bound to {} on {}",
            program_id,
            ctx.cluster.name
        );
        Self {
            ctx,
            program_id,
            client,
            cache,
            notifier,
        }
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    pub fn cluster(&self) -> &ClusterConfig {
        &self.ctx.cluster
    }

    pub fn context(&self) -> &NetworkContext {
        &self.ctx
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub(crate) fn client(&self) -> &Arc<dyn RemoteProgramClient> {
        &self.client
    }

    pub fn entries_key(&self) -> QueryKey {
        QueryKey::entries(self.cluster())
    }

    pub fn program_account_key(&self) -> QueryKey {
        QueryKey::program_account(self.cluster())
    }

    pub fn mutation_key(&self, operation: EntryOperation) -> QueryKey {
        QueryKey::mutation(operation.as_str(), self.cluster())
    }

    /// Accessor for a single entry, sharing this program's client, cache and notifier.
    pub fn account(self: &Arc<Self>, address: Pubkey) -> AccountAccessor {
        AccountAccessor::new(Arc::clone(self), address)
    }

    /// All journal entries held by the program.
    pub async fn list_entries(&self) -> Result<Vec<JournalEntry>, CruddappError> {
        self.cache
            .query(&self.entries_key(), || self.client.all_entries())
            .await
    }

    /// Metadata of the program account itself, `None` when it is not deployed.
    pub async fn fetch_program_account_info(
        &self,
    ) -> Result<Option<ProgramAccountInfo>, CruddappError> {
        let connection = &self.ctx.connection;
        let program_id = self.program_id;
        self.cache
            .query(&self.program_account_key(), || async move {
                let account = connection.account(&program_id).await?;
                Ok::<_, CruddappError>(account.as_ref().map(ProgramAccountInfo::from))
            })
            .await
    }

    /// Create a journal entry owned by the signing wallet.
    pub async fn create_entry(&self, args: CreateEntryArgs) -> Result<Signature, MutationFailure> {
        let signer = self.ctx.signer_pubkey();
        self.run_mutation(EntryOperation::Create, &[], async {
            if args.owner != signer {
                return Err(CruddappError::InvalidEntry(format!(
                    "owner {} is not the signing wallet {}",
                    args.owner, signer
                )));
            }
            self.client
                .create_journal_entry(&args.title, &args.message)
                .await
        })
        .await
    }

    /// Run one state-changing call through the mutation channel for `operation`.
    ///
    /// On success: confirmation notification, then the entry list and every key
    /// in `also_invalidate` are invalidated. On failure: error notification only.
    pub(crate) async fn run_mutation<Fut>(
        &self,
        operation: EntryOperation,
        also_invalidate: &[QueryKey],
        call: Fut,
    ) -> Result<Signature, MutationFailure>
    where
        Fut: Future<Output = Result<Signature, CruddappError>>,
    {
        let key = self.mutation_key(operation);
        let _pending = self.cache.begin_mutation(&key);

        match call.await {
            Ok(signature) => {
                tracing::info!("[{}] Confirmed {}", key, signature);
                self.notifier.transaction_sent(&signature, self.cluster());
                self.cache.invalidate(&self.entries_key());
                for extra in also_invalidate {
                    self.cache.invalidate(extra);
                }
                Ok(signature)
            }
            Err(e) => {
                let failure = MutationFailure::new(operation, e.to_string());
                tracing::warn!("[{}] {}", key, failure);
                self.notifier.error(&failure.to_string());
                Err(failure)
            }
        }
    }
}
