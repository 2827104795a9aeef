use std::sync::Arc;

use solana_sdk::{pubkey::Pubkey, signature::Signature};

use crate::data_access::program::ProgramAccessor;
use crate::error::{CruddappError, EntryOperation, MutationFailure};
use crate::onchain_instance::entry_address;
use crate::query::QueryKey;
use crate::state_structs::JournalEntry;

/// Access to one known journal entry account.
pub struct AccountAccessor {
    program: Arc<ProgramAccessor>,
    account: Pubkey,
}

impl AccountAccessor {
    pub fn new(program: Arc<ProgramAccessor>, account: Pubkey) -> Self {
        Self { program, account }
    }

    pub fn address(&self) -> Pubkey {
        self.account
    }

    pub fn program(&self) -> &Arc<ProgramAccessor> {
        &self.program
    }

    pub fn entry_key(&self) -> QueryKey {
        QueryKey::entry(self.program.cluster(), &self.account.to_string())
    }

    pub async fn fetch_entry(&self) -> Result<JournalEntry, CruddappError> {
        let client = self.program.client();
        self.program
            .cache()
            .query(&self.entry_key(), || client.fetch_entry(&self.account))
            .await
    }

    pub async fn update_entry(&self, title: &str, message: &str) -> Result<Signature, MutationFailure> {
        let call = async {
            self.check_title(title)?;
            self.program.client().update_journal_entry(title, message).await
        };
        self.program
            .run_mutation(EntryOperation::Update, &[self.entry_key()], call)
            .await
    }

    pub async fn delete_entry(&self, title: &str) -> Result<Signature, MutationFailure> {
        let call = async {
            self.check_title(title)?;
            self.program.client().delete_journal_entry(title).await
        };
        self.program
            .run_mutation(EntryOperation::Delete, &[self.entry_key()], call)
            .await
    }

    // The program addresses entries by (title, signer); the title must lead back to this account.
    fn check_title(&self, title: &str) -> Result<(), CruddappError> {
        let owner = self.program.context().signer_pubkey();
        let expected = entry_address(title, &owner, &self.program.program_id())?;
        if expected != self.account {
            return Err(CruddappError::InvalidEntry(format!(
                "title '{}' of {} addresses {}, not {}",
                title, owner, expected, self.account
            )));
        }
        Ok(())
    }
}
