use std::sync::Arc;

use anchor_lang::{AccountDeserialize, InstructionData, ToAccountMetas, declare_program, system_program};
use async_trait::async_trait;
use solana_sdk::{
    account::Account,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};

use crate::connection::{ChainConnection, NetworkContext};
use crate::error::CruddappError;
use crate::state_structs::{JournalEntry, JournalEntryState, MAX_MESSAGE_LEN, MAX_TITLE_LEN};

declare_program!(cruddapp);
use cruddapp::client::{accounts, args};

/// Typed calls into the cruddapp program, one per operation.
#[async_trait]
pub trait RemoteProgramClient: Send + Sync {
    fn program_id(&self) -> Pubkey;

    async fn create_journal_entry(
        &self,
        title: &str,
        message: &str,
    ) -> Result<Signature, CruddappError>;

    async fn update_journal_entry(
        &self,
        title: &str,
        message: &str,
    ) -> Result<Signature, CruddappError>;

    async fn delete_journal_entry(&self, title: &str) -> Result<Signature, CruddappError>;

    async fn all_entries(&self) -> Result<Vec<JournalEntry>, CruddappError>;

    async fn fetch_entry(&self, address: &Pubkey) -> Result<JournalEntry, CruddappError>;
}

pub fn validate_title(title: &str) -> Result<(), CruddappError> {
    if title.is_empty() {
        return Err(CruddappError::InvalidEntry("title must not be empty".to_string()));
    }
    if title.len() > MAX_TITLE_LEN {
        return Err(CruddappError::InvalidEntry(format!(
            "title is {} bytes, at most {} allowed",
            title.len(),
            MAX_TITLE_LEN
        )));
    }
    Ok(())
}

pub fn validate_message(message: &str) -> Result<(), CruddappError> {
    if message.len() > MAX_MESSAGE_LEN {
        return Err(CruddappError::InvalidEntry(format!(
            "message is {} bytes, at most {} allowed",
            message.len(),
            MAX_MESSAGE_LEN
        )));
    }
    Ok(())
}

/// Address of the entry `title` owned by `owner`: PDA over `[title, owner]`.
pub fn entry_address(
    title: &str,
    owner: &Pubkey,
    program_id: &Pubkey,
) -> Result<Pubkey, CruddappError> {
    validate_title(title)?;
    Pubkey::try_find_program_address(&[title.as_bytes(), owner.as_ref()], program_id)
        .map(|(address, _bump)| address)
        .ok_or_else(|| {
            CruddappError::InvalidEntry(format!("no entry address for title '{}'", title))
        })
}

/// Decode a `JournalEntryState` account.
pub fn decode_entry(address: &Pubkey, account: &Account) -> Result<JournalEntry, CruddappError> {
    let state = JournalEntryState::try_deserialize(&mut account.data.as_slice()).map_err(|e| {
        CruddappError::Decode {
            address: *address,
            reason: e.to_string(),
        }
    })?;
    Ok(JournalEntry::from_state(address, state))
}

/// Cruddapp program client for handling transactions
pub struct CruddappProgramClient {
    program_id: Pubkey,
    connection: Arc<dyn ChainConnection>,
    signer: Arc<Keypair>,
}

impl CruddappProgramClient {
    /// Create a client for the program resolved from the context's cluster
    pub fn new(ctx: &NetworkContext) -> Self {
        Self::with_program_id(ctx, ctx.program_id())
    }

    pub fn with_program_id(ctx: &NetworkContext, program_id: Pubkey) -> Self {
        Self {
            program_id,
            connection: ctx.connection.clone(),
            signer: ctx.signer.clone(),
        }
    }

    /// Entry and owner accounts for `title`, in the order every entry instruction expects.
    fn entry_accounts(&self, title: &str) -> Result<(Pubkey, Pubkey), CruddappError> {
        let owner = self.signer.pubkey();
        Ok((entry_address(title, &owner, &self.program_id)?, owner))
    }

    fn instruction(&self, metas: impl ToAccountMetas, data: impl InstructionData) -> Instruction {
        Instruction {
            program_id: self.program_id,
            accounts: metas.to_account_metas(None),
            data: data.data(),
        }
    }

    pub fn create_instruction(&self, title: &str, message: &str) -> Result<Instruction, CruddappError> {
        validate_message(message)?;
        let (journal_entry, owner) = self.entry_accounts(title)?;
        Ok(self.instruction(
            accounts::CreateJournalEntry {
                journal_entry,
                owner,
                system_program: system_program::ID,
            },
            args::CreateJournalEntry {
                title: title.to_string(),
                message: message.to_string(),
            },
        ))
    }

    pub fn update_instruction(&self, title: &str, message: &str) -> Result<Instruction, CruddappError> {
        validate_message(message)?;
        let (journal_entry, owner) = self.entry_accounts(title)?;
        Ok(self.instruction(
            accounts::UpdateJournalEntry {
                journal_entry,
                owner,
                system_program: system_program::ID,
            },
            args::UpdateJournalEntry {
                title: title.to_string(),
                message: message.to_string(),
            },
        ))
    }

    pub fn delete_instruction(&self, title: &str) -> Result<Instruction, CruddappError> {
        let (journal_entry, owner) = self.entry_accounts(title)?;
        Ok(self.instruction(
            accounts::DeleteJournalEntry {
                journal_entry,
                owner,
                system_program: system_program::ID,
            },
            args::DeleteJournalEntry {
                title: title.to_string(),
            },
        ))
    }

    async fn submit(&self, instruction: Instruction) -> Result<Signature, CruddappError> {
        self.connection
            .send_instructions(&[instruction], &self.signer)
            .await
    }
}

#[async_trait]
impl RemoteProgramClient for CruddappProgramClient {
    fn program_id(&self) -> Pubkey {
        self.program_id
    }

    async fn create_journal_entry(
        &self,
        title: &str,
        message: &str,
    ) -> Result<Signature, CruddappError> {
        let instruction = self.create_instruction(title, message)?;
        tracing::debug!("[create_journal_entry] Submitting entry '{}'", title);
        self.submit(instruction).await
    }

    async fn update_journal_entry(
        &self,
        title: &str,
        message: &str,
    ) -> Result<Signature, CruddappError> {
        let instruction = self.update_instruction(title, message)?;
        tracing::debug!("[update_journal_entry] Submitting entry '{}'", title);
        self.submit(instruction).await
    }

    async fn delete_journal_entry(&self, title: &str) -> Result<Signature, CruddappError> {
        let instruction = self.delete_instruction(title)?;
        tracing::debug!("[delete_journal_entry] Submitting entry '{}'", title);
        self.submit(instruction).await
    }

    async fn all_entries(&self) -> Result<Vec<JournalEntry>, CruddappError> {
        let accounts = self.connection.program_accounts(&self.program_id).await?;
        let total = accounts.len();
        let entries: Vec<JournalEntry> = accounts
            .iter()
            .filter_map(|(address, account)| match decode_entry(address, account) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!("[all_entries] Skipping account: {}", e);
                    None
                }
            })
            .collect();
        tracing::debug!(
            "[all_entries] Decoded {}/{} program accounts",
            entries.len(),
            total
        );
        Ok(entries)
    }

    async fn fetch_entry(&self, address: &Pubkey) -> Result<JournalEntry, CruddappError> {
        let account = self
            .connection
            .account(address)
            .await?
            .ok_or(CruddappError::AccountNotFound(*address))?;
        decode_entry(address, &account)
    }
}
