// --- On-chain account structs matching the cruddapp Anchor program ---
use anchor_lang::prelude::*;
use serde::{Deserialize, Serialize};
use solana_sdk::account::Account;

/// Longest title the program accepts; the title is a PDA seed.
pub const MAX_TITLE_LEN: usize = 32;
/// Longest message the program accepts.
pub const MAX_MESSAGE_LEN: usize = 1000;

/// On-chain entry account, generated from `idls/cruddapp.json`.
pub use crate::onchain_instance::cruddapp::accounts::JournalEntryState;

/// Cached view of a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub public_key: String,
    pub owner: String,
    pub title: String,
    pub message: String,
}

impl JournalEntry {
    pub fn from_state(address: &Pubkey, state: JournalEntryState) -> Self {
        Self {
            public_key: address.to_string(),
            owner: state.owner.to_string(),
            title: state.title,
            message: state.message,
        }
    }
}

/// Input for create and update calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEntryArgs {
    pub title: String,
    pub message: String,
    pub owner: Pubkey,
}

impl CreateEntryArgs {
    pub fn new(title: impl Into<String>, message: impl Into<String>, owner: Pubkey) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            owner,
        }
    }
}

/// Decoded metadata of an on-chain account (the program account, usually).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramAccountInfo {
    pub lamports: u64,
    pub owner: String,
    pub executable: bool,
    pub data_len: usize,
    pub rent_epoch: u64,
}

impl From<&Account> for ProgramAccountInfo {
    fn from(account: &Account) -> Self {
        Self {
            lamports: account.lamports,
            owner: account.owner.to_string(),
            executable: account.executable,
            data_len: account.data.len(),
            rent_epoch: account.rent_epoch,
        }
    }
}

// --- Request structs ---
#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEntryRequest {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteEntryQuery {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct ProgramInfoResponse {
    pub program_id: String,
    pub cluster: String,
    pub account: Option<ProgramAccountInfo>,
}

#[derive(Debug, Serialize)]
pub struct TxResponse {
    pub success: bool,
    pub tx_signature: Option<String>,
    pub error: Option<String>,
}
