//! Error types for the data-access layer.

use std::fmt;

use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Failures raised by reads and by the remote program client.
#[derive(Debug, Error)]
pub enum CruddappError {
    #[error("RPC error: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    #[error("Account does not exist: {0}")]
    AccountNotFound(Pubkey),

    #[error("Failed to decode account {address}: {reason}")]
    Decode { address: Pubkey, reason: String },

    #[error("Invalid journal entry: {0}")]
    InvalidEntry(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Keypair error: {0}")]
    Keypair(String),
}

/// The state-changing operations a journal entry supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryOperation {
    Create,
    Update,
    Delete,
}

impl EntryOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryOperation::Create => "create",
            EntryOperation::Update => "update",
            EntryOperation::Delete => "delete",
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            EntryOperation::Create => "creating",
            EntryOperation::Update => "updating",
            EntryOperation::Delete => "deleting",
        }
    }
}

impl fmt::Display for EntryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a rejected mutation.
///
/// Remote failures are not classified: whatever the transport or the program
/// reported is kept verbatim in `message`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error {} journal entry: {message}", .operation.verb())]
pub struct MutationFailure {
    pub operation: EntryOperation,
    pub message: String,
}

impl MutationFailure {
    pub fn new(operation: EntryOperation, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}
