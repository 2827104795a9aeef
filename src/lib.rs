//! # Cruddapp Client
//!
//! Client-side data access for the journal-entry ("cruddapp") Anchor program.
//!
//! ## Architecture
//! - `cluster`: cluster selection and program id resolution
//! - `connection`: RPC connection seam and the `NetworkContext` handed to accessors
//! - `onchain_instance`: typed program client (instruction building, account decoding)
//! - `query`: keyed query cache with invalidation and mutation status
//! - `notify`: transaction / error notifications
//! - `data_access`: `ProgramAccessor` and `AccountAccessor`
//! - `routes` / `server`: JSON host exposing the accessors

use anchor_lang::prelude::*;

pub mod cluster;
pub mod config;
pub mod connection;
pub mod data_access;
pub mod error;
pub mod notify;
pub mod onchain_instance;
pub mod query;
pub mod routes;
pub mod server;
pub mod state_structs;

#[cfg(test)]
pub(crate) mod testing;

// Program id used on localnet, mainnet and custom clusters.
declare_id!("AsjZ3kWAUSQRNt2pZVeJkywhZ6gpLpHZmJjduPmKZDZZ");

pub use cluster::{ClusterConfig, ClusterNetwork, resolve_program_address};
pub use connection::{ChainConnection, NetworkContext, RpcConnection};
pub use data_access::{AccountAccessor, ProgramAccessor};
pub use error::{CruddappError, EntryOperation, MutationFailure};
pub use notify::{Notifier, Toast, ToastKind, ToastLog};
pub use onchain_instance::{CruddappProgramClient, RemoteProgramClient};
pub use query::{MutationStatus, QueryCache, QueryKey};
pub use state_structs::{CreateEntryArgs, JournalEntry, JournalEntryState, ProgramAccountInfo};
