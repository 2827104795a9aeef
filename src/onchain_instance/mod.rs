//! # Onchain Program Instance Module
//!
//! Typed access to the cruddapp program deployed on Solana.
//!
//! ## Features
//! - `RemoteProgramClient`: one method per program operation
//! - Instruction building from the `declare_program!` bindings in `idls/cruddapp.json`
//! - Entry address (PDA) derivation
//! - Decoding of `JournalEntryState` accounts

/// Cruddapp program client and instruction builders
pub mod instance;

pub use instance::{CruddappProgramClient, RemoteProgramClient, cruddapp, entry_address};
