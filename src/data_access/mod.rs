//! # Data Access Module
//!
//! The two accessors the rest of the application calls:
//! - `ProgramAccessor`: entry list, program account info, create
//! - `AccountAccessor`: one entry's fetch, update and delete

pub mod account;
pub mod program;

pub use account::AccountAccessor;
pub use program::ProgramAccessor;
