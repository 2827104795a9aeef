//! Query keys and the query cache.

pub mod cache;
pub mod key;

pub use cache::{DEFAULT_STALE_TIME, MutationGuard, MutationStatus, QueryCache};
pub use key::QueryKey;
