//! Profile persistence collaborator (contract + in-memory implementation).

mod contract;
mod in_memory;

pub use contract::{ProfileStore, StoreError};
pub use in_memory::InMemoryProfileStore;
