//! The record store, its balance ledger, and the bootstrap dataset.

pub mod balances;
pub mod bootstrap;
pub mod record_store;

pub use bootstrap::sample_store;
pub use record_store::{Collection, RecordStore, TeacherIndex};
