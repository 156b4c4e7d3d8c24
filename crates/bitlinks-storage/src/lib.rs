//! Durable and in-memory backends for the [`LinkCache`] contract.

pub mod memory;
pub mod tsv;

pub use bitlinks_core::{CacheError, CacheRecord, LinkCache};
pub use memory::InMemoryLinkStore;
pub use tsv::TsvLinkStore;
