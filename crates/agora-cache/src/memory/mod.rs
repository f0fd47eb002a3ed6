//! In-process counter store.

pub mod store;

pub use store::MemoryCounterStore;
