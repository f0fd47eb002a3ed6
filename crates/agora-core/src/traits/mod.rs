//! Core traits defined in `agora-core` and implemented by other crates.

pub mod counter;

pub use counter::{CounterStore, WindowHit};
