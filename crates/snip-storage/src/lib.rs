//! Store implementations for the Snip URL shortener.

pub mod memory;

pub use memory::{InMemoryStore, SavePolicy};
pub use snip_core::{ReadStore, Store};
