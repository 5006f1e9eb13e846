//! Backing board store implementations.

mod memory;

pub use memory::InMemoryBoard;
