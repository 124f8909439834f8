//! Toolkit storage adapters.

pub mod memory;

pub use memory::InMemoryToolkitStore;
