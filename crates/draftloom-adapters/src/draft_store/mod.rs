//! Draft persistence adapters.

pub mod fs;
pub mod memory;

pub use fs::FsDraftStore;
pub use memory::MemoryDraftStore;
