//! Persistence layer: durable key-value storage for the draft and session.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::{KeyValueStore, keys};
