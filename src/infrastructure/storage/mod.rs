//! [`FileStore`](crate::domain::ports::FileStore) implementations.

pub mod fs_store;
pub mod memory_store;

pub use fs_store::FsFileStore;
pub use memory_store::{InMemoryFileStore, StoreOp};
