//! Infrastructure layer: store implementations and DI container
//!
//! This layer implements the persistence boundary and wires up services.

pub mod di;
pub mod error;
pub mod file_store;
pub mod traits;

pub use error::{InfraError, InfraResult};
pub use file_store::FileTreeStore;
pub use traits::{MemoryTreeStore, SiteTreeStore, StoreError, StoreResult};
