//! Domain layer: entities and forest logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod doc;
pub mod error;
pub mod forest;
pub mod node;

pub use doc::NodeDoc;
pub use error::{DomainError, DomainResult};
pub use forest::Forest;
pub use node::{NewNode, NodeKind, NodeUpdate, TreeNode};
