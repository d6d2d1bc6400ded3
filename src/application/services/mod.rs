//! Application services

pub mod projector;
pub mod tree;

pub use tree::{DeleteOutcome, MissingDeletePolicy, TreeService};
