//! sitetree: admin site-tree manager
//!
//! Manages the hierarchical "site trees" of an e-commerce admin back
//! office — navigation menus and knowledgebase category/article
//! hierarchies — as an id-addressed forest with whole-root persistence.
//!
//! Layers:
//! - `domain`: node entities and the arena-based forest (locate/mutate)
//! - `application`: load–mutate–save orchestration and presentation
//!   projection
//! - `infrastructure`: the site-tree store boundary and implementations
//! - `cli`: command surface

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
