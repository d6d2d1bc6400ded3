//! Persistence boundary for site trees
//!
//! The store addresses whole root subtrees: it loads the complete forest,
//! upserts one root document at a time, and deletes roots wholesale. No
//! node is individually addressable in storage.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use crate::domain::NodeDoc;

/// Errors raised by a site-tree store.
///
/// These propagate to callers unmodified; no retry, no compensation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed root document {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("cannot serialize root document {root_id}: {message}")]
    Serialize { root_id: String, message: String },

    #[error("root id not usable as a file name: {root_id}")]
    UnsafeId { root_id: String },
}

impl StoreError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Whole-root persistence for a site forest.
pub trait SiteTreeStore: Send + Sync {
    /// Load every root document, fully materialized, in stable order.
    fn load_forest(&self) -> StoreResult<Vec<NodeDoc>>;

    /// Idempotent full-document upsert of one root subtree.
    fn save_root(&self, root: &NodeDoc) -> StoreResult<()>;

    /// Remove a root subtree entirely. Deleting an absent root is not an
    /// error.
    fn delete_root(&self, root_id: &str) -> StoreResult<()>;
}

// ============================================================
// IN-MEMORY IMPLEMENTATION
// ============================================================

/// In-process store keeping root documents in an ordered map.
///
/// The store services are tested against; also usable as an embedded
/// store when no persistence is wanted.
#[derive(Debug, Default)]
pub struct MemoryTreeStore {
    docs: Mutex<BTreeMap<String, NodeDoc>>,
}

impl MemoryTreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with root documents.
    pub fn with_docs(docs: Vec<NodeDoc>) -> Self {
        let store = Self::new();
        {
            let mut guard = store.docs.lock().unwrap_or_else(PoisonError::into_inner);
            for doc in docs {
                guard.insert(doc.id.clone(), doc);
            }
        }
        store
    }

    /// Number of root documents currently held.
    pub fn root_count(&self) -> usize {
        self.docs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl SiteTreeStore for MemoryTreeStore {
    fn load_forest(&self) -> StoreResult<Vec<NodeDoc>> {
        let guard = self.docs.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.values().cloned().collect())
    }

    fn save_root(&self, root: &NodeDoc) -> StoreResult<()> {
        let mut guard = self.docs.lock().unwrap_or_else(PoisonError::into_inner);
        guard.insert(root.id.clone(), root.clone());
        Ok(())
    }

    fn delete_root(&self, root_id: &str) -> StoreResult<()> {
        let mut guard = self.docs.lock().unwrap_or_else(PoisonError::into_inner);
        guard.remove(root_id);
        Ok(())
    }
}
