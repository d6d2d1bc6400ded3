//! Site-tree mutation service
//!
//! Orchestrates the load–mutate–save cycle against the store: every
//! operation loads the forest fresh, locates the owning root, applies the
//! mutation, and persists that whole root subtree back. The owning root is
//! the explicit transaction boundary; there are no cross-root transactions
//! and concurrent edits are last-write-wins per root.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{DomainError, Forest, NewNode, NodeUpdate, TreeNode};
use crate::infrastructure::traits::SiteTreeStore;

/// What to do when a delete targets an id that no longer exists.
///
/// The admin UI routinely holds stale ids (another session may have
/// deleted the node already), so tolerating them is the default; `Error`
/// surfaces the miss instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingDeletePolicy {
    /// Silent no-op, logged at warn level
    #[default]
    Ignore,
    /// Surface `NodeNotFound`
    Error,
}

/// Result of a delete operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The id named a root; the whole root record was removed
    RootDeleted { id: String, removed: usize },
    /// The node was detached from its parent and the owning root re-saved
    Detached {
        id: String,
        parent_id: String,
        removed: usize,
    },
    /// The id matched nothing and the policy tolerated it
    NotFound { id: String },
}

/// Service applying create/update/delete to located forest positions.
pub struct TreeService {
    store: Arc<dyn SiteTreeStore>,
    missing_delete: MissingDeletePolicy,
}

impl TreeService {
    pub fn new(store: Arc<dyn SiteTreeStore>, missing_delete: MissingDeletePolicy) -> Self {
        Self {
            store,
            missing_delete,
        }
    }

    /// Load the full forest from the store.
    pub fn load(&self) -> ApplicationResult<Forest> {
        let docs = self
            .store
            .load_forest()
            .map_err(|e| ApplicationError::store("load forest", e))?;
        Ok(Forest::from_docs(&docs)?)
    }

    /// Insert a new node under `parent_id`, or as a new root when no
    /// parent is given. Persists the owning root subtree and returns the
    /// created node.
    #[instrument(level = "debug", skip(self, new))]
    pub fn insert(&self, parent_id: Option<&str>, new: NewNode) -> ApplicationResult<TreeNode> {
        if new.name.trim().is_empty() {
            return Err(ApplicationError::invalid("name", "must not be empty"));
        }
        if let Some(id) = &new.id {
            if id.trim().is_empty() {
                return Err(ApplicationError::invalid("id", "must not be empty"));
            }
            // Ids double as store file names
            if id.contains(['/', '\\']) {
                return Err(ApplicationError::invalid(
                    "id",
                    "must not contain path separators",
                ));
            }
            if id == "." || id == ".." {
                return Err(ApplicationError::invalid("id", "reserved name"));
            }
        }
        let parent_id = parent_id.filter(|p| !p.is_empty());

        let mut forest = self.load()?;
        let node = new.into_node(None, Utc::now());
        let node = forest.insert(parent_id, node)?.clone();

        let root_id = match parent_id {
            // A new root is persisted directly as its own record
            None => node.id.clone(),
            Some(parent) => self.owning_root_id(&forest, parent)?,
        };
        self.save_root(&forest, &root_id)?;
        debug!(id = %node.id, root = %root_id, "inserted node");
        Ok(node)
    }

    /// Apply field updates in place to the node with the given id, then
    /// persist its owning root subtree.
    #[instrument(level = "debug", skip(self, update))]
    pub fn update(&self, id: &str, update: NodeUpdate) -> ApplicationResult<TreeNode> {
        if id.trim().is_empty() {
            return Err(ApplicationError::invalid("id", "must not be empty"));
        }
        if matches!(&update.name, Some(name) if name.trim().is_empty()) {
            return Err(ApplicationError::invalid("name", "must not be empty"));
        }

        let mut forest = self.load()?;
        let root_id = self.owning_root_id(&forest, id)?;

        let node = forest
            .find_node_mut(id)
            .ok_or_else(|| DomainError::NodeNotFound(id.to_string()))?;
        if update.apply(node) {
            node.updated_at = Utc::now();
        }
        let node = node.clone();

        self.save_root(&forest, &root_id)?;
        debug!(id = %node.id, root = %root_id, "updated node");
        Ok(node)
    }

    /// Delete the node with the given id and its whole subtree.
    ///
    /// Root ids remove the whole root record; nested ids are detached from
    /// their parent and the owning root is re-saved. Unknown ids follow
    /// the configured `MissingDeletePolicy`.
    pub fn delete(&self, id: &str) -> ApplicationResult<DeleteOutcome> {
        self.delete_with_policy(id, self.missing_delete)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn delete_with_policy(
        &self,
        id: &str,
        policy: MissingDeletePolicy,
    ) -> ApplicationResult<DeleteOutcome> {
        if id.trim().is_empty() {
            return Err(ApplicationError::invalid("id", "must not be empty"));
        }

        let mut forest = self.load()?;
        let Some(root) = forest.find_root(id) else {
            return match policy {
                MissingDeletePolicy::Ignore => {
                    warn!(id, "delete target not found, ignoring");
                    Ok(DeleteOutcome::NotFound { id: id.to_string() })
                }
                MissingDeletePolicy::Error => {
                    Err(DomainError::NodeNotFound(id.to_string()).into())
                }
            };
        };

        if root.id == id {
            let removed = forest.descendant_ids(id).len();
            self.store
                .delete_root(id)
                .map_err(|e| ApplicationError::store(format!("delete root {id}"), e))?;
            debug!(id, removed, "deleted root record");
            return Ok(DeleteOutcome::RootDeleted {
                id: id.to_string(),
                removed,
            });
        }

        let root_id = root.id.clone();
        // A nested node always has a parent distinct from itself
        let parent_id = forest
            .find_parent(id)
            .map(|p| p.id.clone())
            .ok_or_else(|| DomainError::NodeNotFound(id.to_string()))?;
        let removed = forest.remove(id)?.len();
        self.save_root(&forest, &root_id)?;
        debug!(id, root = %root_id, removed, "detached subtree");
        Ok(DeleteOutcome::Detached {
            id: id.to_string(),
            parent_id,
            removed,
        })
    }

    fn owning_root_id(&self, forest: &Forest, id: &str) -> ApplicationResult<String> {
        forest
            .find_root(id)
            .map(|root| root.id.clone())
            .ok_or_else(|| DomainError::NodeNotFound(id.to_string()).into())
    }

    fn save_root(&self, forest: &Forest, root_id: &str) -> ApplicationResult<()> {
        let doc = forest
            .to_doc(root_id)
            .ok_or_else(|| DomainError::NodeNotFound(root_id.to_string()))?;
        self.store
            .save_root(&doc)
            .map_err(|e| ApplicationError::store(format!("save root {root_id}"), e))
    }
}
