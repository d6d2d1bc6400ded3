//! Arena-based forest for site-tree hierarchies.
//!
//! Nodes are kept in an arena keyed by their own id, with explicit id-based
//! parent pointers. Lookups are O(1) map hits instead of recursive scans,
//! and cycles are structurally impossible: children lists are only touched
//! through the arena APIs, and the nested document format a forest is built
//! from cannot express a back-edge.

use std::collections::HashMap;

use tracing::instrument;

use crate::domain::doc::NodeDoc;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::TreeNode;

/// A set of independent root-rooted trees.
///
/// Each root subtree is the unit of persistence: mutations report the
/// owning root so callers can re-save exactly one whole document.
#[derive(Debug, Default, Clone)]
pub struct Forest {
    /// Arena storage, keyed by node id
    nodes: HashMap<String, TreeNode>,
    /// Root ids in load/insertion order
    roots: Vec<String>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a forest from fully materialized root documents.
    ///
    /// Rejects duplicate ids anywhere in the input instead of letting a
    /// later node shadow an earlier one.
    #[instrument(level = "debug", skip(docs), fields(roots = docs.len()))]
    pub fn from_docs(docs: &[NodeDoc]) -> DomainResult<Self> {
        let mut forest = Self::new();
        for doc in docs {
            forest.absorb_doc(doc, None)?;
        }
        Ok(forest)
    }

    fn absorb_doc(&mut self, doc: &NodeDoc, parent: Option<&str>) -> DomainResult<()> {
        if doc.id.is_empty() {
            return Err(DomainError::EmptyId);
        }
        if self.nodes.contains_key(&doc.id) {
            return Err(DomainError::DuplicateId(doc.id.clone()));
        }
        let node = doc.to_node(parent.map(str::to_owned));
        if parent.is_none() {
            self.roots.push(node.id.clone());
        }
        self.nodes.insert(node.id.clone(), node);
        for child in &doc.children {
            self.absorb_doc(child, Some(&doc.id))?;
        }
        Ok(())
    }

    /// Project one root subtree back into its nested document form.
    ///
    /// Returns None when `root_id` is unknown or not a root.
    #[instrument(level = "trace", skip(self))]
    pub fn to_doc(&self, root_id: &str) -> Option<NodeDoc> {
        let root = self.find_node(root_id)?;
        if !root.is_root() {
            return None;
        }
        Some(self.node_to_doc(root))
    }

    fn node_to_doc(&self, node: &TreeNode) -> NodeDoc {
        let mut doc = NodeDoc::from_node(node);
        doc.children = node
            .children
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .map(|child| self.node_to_doc(child))
            .collect();
        doc
    }

    // ============================================================
    // Locator operations
    // ============================================================

    /// Look up a node by id. Absence is a valid, non-exceptional outcome:
    /// callers may hold stale ids referring to already-deleted nodes.
    pub fn find_node(&self, id: &str) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub fn find_node_mut(&mut self, id: &str) -> Option<&mut TreeNode> {
        self.nodes.get_mut(id)
    }

    /// The owning entry of a node: its parent, or the node itself when it
    /// is a root. Roots count as their own owning entry so that deletion
    /// can treat "remove from owner" uniformly.
    #[instrument(level = "trace", skip(self))]
    pub fn find_parent(&self, id: &str) -> Option<&TreeNode> {
        let node = self.nodes.get(id)?;
        match &node.parent {
            Some(parent_id) => self.nodes.get(parent_id),
            None => Some(node),
        }
    }

    /// The top-level ancestor of a node (the node itself for roots).
    ///
    /// Identifies which root subtree must be re-saved after a mutation.
    #[instrument(level = "trace", skip(self))]
    pub fn find_root(&self, id: &str) -> Option<&TreeNode> {
        let mut current = self.nodes.get(id)?;
        while let Some(parent_id) = &current.parent {
            current = self.nodes.get(parent_id)?;
        }
        Some(current)
    }

    /// Ids of a node and all its descendants, pre-order.
    #[instrument(level = "trace", skip(self))]
    pub fn descendant_ids(&self, id: &str) -> Vec<String> {
        let mut ids = Vec::new();
        if self.nodes.contains_key(id) {
            self.collect_descendants(id, &mut ids);
        }
        ids
    }

    fn collect_descendants(&self, id: &str, ids: &mut Vec<String>) {
        ids.push(id.to_string());
        if let Some(node) = self.nodes.get(id) {
            for child in &node.children {
                self.collect_descendants(child, ids);
            }
        }
    }

    /// Number of ancestors between a node and its root (0 for roots).
    pub fn depth_of(&self, id: &str) -> Option<usize> {
        let mut depth = 0;
        let mut current = self.nodes.get(id)?;
        while let Some(parent_id) = &current.parent {
            current = self.nodes.get(parent_id)?;
            depth += 1;
        }
        Some(depth)
    }

    /// Root nodes in load/insertion order.
    pub fn roots(&self) -> impl Iterator<Item = &TreeNode> {
        self.roots.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Direct children of a node, insertion order.
    pub fn children_of(&self, id: &str) -> Vec<&TreeNode> {
        self.nodes
            .get(id)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|child| self.nodes.get(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Maximum node count of any ancestor chain (1 for a bare root).
    pub fn depth(&self) -> usize {
        self.nodes
            .keys()
            .filter_map(|id| self.depth_of(id))
            .max()
            .map(|d| d + 1)
            .unwrap_or(0)
    }

    // ============================================================
    // Mutator operations
    // ============================================================

    /// Insert a node under the given parent, or as a new root when no
    /// parent is given. The node's parent pointer is set here; any value
    /// carried on `node` is ignored.
    #[instrument(level = "debug", skip(self, node), fields(id = %node.id))]
    pub fn insert(&mut self, parent: Option<&str>, mut node: TreeNode) -> DomainResult<&TreeNode> {
        if node.id.is_empty() {
            return Err(DomainError::EmptyId);
        }
        if self.nodes.contains_key(&node.id) {
            return Err(DomainError::DuplicateId(node.id.clone()));
        }

        match parent {
            Some(parent_id) => {
                let parent_node = self
                    .nodes
                    .get_mut(parent_id)
                    .ok_or_else(|| DomainError::ParentNotFound(parent_id.to_string()))?;
                parent_node.children.push(node.id.clone());
                node.parent = Some(parent_id.to_string());
            }
            None => {
                node.parent = None;
                self.roots.push(node.id.clone());
            }
        }

        let id = node.id.clone();
        self.nodes.insert(id.clone(), node);
        Ok(&self.nodes[&id])
    }

    /// Remove a node and its whole subtree.
    ///
    /// Detaches the node from its owner (parent's children list, or the
    /// root list) and drops all descendants from the arena. Returns the
    /// removed ids, pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, id: &str) -> DomainResult<Vec<String>> {
        let removed = self.descendant_ids(id);
        if removed.is_empty() {
            return Err(DomainError::NodeNotFound(id.to_string()));
        }

        let parent = self.nodes[id].parent.clone();
        match parent {
            Some(parent_id) => {
                if let Some(parent_node) = self.nodes.get_mut(&parent_id) {
                    parent_node.children.retain(|child| child != id);
                }
            }
            None => self.roots.retain(|root| root != id),
        }

        for node_id in &removed {
            self.nodes.remove(node_id);
        }
        Ok(removed)
    }

    /// Pre-order traversal over the whole forest as `(depth, node)` pairs.
    ///
    /// Siblings (and roots) are visited by ascending `display_order`,
    /// stable with respect to insertion order.
    pub fn iter(&self) -> ForestIter<'_> {
        ForestIter::new(self)
    }

    fn sorted_ids<'a, I>(&self, ids: I) -> Vec<&'a str>
    where
        I: Iterator<Item = &'a String>,
    {
        let mut ids: Vec<&str> = ids.map(String::as_str).collect();
        ids.sort_by_key(|id| self.nodes.get(*id).map(|n| n.display_order).unwrap_or(0));
        ids
    }
}

pub struct ForestIter<'a> {
    forest: &'a Forest,
    stack: Vec<(&'a str, usize)>,
}

impl<'a> ForestIter<'a> {
    fn new(forest: &'a Forest) -> Self {
        let mut stack = Vec::new();
        // Push in reverse so the lowest display_order pops first
        for id in forest.sorted_ids(forest.roots.iter()).into_iter().rev() {
            stack.push((id, 0));
        }
        Self { forest, stack }
    }
}

impl<'a> Iterator for ForestIter<'a> {
    type Item = (usize, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, depth)) = self.stack.pop() {
            if let Some(node) = self.forest.nodes.get(id) {
                for child in self
                    .forest
                    .sorted_ids(node.children.iter())
                    .into_iter()
                    .rev()
                {
                    self.stack.push((child, depth + 1));
                }
                return Some((depth, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::node::NewNode;
    use chrono::Utc;

    fn node(id: &str) -> TreeNode {
        let mut new = NewNode::named(id.to_uppercase());
        new.id = Some(id.to_string());
        new.into_node(None, Utc::now())
    }

    #[test]
    fn duplicate_id_in_documents_is_rejected() {
        let mut forest = Forest::new();
        forest.insert(None, node("a")).unwrap();
        let err = forest.insert(None, node("a")).unwrap_err();
        assert_eq!(err, DomainError::DuplicateId("a".to_string()));
    }

    #[test]
    fn find_root_walks_parent_pointers() {
        let mut forest = Forest::new();
        forest.insert(None, node("a")).unwrap();
        forest.insert(Some("a"), node("b")).unwrap();
        forest.insert(Some("b"), node("c")).unwrap();

        assert_eq!(forest.find_root("c").unwrap().id, "a");
        assert_eq!(forest.depth_of("c"), Some(2));
        assert_eq!(forest.depth(), 3);
    }

    #[test]
    fn iter_orders_siblings_by_display_order() {
        let mut forest = Forest::new();
        forest.insert(None, node("root")).unwrap();
        let mut first = node("first");
        first.display_order = 2;
        let mut second = node("second");
        second.display_order = 1;
        forest.insert(Some("root"), first).unwrap();
        forest.insert(Some("root"), second).unwrap();

        let order: Vec<&str> = forest.iter().map(|(_, n)| n.id.as_str()).collect();
        assert_eq!(order, vec!["root", "second", "first"]);
    }

    #[test]
    fn doc_roundtrip_preserves_structure() {
        let mut forest = Forest::new();
        forest.insert(None, node("a")).unwrap();
        forest.insert(Some("a"), node("b")).unwrap();
        forest.insert(Some("b"), node("c")).unwrap();

        let doc = forest.to_doc("a").unwrap();
        let rebuilt = Forest::from_docs(std::slice::from_ref(&doc)).unwrap();
        assert_eq!(rebuilt.len(), 3);
        assert_eq!(rebuilt.find_parent("c").unwrap().id, "b");
        assert_eq!(rebuilt.to_doc("a").unwrap(), doc);
    }

    #[test]
    fn to_doc_refuses_non_root_nodes() {
        let mut forest = Forest::new();
        forest.insert(None, node("a")).unwrap();
        forest.insert(Some("a"), node("b")).unwrap();
        assert!(forest.to_doc("b").is_none());
    }
}
