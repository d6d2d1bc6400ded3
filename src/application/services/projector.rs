//! Presentation projection: display-ready shapes for forests
//!
//! Read-path helpers turning a forest into breadcrumb strings, flattened
//! select-list options and renderable trees. Missing related entities
//! degrade to placeholder labels instead of raising.

use itertools::Itertools;
use termtree::Tree;

use crate::domain::{Forest, TreeNode};

/// Label shown when a breadcrumb id cannot be resolved.
pub const UNKNOWN_LABEL: &str = "(unknown)";

/// One flattened entry for a nested select list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub id: String,
    pub label: String,
    /// Nesting depth, 0 for roots
    pub indent: usize,
}

impl SelectOption {
    /// Label with depth encoded as a `--` prefix per level, as rendered in
    /// nested dropdowns.
    pub fn indented_label(&self) -> String {
        format!("{}{}", "--".repeat(self.indent), self.label)
    }
}

/// Ancestor chain of a node as a breadcrumb string, root-first.
///
/// A node at depth d yields d+1 segments. An unknown id degrades to the
/// placeholder label.
pub fn breadcrumb(forest: &Forest, id: &str, separator: &str) -> String {
    let mut segments = Vec::new();
    let mut current = forest.find_node(id);
    if current.is_none() {
        return UNKNOWN_LABEL.to_string();
    }
    while let Some(node) = current {
        segments.push(node.name.as_str());
        current = node.parent.as_deref().and_then(|p| forest.find_node(p));
    }
    segments.iter().rev().join(separator)
}

/// Flatten the forest pre-order into select-list options.
///
/// Siblings appear by ascending `display_order`, stable with respect to
/// insertion order.
pub fn select_options(forest: &Forest) -> Vec<SelectOption> {
    forest
        .iter()
        .map(|(depth, node)| SelectOption {
            id: node.id.clone(),
            label: node.name.clone(),
            indent: depth,
        })
        .collect()
}

/// Render the forest as one displayable tree per root.
pub fn render_forest(forest: &Forest) -> Vec<Tree<String>> {
    forest
        .roots()
        .sorted_by_key(|root| root.display_order)
        .map(|root| render_subtree(forest, root))
        .collect()
}

fn render_subtree(forest: &Forest, node: &TreeNode) -> Tree<String> {
    let mut tree = Tree::new(node_label(node));
    for child in forest
        .children_of(&node.id)
        .into_iter()
        .sorted_by_key(|c| c.display_order)
    {
        tree.push(render_subtree(forest, child));
    }
    tree
}

fn node_label(node: &TreeNode) -> String {
    if node.published {
        format!("{} [{}] ({})", node.name, node.kind, node.id)
    } else {
        format!("{} [{}] ({}) [unpublished]", node.name, node.kind, node.id)
    }
}
