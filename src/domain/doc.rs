//! Nested root documents: the persistence-facing node representation
//!
//! Storage addresses whole root subtrees, never individual nodes. A
//! `NodeDoc` embeds its children recursively and is what the store trait
//! loads and saves; the in-memory `Forest` arena is rebuilt from these
//! documents on every operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::node::{NodeKind, TreeNode};

/// One node of a root document, children embedded.
///
/// Field defaults are chosen so hand-authored documents only need `id`,
/// `name` and `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDoc {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_published")]
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    // Must stay the last field: TOML requires tables after scalar values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDoc>,
}

fn default_published() -> bool {
    true
}

impl NodeDoc {
    /// Shape a `TreeNode`'s own fields into a childless document.
    pub(crate) fn from_node(node: &TreeNode) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind,
            display_order: node.display_order,
            published: node.published,
            url: node.url.clone(),
            created_at: node.created_at,
            updated_at: node.updated_at,
            children: Vec::new(),
        }
    }

    /// Flatten this document's own fields into a `TreeNode` with the given
    /// parent linkage. Child ids are filled in by the forest builder.
    pub(crate) fn to_node(&self, parent: Option<String>) -> TreeNode {
        TreeNode {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind,
            parent,
            children: self.children.iter().map(|c| c.id.clone()).collect(),
            display_order: self.display_order,
            published: self.published,
            url: self.url.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Number of nodes in this document (self included).
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(NodeDoc::node_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_document_deserializes_with_defaults() {
        let doc: NodeDoc = toml::from_str(
            r#"
            id = "root"
            name = "Root"
            kind = "category"

            [[children]]
            id = "child"
            name = "Child"
            kind = "article"
            "#,
        )
        .unwrap();

        assert!(doc.published);
        assert_eq!(doc.display_order, 0);
        assert_eq!(doc.children.len(), 1);
        assert_eq!(doc.node_count(), 2);
    }

    #[test]
    fn document_roundtrips_through_toml() {
        let doc: NodeDoc = toml::from_str(
            r#"
            id = "root"
            name = "Root"
            kind = "menu-item"
            display_order = 3
            url = "/home"
            "#,
        )
        .unwrap();

        let serialized = toml::to_string(&doc).unwrap();
        let reparsed: NodeDoc = toml::from_str(&serialized).unwrap();
        assert_eq!(doc, reparsed);
    }
}
