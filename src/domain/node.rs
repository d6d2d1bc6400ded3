//! Domain entities: nodes of the site forest

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload variant carried by a node.
///
/// An explicit tag instead of runtime type inspection: menu entries and
/// knowledgebase categories/articles share one node shape and differ only
/// in their kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Knowledgebase category (may contain categories and articles)
    Category,
    /// Knowledgebase article (leaf content)
    Article,
    /// Admin/site menu entry
    MenuItem,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Category => write!(f, "category"),
            NodeKind::Article => write!(f, "article"),
            NodeKind::MenuItem => write!(f, "menu-item"),
        }
    }
}

/// A single node in the site forest.
///
/// Parent linkage is id-based (never an object pointer); `children` holds
/// child ids in insertion order. Sibling display order is a presentation
/// concern resolved by `display_order`, not by reordering `children`.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Opaque stable identifier, unique within the forest
    pub id: String,
    /// Display label
    pub name: String,
    /// Payload variant
    pub kind: NodeKind,
    /// Id of the owning node, None for root nodes
    pub parent: Option<String>,
    /// Ids of child nodes, insertion order
    pub children: Vec<String>,
    /// Sibling ordering key (not unique)
    pub display_order: i32,
    /// Visible on the storefront / admin navigation
    pub published: bool,
    /// Optional link target (menu items, article slugs)
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TreeNode {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Input model for creating a node.
#[derive(Debug, Clone, Default)]
pub struct NewNode {
    /// Explicit id; generated (uuid v4) when None
    pub id: Option<String>,
    pub name: String,
    pub kind: Option<NodeKind>,
    pub display_order: i32,
    pub published: bool,
    pub url: Option<String>,
}

impl NewNode {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            published: true,
            ..Default::default()
        }
    }

    /// Materialize into a `TreeNode` under the given parent.
    pub fn into_node(self, parent: Option<String>, now: DateTime<Utc>) -> TreeNode {
        TreeNode {
            id: self
                .id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: self.name,
            kind: self.kind.unwrap_or(NodeKind::MenuItem),
            parent,
            children: Vec::new(),
            display_order: self.display_order,
            published: self.published,
            url: self.url,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update applied to an existing node.
///
/// `None` fields are left untouched; only the targeted node changes.
#[derive(Debug, Clone, Default)]
pub struct NodeUpdate {
    pub name: Option<String>,
    pub display_order: Option<i32>,
    pub published: Option<bool>,
    pub url: Option<String>,
}

impl NodeUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.display_order.is_none()
            && self.published.is_none()
            && self.url.is_none()
    }

    /// Apply this update in place. Returns true if any field changed.
    pub fn apply(&self, node: &mut TreeNode) -> bool {
        let mut changed = false;
        if let Some(name) = &self.name {
            if node.name != *name {
                node.name = name.clone();
                changed = true;
            }
        }
        if let Some(order) = self.display_order {
            if node.display_order != order {
                node.display_order = order;
                changed = true;
            }
        }
        if let Some(published) = self.published {
            if node.published != published {
                node.published = published;
                changed = true;
            }
        }
        if let Some(url) = &self.url {
            if node.url.as_deref() != Some(url.as_str()) {
                node.url = Some(url.clone());
                changed = true;
            }
        }
        changed
    }
}
