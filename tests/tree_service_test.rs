//! TreeService tests over the in-memory store
//!
//! Every operation is a fresh load–mutate–save cycle; assertions check
//! both the returned models and what actually landed in the store.

use std::sync::Arc;

use rstest::{fixture, rstest};

use sitetree::application::{
    ApplicationError, DeleteOutcome, MissingDeletePolicy, TreeService,
};
use sitetree::domain::{DomainError, NewNode, NodeDoc, NodeKind, NodeUpdate};
use sitetree::infrastructure::{MemoryTreeStore, SiteTreeStore};
use sitetree::util::testing::init_test_setup;

fn new_node(id: &str, name: &str) -> NewNode {
    let mut new = NewNode::named(name);
    new.id = Some(id.to_string());
    new
}

fn service_over(store: Arc<MemoryTreeStore>, policy: MissingDeletePolicy) -> TreeService {
    init_test_setup();
    TreeService::new(store, policy)
}

/// Store pre-seeded with: catalog -> shoes -> running
#[fixture]
fn seeded() -> (Arc<MemoryTreeStore>, TreeService) {
    let doc: NodeDoc = toml::from_str(
        r#"
        id = "catalog"
        name = "Catalog"
        kind = "category"

        [[children]]
        id = "shoes"
        name = "Shoes"
        kind = "category"

        [[children.children]]
        id = "running"
        name = "Running"
        kind = "article"
        "#,
    )
    .unwrap();
    let store = Arc::new(MemoryTreeStore::with_docs(vec![doc]));
    let service = service_over(store.clone(), MissingDeletePolicy::Ignore);
    (store, service)
}

fn stored_root(store: &MemoryTreeStore, id: &str) -> Option<NodeDoc> {
    store
        .load_forest()
        .unwrap()
        .into_iter()
        .find(|doc| doc.id == id)
}

// ============================================================
// Insert Tests
// ============================================================

#[rstest]
fn given_no_parent_when_inserting_then_new_root_is_persisted_directly(
    seeded: (Arc<MemoryTreeStore>, TreeService),
) {
    let (store, service) = seeded;
    let node = service.insert(None, new_node("info", "Info")).unwrap();

    assert!(node.is_root());
    assert_eq!(store.root_count(), 2);
    assert_eq!(stored_root(&store, "info").unwrap().node_count(), 1);
}

#[rstest]
fn given_nested_parent_when_inserting_then_whole_owning_root_is_resaved(
    seeded: (Arc<MemoryTreeStore>, TreeService),
) {
    let (store, service) = seeded;
    let node = service
        .insert(Some("shoes"), new_node("trail", "Trail"))
        .unwrap();

    assert_eq!(node.parent.as_deref(), Some("shoes"));
    // Still one record: the mutation was written through the owning root
    assert_eq!(store.root_count(), 1);
    let doc = stored_root(&store, "catalog").unwrap();
    assert_eq!(doc.node_count(), 4);
    let shoes = &doc.children[0];
    assert!(shoes.children.iter().any(|c| c.id == "trail"));
}

#[rstest]
fn given_unknown_parent_when_inserting_then_parent_not_found(
    seeded: (Arc<MemoryTreeStore>, TreeService),
) {
    let (store, service) = seeded;
    let err = service
        .insert(Some("nope"), new_node("x", "X"))
        .unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::ParentNotFound(id)) if id == "nope"
    ));
    assert_eq!(store.root_count(), 1);
}

#[rstest]
fn given_empty_name_when_inserting_then_invalid_argument(
    seeded: (Arc<MemoryTreeStore>, TreeService),
) {
    let (_, service) = seeded;
    let err = service.insert(None, new_node("x", "  ")).unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::InvalidArgument { param: "name", .. }
    ));
}

#[rstest]
fn given_id_with_path_separator_when_inserting_then_invalid_argument(
    seeded: (Arc<MemoryTreeStore>, TreeService),
) {
    let (store, service) = seeded;
    // Ids end up as store file names; traversal attempts are rejected up front
    for id in ["../escaped", "a/b", "a\\b", "..", "."] {
        let err = service.insert(None, new_node(id, "Escaped")).unwrap_err();
        assert!(
            matches!(err, ApplicationError::InvalidArgument { param: "id", .. }),
            "insert should reject id {id:?}"
        );
    }
    assert_eq!(store.root_count(), 1);
}

#[rstest]
fn given_no_explicit_id_when_inserting_then_one_is_generated(
    seeded: (Arc<MemoryTreeStore>, TreeService),
) {
    let (_, service) = seeded;
    let node = service
        .insert(Some("catalog"), NewNode::named("Bags"))
        .unwrap();
    assert!(!node.id.is_empty());
    assert_eq!(node.kind, NodeKind::MenuItem);
}

// ============================================================
// Update Tests
// ============================================================

#[rstest]
fn given_existing_node_when_updating_then_fields_change_in_place(
    seeded: (Arc<MemoryTreeStore>, TreeService),
) {
    let (store, service) = seeded;
    let update = NodeUpdate {
        name: Some("Footwear".to_string()),
        display_order: Some(5),
        published: Some(false),
        ..Default::default()
    };
    let node = service.update("shoes", update).unwrap();

    assert_eq!(node.name, "Footwear");
    assert!(!node.published);
    assert!(node.updated_at > node.created_at);

    let doc = stored_root(&store, "catalog").unwrap();
    let shoes = &doc.children[0];
    assert_eq!(shoes.name, "Footwear");
    assert_eq!(shoes.display_order, 5);
    // Siblings and ancestors untouched
    assert_eq!(doc.name, "Catalog");
    assert_eq!(shoes.children[0].name, "Running");
}

#[rstest]
fn given_unknown_id_when_updating_then_node_not_found(
    seeded: (Arc<MemoryTreeStore>, TreeService),
) {
    let (_, service) = seeded;
    let err = service
        .update("nope", NodeUpdate::default())
        .unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::NodeNotFound(id)) if id == "nope"
    ));
}

// ============================================================
// Delete Tests
// ============================================================

#[rstest]
fn given_nested_id_when_deleting_then_detached_and_root_resaved(
    seeded: (Arc<MemoryTreeStore>, TreeService),
) {
    let (store, service) = seeded;
    let outcome = service.delete("shoes").unwrap();

    assert_eq!(
        outcome,
        DeleteOutcome::Detached {
            id: "shoes".to_string(),
            parent_id: "catalog".to_string(),
            removed: 2,
        }
    );
    let doc = stored_root(&store, "catalog").unwrap();
    assert_eq!(doc.node_count(), 1);
    assert!(doc.children.is_empty());
}

#[rstest]
fn given_root_id_when_deleting_then_whole_record_removed(
    seeded: (Arc<MemoryTreeStore>, TreeService),
) {
    let (store, service) = seeded;
    let outcome = service.delete("catalog").unwrap();

    assert_eq!(
        outcome,
        DeleteOutcome::RootDeleted {
            id: "catalog".to_string(),
            removed: 3,
        }
    );
    assert_eq!(store.root_count(), 0);
}

#[rstest]
fn given_unknown_id_when_deleting_with_ignore_policy_then_silent_no_op(
    seeded: (Arc<MemoryTreeStore>, TreeService),
) {
    let (store, service) = seeded;
    let outcome = service.delete("stale").unwrap();
    assert_eq!(
        outcome,
        DeleteOutcome::NotFound {
            id: "stale".to_string()
        }
    );
    assert_eq!(store.root_count(), 1);
}

#[rstest]
fn given_unknown_id_when_deleting_with_error_policy_then_surfaces_not_found(
    seeded: (Arc<MemoryTreeStore>, TreeService),
) {
    let (_, service) = seeded;
    let err = service
        .delete_with_policy("stale", MissingDeletePolicy::Error)
        .unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::NodeNotFound(id)) if id == "stale"
    ));
}

// ============================================================
// End-to-end Scenario
// ============================================================

/// Forest [A [B]]: locate B and its parent, insert C under B, delete C,
/// then delete root A, leaving an empty forest.
#[test]
fn given_two_level_forest_when_walking_scenario_then_each_step_holds() {
    let store = Arc::new(MemoryTreeStore::new());
    let service = service_over(store.clone(), MissingDeletePolicy::Ignore);

    service.insert(None, new_node("A", "A")).unwrap();
    service.insert(Some("A"), new_node("B", "B")).unwrap();

    let forest = service.load().unwrap();
    assert_eq!(forest.find_node("B").unwrap().id, "B");
    assert_eq!(forest.find_parent("B").unwrap().id, "A");

    service.insert(Some("B"), new_node("C", "C")).unwrap();
    let forest = service.load().unwrap();
    assert_eq!(forest.find_node("B").unwrap().children, vec!["C"]);

    service.delete("C").unwrap();
    let forest = service.load().unwrap();
    assert!(forest.find_node("B").unwrap().children.is_empty());
    assert!(forest.find_node("C").is_none());

    service.delete("A").unwrap();
    let forest = service.load().unwrap();
    assert!(forest.is_empty());
    assert_eq!(store.root_count(), 0);
}
