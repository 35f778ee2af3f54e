use serde_json::json;
use tempfile::tempdir;
use vitrine::core::gatekeeper::{Authorizer, Gatekeeper};
use vitrine::core::store::DocumentStore;
use vitrine::{DocumentKind, DocumentStatus, Node, VitrineError};

fn open_store(dir: &tempfile::TempDir) -> DocumentStore {
    DocumentStore::open(dir.path()).expect("open document store")
}

fn page_tree() -> Node {
    serde_json::from_value(json!({
        "id": "root", "type": "Section",
        "children": [
            {"id": "headline", "type": "Text", "props": {"text": "Welcome"}}
        ]
    }))
    .expect("page tree")
}

fn layout_tree() -> Node {
    serde_json::from_value(json!({
        "id": "shell", "type": "Section",
        "children": [
            {"id": "header", "type": "Text", "props": {"text": "Store"}},
            {"id": "outlet", "type": "Slot"}
        ]
    }))
    .expect("layout tree")
}

#[test]
fn draft_round_trip_preserves_the_saved_tree() {
    let dir = tempdir().expect("tempdir");
    let store = open_store(&dir);

    let tree = page_tree();
    store
        .save_draft("s1", DocumentKind::Page, "home", &tree, None)
        .expect("save draft");

    let doc = store
        .get("s1", DocumentKind::Page, "home", DocumentStatus::Draft)
        .expect("read draft");
    assert_eq!(
        serde_json::to_value(&doc.tree).unwrap(),
        serde_json::to_value(&tree).unwrap()
    );
    assert!(doc.meta.is_none(), "absent meta must stay absent");

    // Absent optional node fields stay absent, not defaulted.
    let raw = serde_json::to_value(&doc.tree).unwrap();
    let headline = &raw["children"][0];
    assert!(headline.get("styles").is_none());
    assert!(headline.get("bindings").is_none());
}

#[test]
fn publish_creates_published_from_draft_and_is_idempotent() {
    let dir = tempdir().expect("tempdir");
    let store = open_store(&dir);

    store
        .save_draft("s1", DocumentKind::Page, "home", &page_tree(), Some(&json!({"title": "Home"})))
        .expect("save draft");

    let first = store
        .publish("s1", DocumentKind::Page, "home")
        .expect("first publish");
    assert_eq!(first.status, DocumentStatus::Published);
    assert_eq!(
        serde_json::to_value(&first.tree).unwrap(),
        serde_json::to_value(&page_tree()).unwrap()
    );

    // A second publish with no intervening draft save changes nothing.
    let second = store
        .publish("s1", DocumentKind::Page, "home")
        .expect("second publish");
    assert_eq!(second.id, first.id, "published row id is stable");
    assert_eq!(
        serde_json::to_value(&second.tree).unwrap(),
        serde_json::to_value(&first.tree).unwrap()
    );
    assert_eq!(second.meta, first.meta);
}

#[test]
fn publish_without_draft_is_not_found() {
    let dir = tempdir().expect("tempdir");
    let store = open_store(&dir);

    let err = store
        .publish("s1", DocumentKind::Page, "missing")
        .expect_err("publish with no draft must fail");
    assert!(matches!(err, VitrineError::NotFound(_)), "got {err}");
}

#[test]
fn draft_and_published_may_diverge() {
    let dir = tempdir().expect("tempdir");
    let store = open_store(&dir);

    store
        .save_draft("s1", DocumentKind::Page, "home", &page_tree(), None)
        .expect("save draft");
    store
        .publish("s1", DocumentKind::Page, "home")
        .expect("publish");

    let revised: Node = serde_json::from_value(json!({
        "id": "root", "type": "Section",
        "children": [{"id": "headline", "type": "Text", "props": {"text": "Revised"}}]
    }))
    .expect("revised tree");
    store
        .save_draft("s1", DocumentKind::Page, "home", &revised, None)
        .expect("save revised draft");

    let draft = store
        .get("s1", DocumentKind::Page, "home", DocumentStatus::Draft)
        .expect("draft");
    let published = store
        .get("s1", DocumentKind::Page, "home", DocumentStatus::Published)
        .expect("published");
    assert_eq!(draft.tree.child_nodes()[0].props["text"], json!("Revised"));
    assert_eq!(published.tree.child_nodes()[0].props["text"], json!("Welcome"));
}

#[test]
fn deleting_the_draft_keeps_the_published_row() {
    let dir = tempdir().expect("tempdir");
    let store = open_store(&dir);

    let draft = store
        .save_draft("s1", DocumentKind::Page, "home", &page_tree(), None)
        .expect("save draft");
    store
        .publish("s1", DocumentKind::Page, "home")
        .expect("publish");

    store.delete_document("s1", &draft.id).expect("delete draft row");

    let err = store
        .get("s1", DocumentKind::Page, "home", DocumentStatus::Draft)
        .expect_err("draft row should be gone");
    assert!(matches!(err, VitrineError::NotFound(_)));
    store
        .get("s1", DocumentKind::Page, "home", DocumentStatus::Published)
        .expect("published row must survive draft deletion");
}

#[test]
fn delete_on_missing_id_is_not_found() {
    let dir = tempdir().expect("tempdir");
    let store = open_store(&dir);

    let err = store
        .delete_document("s1", "01JUNKJUNKJUNKJUNKJUNKJUNK")
        .expect_err("missing id must fail");
    assert!(matches!(err, VitrineError::NotFound(_)));
}

#[test]
fn row_access_from_another_store_is_cross_tenant() {
    let dir = tempdir().expect("tempdir");
    let store = open_store(&dir);

    let doc = store
        .save_draft("s1", DocumentKind::Page, "home", &page_tree(), None)
        .expect("save draft");

    let err = store
        .get_document("s2", &doc.id)
        .expect_err("other tenant must not read the row");
    assert!(matches!(err, VitrineError::CrossTenant(_)), "got {err}");

    let err = store
        .delete_document("s2", &doc.id)
        .expect_err("other tenant must not delete the row");
    assert!(matches!(err, VitrineError::CrossTenant(_)));
    store
        .get_document("s1", &doc.id)
        .expect("owner still reads the row");
}

#[test]
fn layout_without_slot_fails_validation_with_zero_writes() {
    let dir = tempdir().expect("tempdir");
    let store = open_store(&dir);

    let no_slot: Node = serde_json::from_value(json!({
        "id": "shell", "type": "Section",
        "children": [{"id": "header", "type": "Text"}]
    }))
    .expect("tree");

    let err = store
        .save_draft("s1", DocumentKind::Layout, "main", &no_slot, None)
        .expect_err("layout without slot must be rejected");
    assert!(matches!(err, VitrineError::ValidationError(_)), "got {err}");

    let rows = store.list_documents("s1", None, None).expect("list");
    assert!(rows.is_empty(), "no row may be written on a failed gate");
}

#[test]
fn layout_with_two_slots_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let store = open_store(&dir);

    let two_slots: Node = serde_json::from_value(json!({
        "id": "shell", "type": "Section",
        "children": [
            {"id": "a", "type": "Slot"},
            {"id": "b", "type": "Slot"}
        ]
    }))
    .expect("tree");

    let err = store
        .save_draft("s1", DocumentKind::Layout, "main", &two_slots, None)
        .expect_err("two slots must be rejected");
    assert!(err.to_string().contains("exactly one Slot"), "got {err}");
}

#[test]
fn valid_layout_saves_and_lists() {
    let dir = tempdir().expect("tempdir");
    let store = open_store(&dir);

    store
        .save_draft("s1", DocumentKind::Layout, "main", &layout_tree(), Some(&json!({"title": "Main"})))
        .expect("save layout");

    let rows = store
        .list_documents("s1", Some(DocumentKind::Layout), None)
        .expect("list layouts");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].key, "main");
    assert_eq!(rows[0].title.as_deref(), Some("Main"));
}

#[test]
fn listing_is_store_scoped() {
    let dir = tempdir().expect("tempdir");
    let store = open_store(&dir);

    store
        .save_draft("s1", DocumentKind::Page, "home", &page_tree(), None)
        .expect("save s1");
    store
        .save_draft("s2", DocumentKind::Page, "home", &page_tree(), None)
        .expect("save s2");

    let rows = store.list_documents("s1", None, None).expect("list s1");
    assert_eq!(rows.len(), 1);
}

#[test]
fn editor_read_synthesizes_a_default_tree() {
    let dir = tempdir().expect("tempdir");
    let store = open_store(&dir);

    let doc = store
        .draft_for_edit("s1", DocumentKind::Page, "brand-new")
        .expect("editor read");
    assert_eq!(doc.status, DocumentStatus::Draft);
    assert!(doc.id.is_empty(), "synthesized draft has no row id");
    assert_eq!(doc.tree.id, "root");

    let rows = store.list_documents("s1", None, None).expect("list");
    assert!(rows.is_empty(), "the synthesized draft is not persisted");
}

#[test]
fn every_mutation_appends_one_audit_event() {
    let dir = tempdir().expect("tempdir");
    let store = open_store(&dir);

    let draft = store
        .save_draft("s1", DocumentKind::Page, "home", &page_tree(), None)
        .expect("save draft");
    store
        .publish("s1", DocumentKind::Page, "home")
        .expect("publish");
    store.delete_document("s1", &draft.id).expect("delete");

    let log = std::fs::read_to_string(dir.path().join("documents.events.jsonl"))
        .expect("audit log exists");
    let events: Vec<serde_json::Value> = log
        .lines()
        .map(|line| serde_json::from_str(line).expect("well-formed event"))
        .collect();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0]["op"], "document.save_draft");
    assert_eq!(events[1]["op"], "document.publish");
    assert_eq!(events[2]["op"], "document.delete");
    // Publish carries the draft's content hash forward.
    assert_eq!(events[0]["content_hash"], events[1]["content_hash"]);
}

struct DenyAll;

impl Authorizer for DenyAll {
    fn can_read(&self, _store_id: &str) -> bool {
        false
    }

    fn can_write(&self, _store_id: &str) -> bool {
        false
    }
}

#[test]
fn gatekeeper_denial_leaves_the_store_untouched() {
    let dir = tempdir().expect("tempdir");
    let store = open_store(&dir);
    let gate = Gatekeeper::new(&store, DenyAll);

    let err = gate
        .save_draft("s1", DocumentKind::Page, "home", &page_tree(), None)
        .expect_err("denied writer must not save");
    assert!(matches!(err, VitrineError::CrossTenant(_)));

    let err = gate
        .list_documents("s1", None, None)
        .expect_err("denied reader must not list");
    assert!(matches!(err, VitrineError::CrossTenant(_)));

    assert!(store.list_documents("s1", None, None).expect("list").is_empty());
}
