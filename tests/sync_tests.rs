//! Integration tests for saving document content and the task records it
//! keeps in step with the document's checklist.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value, json};
use taskdoc_mcp::config::IdsConfig;
use taskdoc_mcp::db::Database;
use taskdoc_mcp::error::SyncError;
use taskdoc_mcp::types::{ChangeCounts, TaskRecord};

const T1: i64 = 1_700_000_000_000;
const T2: i64 = T1 + 60_000;
const T3: i64 = T2 + 60_000;

fn setup() -> (Database, String) {
    let db = Database::open_in_memory().expect("Failed to create in-memory database");
    let doc = db
        .create_document("Groceries", Some("home"))
        .expect("Failed to create document");
    (db, doc.id)
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn task(id: &str, checked: bool, text: &str) -> Value {
    json!({
        "type": "taskItem",
        "attrs": { "id": id, "checked": checked },
        "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": text }] }]
    })
}

fn doc_with(tasks: Vec<Value>) -> String {
    json!({
        "type": "doc",
        "content": [
            { "type": "heading", "content": [{ "type": "text", "text": "List" }] },
            { "type": "taskList", "content": tasks }
        ]
    })
    .to_string()
}

fn save(db: &Database, doc_id: &str, content: &str, now: i64) -> taskdoc_mcp::types::SyncOutcome {
    db.save_document_content_at(doc_id, content, &IdsConfig::default(), &mut rng(), now)
        .expect("save should succeed")
}

fn tasks(db: &Database, doc_id: &str) -> Vec<TaskRecord> {
    db.list_document_tasks(doc_id).expect("Failed to list tasks")
}

mod scenarios {
    use super::*;

    #[test]
    fn empty_document_has_no_tasks() {
        let (db, doc_id) = setup();

        let outcome = save(&db, &doc_id, r#"{"type":"doc","content":[]}"#, T1);

        assert_eq!(outcome.todo_count, 0);
        assert_eq!(outcome.completed_count, 0);
        assert_eq!(outcome.changes, ChangeCounts::default());
        assert!(tasks(&db, &doc_id).is_empty());
    }

    #[test]
    fn single_task_creates_one_record() {
        let (db, doc_id) = setup();

        let outcome = save(&db, &doc_id, &doc_with(vec![task("a", false, "Buy milk")]), T1);

        assert_eq!(outcome.todo_count, 1);
        assert_eq!(outcome.completed_count, 0);
        assert_eq!(outcome.changes.inserted, 1);

        let records = tasks(&db, &doc_id);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.node_id, "a");
        assert_eq!(record.text, "Buy milk");
        assert!(!record.is_completed);
        assert_eq!(record.order, 0);
        assert_eq!(record.document_id, doc_id);
        assert_eq!(record.project_id.as_deref(), Some("home"));
        assert_eq!(record.created_at, T1);
        assert_eq!(record.completed_at, None);
    }

    #[test]
    fn swapping_tasks_swaps_their_order() {
        let (db, doc_id) = setup();
        save(
            &db,
            &doc_id,
            &doc_with(vec![task("a", true, "Milk"), task("b", false, "Bread")]),
            T1,
        );

        let outcome = save(
            &db,
            &doc_id,
            &doc_with(vec![task("b", false, "Bread"), task("a", true, "Milk")]),
            T2,
        );
        assert_eq!(outcome.changes.updated, 2);
        assert_eq!(outcome.changes.inserted, 0);
        assert_eq!(outcome.changes.deleted, 0);

        let records = tasks(&db, &doc_id);
        assert_eq!(records[0].node_id, "b");
        assert_eq!(records[0].order, 0);
        assert_eq!(records[1].node_id, "a");
        assert_eq!(records[1].order, 1);
        for record in &records {
            assert_eq!(record.updated_at, T2);
            assert_eq!(record.created_at, T1);
        }
        // Completion state did not change, so neither does its timestamp.
        assert_eq!(records[1].completed_at, Some(T1));
    }
}

mod properties {
    use super::*;

    #[test]
    fn resaving_same_content_writes_no_task() {
        let (db, doc_id) = setup();
        let content = doc_with(vec![task("a", false, "One"), task("b", true, "Two")]);
        save(&db, &doc_id, &content, T1);

        let outcome = save(&db, &doc_id, &content, T2);

        assert_eq!(
            outcome.changes,
            ChangeCounts {
                inserted: 0,
                updated: 0,
                deleted: 0,
                unchanged: 2
            }
        );
        for record in tasks(&db, &doc_id) {
            assert_eq!(record.updated_at, T1);
        }
    }

    #[test]
    fn every_item_has_exactly_one_record() {
        let (db, doc_id) = setup();
        let content = doc_with(vec![
            task("a", false, "One"),
            task("b", true, "Two"),
            task("c", false, "Three"),
        ]);

        let outcome = save(&db, &doc_id, &content, T1);

        let records = tasks(&db, &doc_id);
        let node_ids: Vec<_> = records.iter().map(|r| r.node_id.as_str()).collect();
        assert_eq!(node_ids, vec!["a", "b", "c"]);
        assert_eq!(outcome.todo_count, 3);
        assert_eq!(outcome.completed_count, 1);
    }

    #[test]
    fn editing_text_keeps_record_identity() {
        let (db, doc_id) = setup();
        save(&db, &doc_id, &doc_with(vec![task("a", false, "Milk")]), T1);
        let before = tasks(&db, &doc_id).remove(0);

        save(&db, &doc_id, &doc_with(vec![task("a", false, "Oat milk")]), T2);
        let after = tasks(&db, &doc_id).remove(0);

        assert_eq!(after.id, before.id);
        assert_eq!(after.created_at, T1);
        assert_eq!(after.updated_at, T2);
        assert_eq!(after.text, "Oat milk");
    }

    #[test]
    fn removed_items_are_deleted() {
        let (db, doc_id) = setup();
        save(
            &db,
            &doc_id,
            &doc_with(vec![task("a", false, "Keep"), task("b", false, "Drop")]),
            T1,
        );

        let outcome = save(&db, &doc_id, &doc_with(vec![task("a", false, "Keep")]), T2);

        assert_eq!(outcome.changes.deleted, 1);
        assert_eq!(outcome.changes.unchanged, 1);
        let records = tasks(&db, &doc_id);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].node_id, "a");
        assert!(db.get_task_by_node(&doc_id, "b").unwrap().is_none());
    }

    #[test]
    fn completion_timestamp_follows_checked_state() {
        let (db, doc_id) = setup();
        save(&db, &doc_id, &doc_with(vec![task("a", false, "Walk")]), T1);
        assert_eq!(tasks(&db, &doc_id)[0].completed_at, None);

        save(&db, &doc_id, &doc_with(vec![task("a", true, "Walk")]), T2);
        let done = tasks(&db, &doc_id).remove(0);
        assert!(done.is_completed);
        assert_eq!(done.completed_at, Some(T2));

        save(&db, &doc_id, &doc_with(vec![task("a", false, "Walk")]), T3);
        let reopened = tasks(&db, &doc_id).remove(0);
        assert!(!reopened.is_completed);
        assert_eq!(reopened.completed_at, None);
    }

    #[test]
    fn task_inserted_as_done_gets_completion_time() {
        let (db, doc_id) = setup();
        save(&db, &doc_id, &doc_with(vec![task("a", true, "Done already")]), T1);
        assert_eq!(tasks(&db, &doc_id)[0].completed_at, Some(T1));
    }

    #[test]
    fn document_aggregates_follow_last_save() {
        let (db, doc_id) = setup();
        let content = doc_with(vec![task("a", true, "One"), task("b", false, "Two")]);

        save(&db, &doc_id, &content, T1);

        let doc = db.get_document(&doc_id).unwrap().unwrap();
        assert_eq!(doc.content, content);
        assert_eq!(doc.todo_count, 2);
        assert_eq!(doc.completed_count, 1);
        assert_eq!(doc.updated_at, T1);
    }

    #[test]
    fn nested_tasks_follow_their_parent() {
        let (db, doc_id) = setup();
        let mut parent = task("p", false, "Trip");
        parent["content"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "type": "taskList", "content": [task("c", false, "Pack")] }));
        let content = doc_with(vec![parent, task("s", false, "Sleep")]);

        save(&db, &doc_id, &content, T1);

        let records = tasks(&db, &doc_id);
        let order: Vec<_> = records
            .iter()
            .map(|r| (r.node_id.as_str(), r.order))
            .collect();
        assert_eq!(order, vec![("p", 0), ("c", 1), ("s", 2)]);
        assert_eq!(records[0].text, "TripPack");
    }

    #[test]
    fn duplicate_node_ids_keep_last_occurrence() {
        let (db, doc_id) = setup();
        let content = doc_with(vec![task("x", false, "First"), task("x", true, "Second")]);

        let outcome = save(&db, &doc_id, &content, T1);

        let records = tasks(&db, &doc_id);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "Second");
        assert!(records[0].is_completed);
        assert_eq!(outcome.todo_count, 2);
        assert_eq!(outcome.completed_count, 1);
    }

    #[test]
    fn items_without_ids_get_generated_ones() {
        let (db, doc_id) = setup();
        let content = doc_with(vec![json!({
            "type": "taskItem",
            "attrs": { "checked": false },
            "content": [{ "type": "text", "text": "No id" }]
        })]);

        save(&db, &doc_id, &content, T1);

        let records = tasks(&db, &doc_id);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].node_id.len(), IdsConfig::default().generated_id_length);
        assert!(
            records[0]
                .node_id
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
        );
    }

    #[test]
    fn valid_json_that_is_not_a_tree_yields_no_tasks() {
        let (db, doc_id) = setup();
        save(&db, &doc_id, &doc_with(vec![task("a", false, "One")]), T1);

        let outcome = save(&db, &doc_id, "[1, 2, 3]", T2);

        assert_eq!(outcome.todo_count, 0);
        assert_eq!(outcome.changes.deleted, 1);
        assert!(tasks(&db, &doc_id).is_empty());
    }
}

mod errors {
    use super::*;

    #[test]
    fn invalid_content_changes_nothing() {
        let (db, doc_id) = setup();
        let content = doc_with(vec![task("a", false, "Keep me")]);
        save(&db, &doc_id, &content, T1);

        let err = db
            .save_document_content_at(&doc_id, "{not json", &IdsConfig::default(), &mut rng(), T2)
            .unwrap_err();
        assert!(matches!(err, SyncError::InvalidContent(_)));

        let doc = db.get_document(&doc_id).unwrap().unwrap();
        assert_eq!(doc.content, content);
        assert_eq!(doc.updated_at, T1);
        let records = tasks(&db, &doc_id);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].updated_at, T1);
    }

    #[test]
    fn unknown_document_is_rejected() {
        let (db, doc_id) = setup();

        let err = db
            .save_document_content_at(
                "missing",
                &doc_with(vec![task("a", false, "Orphan")]),
                &IdsConfig::default(),
                &mut rng(),
                T1,
            )
            .unwrap_err();

        assert!(matches!(err, SyncError::DocumentNotFound(ref id) if id == "missing"));
        assert!(tasks(&db, "missing").is_empty());
        assert!(tasks(&db, &doc_id).is_empty());
    }
}
