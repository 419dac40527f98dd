//! Command behaviour against an in-memory remote store.
//!
//! Covers the validate -> remote -> local-callback protocol in both
//! directions, id capture for adds, snapshot recreation for deletes, and
//! batch ordering.

mod common;

use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use hakwon_client::memory::StoreCall;
use hakwon_client::RemoteError;
use hakwon_core::{EntityId, EntityType};
use hakwon_history::{
    AddEntityCommand, BatchCommand, Command, CommandError, DeleteEntityCommand,
    EditEntityCommand, LocalStateCommand, Reversible,
};
use serde_json::{json, Value};

use common::{id_of, record, CacheEvent, Fixture, FlakyStore};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn student(name: &str, email: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "phone": "010-1234-5678",
        "grade": "고2",
        "tuition_fee": 300000.0,
        "tuition_due_date": null,
        "is_active": true,
    })
}

// ---------------------------------------------------------------------------
// Edit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn edit_execute_then_undo_restores_old_row() {
    let fx = Fixture::new(EntityType::Student);
    let old = fx.seed(EntityType::Student, student("김민수", "minsu@example.com"));
    let id = id_of(&old);

    let mut new = old.clone();
    new.insert("name".into(), json!("김민수2"));
    new.insert("tuition_fee".into(), json!("420000"));
    new.insert("is_active".into(), json!("비활성"));

    let mut cmd = EditEntityCommand::new(
        EntityType::Student,
        id.clone(),
        old.clone(),
        new,
        fx.store(),
        fx.cache(),
    );
    assert!(cmd.can_execute());

    cmd.execute().await.unwrap();
    let remote = fx.store.get(EntityType::Student, &id).unwrap();
    assert_eq!(remote["name"], json!("김민수2"));
    assert_eq!(remote["tuition_fee"], json!(420000.0));
    assert_eq!(remote["is_active"], json!(false));
    assert_eq!(fx.cache.table.get(&id).unwrap()["name"], json!("김민수2"));

    cmd.undo().await.unwrap();
    assert_eq!(fx.store.get(EntityType::Student, &id).unwrap(), old);
    assert_eq!(fx.cache.table.get(&id).unwrap(), old);
}

#[tokio::test]
async fn edit_with_empty_email_never_reaches_the_store() {
    let fx = Fixture::new(EntityType::Student);
    let old = fx.seed(EntityType::Student, student("박지훈", "jihoon@example.com"));
    let id = id_of(&old);
    let mut new = old.clone();
    new.insert("email".into(), json!(""));

    let mut cmd = EditEntityCommand::new(
        EntityType::Student,
        id,
        old,
        new,
        fx.store(),
        fx.cache(),
    );

    let err = cmd.execute().await.unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("email"));
    assert!(err.to_string().contains("이메일"));
    assert!(fx.store.calls().is_empty());
    assert!(fx.cache.events().is_empty());
}

#[tokio::test]
async fn edit_remote_failure_leaves_local_rows_alone() {
    let fx = Fixture::new(EntityType::Teacher);
    let old = fx.seed(
        EntityType::Teacher,
        json!({"name": "이영희", "email": "lee@example.com", "subject": "수학"}),
    );
    let id = id_of(&old);
    let mut new = old.clone();
    new.insert("subject".into(), json!("과학"));

    let mut cmd = EditEntityCommand::new(
        EntityType::Teacher,
        id.clone(),
        old.clone(),
        new,
        fx.store(),
        fx.cache(),
    );
    fx.store.fail_next("502 Bad Gateway");

    let err = cmd.execute().await.unwrap_err();
    assert_matches!(err, CommandError::Remote(RemoteError::Injected(_)));
    assert!(fx.cache.events().is_empty());
    assert_eq!(fx.cache.table.get(&id).unwrap(), old);
}

#[test]
fn edit_preconditions() {
    let fx = Fixture::new(EntityType::Student);
    let row = record(student("A", "a@example.com"));

    let undefined_id = EditEntityCommand::new(
        EntityType::Student,
        EntityId::Number(0),
        row.clone(),
        row.clone(),
        fx.store(),
        fx.cache(),
    );
    assert!(!undefined_id.can_execute());

    let empty_new = EditEntityCommand::new(
        EntityType::Student,
        EntityId::Number(1),
        row,
        record(json!({})),
        fx.store(),
        fx.cache(),
    );
    assert!(!empty_new.can_execute());
    assert_eq!(empty_new.description(), "학생 편집 (ID: 1)");
}

// ---------------------------------------------------------------------------
// Add
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_undo_deletes_the_captured_id() {
    let fx = Fixture::new(EntityType::Material);
    for _ in 0..41 {
        fx.store.seed(EntityType::Material, record(json!({"name": "filler"})));
    }

    let mut cmd = AddEntityCommand::new(
        EntityType::Material,
        record(json!({
            "name": "수학의 정석",
            "subject": "수학",
            "grade": "고1",
            "price": "18000",
            "quantity": "10",
            "min_quantity": "",
        })),
        fx.store(),
        fx.cache(),
    );

    cmd.execute().await.unwrap();
    assert_eq!(cmd.created_id(), Some(&EntityId::Number(42)));
    let added = fx.cache.table.get(&EntityId::Number(42)).unwrap();
    assert_eq!(added["price"], json!(18000.0));
    assert_eq!(added["min_quantity"], json!(5));

    fx.store.clear_calls();
    cmd.undo().await.unwrap();
    assert_eq!(
        fx.store.calls(),
        vec![StoreCall::Delete {
            entity: EntityType::Material,
            id: EntityId::Number(42),
        }]
    );
    assert_eq!(
        fx.cache.events().last(),
        Some(&CacheEvent::Remove(EntityId::Number(42)))
    );
    assert!(fx.cache.table.get(&EntityId::Number(42)).is_none());
}

#[tokio::test]
async fn add_lecture_fills_unspecified_fields() {
    let fx = Fixture::new(EntityType::Lecture);
    let mut cmd = AddEntityCommand::new(
        EntityType::Lecture,
        record(json!({"title": "수능 국어 특강", "price": "120000"})),
        fx.store(),
        fx.cache(),
    );

    cmd.execute().await.unwrap();
    let created = fx.store.get(EntityType::Lecture, cmd.created_id().unwrap()).unwrap();
    for field in ["subject", "grade", "schedule", "classroom"] {
        assert_eq!(created[field], json!("미정"), "field {field}");
    }
    assert_eq!(created["price"], json!(120000.0));
}

#[tokio::test]
async fn add_undo_before_execute_is_refused() {
    let fx = Fixture::new(EntityType::Teacher);
    let mut cmd = AddEntityCommand::new(
        EntityType::Teacher,
        record(json!({"name": "최강사", "email": "choi@example.com", "subject": "영어"})),
        fx.store(),
        fx.cache(),
    );

    assert_matches!(cmd.undo().await, Err(CommandError::NotExecuted(_)));
    assert!(fx.store.calls().is_empty());
}

#[tokio::test]
async fn add_redo_recaptures_a_fresh_id() {
    let fx = Fixture::new(EntityType::Teacher);
    let mut cmd = AddEntityCommand::new(
        EntityType::Teacher,
        record(json!({"name": "최강사", "email": "choi@example.com", "subject": "영어"})),
        fx.store(),
        fx.cache(),
    );

    cmd.execute().await.unwrap();
    assert_eq!(cmd.created_id(), Some(&EntityId::Number(1)));
    cmd.undo().await.unwrap();
    assert_eq!(cmd.created_id(), None);
    cmd.execute().await.unwrap();
    assert_eq!(cmd.created_id(), Some(&EntityId::Number(2)));
    assert_eq!(fx.store.len(EntityType::Teacher), 1);
}

#[test]
fn add_requires_a_payload() {
    let fx = Fixture::new(EntityType::Student);
    let cmd = AddEntityCommand::new(EntityType::Student, record(json!({})), fx.store(), fx.cache());
    assert!(!cmd.can_execute());
    assert_eq!(cmd.description(), "학생 추가");
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_undo_recreates_from_snapshot() {
    let fx = Fixture::new(EntityType::Student);
    for _ in 0..6 {
        fx.seed(EntityType::Student, student("filler", "f@example.com"));
    }
    let snapshot = fx.seed(EntityType::Student, student("X", "x@example.com"));
    assert_eq!(snapshot["id"], json!(7));

    let mut cmd = DeleteEntityCommand::new(
        EntityType::Student,
        EntityId::Number(7),
        snapshot.clone(),
        fx.store(),
        fx.cache(),
    );
    cmd.execute().await.unwrap();
    assert!(fx.store.get(EntityType::Student, &EntityId::Number(7)).is_none());
    assert!(fx.cache.table.get(&EntityId::Number(7)).is_none());

    fx.store.clear_calls();
    cmd.undo().await.unwrap();

    let mut expected_payload = snapshot.clone();
    expected_payload.remove("id");
    assert_eq!(
        fx.store.calls(),
        vec![StoreCall::Create {
            entity: EntityType::Student,
            data: expected_payload,
        }]
    );

    let restored = match fx.cache.events().last() {
        Some(CacheEvent::Add(record)) => record.clone(),
        other => panic!("expected a local add, got {other:?}"),
    };
    assert_eq!(restored["id"], json!(8));
    assert_eq!(restored["name"], json!("X"));
    assert_eq!(cmd.current_id(), &EntityId::Number(8));
}

#[tokio::test]
async fn delete_redo_targets_the_recreated_record() {
    let fx = Fixture::new(EntityType::Material);
    let snapshot = fx.seed(
        EntityType::Material,
        json!({"name": "교재", "subject": "영어", "grade": "중1"}),
    );
    let mut cmd = DeleteEntityCommand::new(
        EntityType::Material,
        id_of(&snapshot),
        snapshot,
        fx.store(),
        fx.cache(),
    );

    cmd.execute().await.unwrap();
    cmd.undo().await.unwrap();
    cmd.execute().await.unwrap();

    assert!(fx.store.is_empty(EntityType::Material));
    assert!(fx.cache.table.is_empty());
    assert_eq!(cmd.description(), "교재 삭제 (ID: 1)");
}

// ---------------------------------------------------------------------------
// Batch and local state
// ---------------------------------------------------------------------------

fn logging_state(log: &Arc<Mutex<Vec<String>>>, label: &str) -> LocalStateCommand {
    let log = Arc::clone(log);
    let label = label.to_string();
    LocalStateCommand::new(
        json!(format!("undo {label}")),
        json!(format!("do {label}")),
        Arc::new(move |state: &Value| {
            log.lock()
                .unwrap()
                .push(state.as_str().unwrap_or_default().to_string())
        }),
    )
}

#[tokio::test]
async fn batch_undoes_in_reverse_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut batch = BatchCommand::new(vec![
        logging_state(&log, "a").into(),
        logging_state(&log, "b").into(),
        logging_state(&log, "c").into(),
    ])
    .with_description("열 설정 변경");

    assert!(batch.can_execute());
    batch.execute().await.unwrap();
    log.lock().unwrap().clear();

    batch.undo().await.unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["undo c", "undo b", "undo a"]);
    assert_eq!(batch.description(), "열 설정 변경");
}

#[tokio::test]
async fn batch_reports_sub_command_failure() {
    let fx = Fixture::new(EntityType::Student);
    let mut batch = BatchCommand::new(vec![
        AddEntityCommand::new(
            EntityType::Student,
            record(student("가", "ga@example.com")),
            fx.store(),
            fx.cache(),
        )
        .into(),
        AddEntityCommand::new(
            EntityType::Student,
            record(student("나", "not-an-email")),
            fx.store(),
            fx.cache(),
        )
        .into(),
    ]);

    let err = batch.execute().await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(fx.store.len(EntityType::Student), 1);
}

#[tokio::test]
async fn batch_undo_resumes_after_a_failed_sub_command() {
    let fx = Fixture::new(EntityType::Teacher);
    let flaky = FlakyStore::new(Arc::clone(&fx.store));
    let add = |name: &str| -> Command {
        AddEntityCommand::new(
            EntityType::Teacher,
            record(json!({"name": name, "email": "t@example.com", "subject": "수학"})),
            flaky.clone(),
            fx.cache(),
        )
        .into()
    };
    let mut batch = BatchCommand::new(vec![add("A"), add("B")]);

    batch.execute().await.unwrap();
    assert_eq!(batch.applied_count(), 2);
    let id_a = fx
        .cache
        .table
        .rows()
        .iter()
        .find(|row| row["name"] == json!("A"))
        .map(id_of)
        .unwrap();

    flaky.fail_delete_of(id_a.clone());
    let err = batch.undo().await.unwrap_err();
    assert_matches!(err, CommandError::Remote(RemoteError::Injected(_)));
    assert_eq!(batch.applied_count(), 1);
    assert_eq!(fx.store.len(EntityType::Teacher), 1);

    fx.store.clear_calls();
    batch.undo().await.unwrap();
    assert_eq!(
        fx.store.calls(),
        vec![StoreCall::Delete {
            entity: EntityType::Teacher,
            id: id_a,
        }]
    );
    assert!(fx.store.is_empty(EntityType::Teacher));
    assert_eq!(batch.applied_count(), 0);
}

#[tokio::test]
async fn batch_retry_only_runs_sub_commands_that_failed() {
    let fx = Fixture::new(EntityType::Teacher);
    let add = |name: &str| -> Command {
        AddEntityCommand::new(
            EntityType::Teacher,
            record(json!({"name": name, "email": "t@example.com", "subject": "수학"})),
            fx.store(),
            fx.cache(),
        )
        .into()
    };
    let mut batch = BatchCommand::new(vec![add("A"), add("B")]);

    fx.store.fail_next("connection reset");
    assert!(batch.execute().await.is_err());
    assert_eq!(batch.applied_count(), 1);
    assert_eq!(fx.store.len(EntityType::Teacher), 1);

    batch.execute().await.unwrap();
    assert_eq!(batch.applied_count(), 2);
    assert_eq!(fx.store.len(EntityType::Teacher), 2);
}

#[test]
fn batch_requires_every_sub_command_to_be_executable() {
    let fx = Fixture::new(EntityType::Student);
    let log = Arc::new(Mutex::new(Vec::new()));
    let batch = BatchCommand::new(vec![
        logging_state(&log, "a").into(),
        Command::from(AddEntityCommand::new(
            EntityType::Student,
            record(json!({})),
            fx.store(),
            fx.cache(),
        )),
    ]);
    assert!(!batch.can_execute());
    assert!(!BatchCommand::new(Vec::new()).can_execute());
}

#[tokio::test]
async fn local_state_makes_no_remote_calls() {
    let fx = Fixture::new(EntityType::Lecture);
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut cmd = logging_state(&log, "sort");

    cmd.execute().await.unwrap();
    cmd.undo().await.unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["do sort", "undo sort"]);
    assert!(fx.store.calls().is_empty());
    assert_eq!(cmd.description(), "로컬 상태 변경");
}
