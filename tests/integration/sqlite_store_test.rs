//! Integration tests for the SQLite record store.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use taskbrew::commands::output::BufferSink;
use taskbrew::commands::schema::EntityKind;
use taskbrew::interpreter::Interpreter;
use taskbrew::store::{ListFilter, LogNotifier, NewRecord, RecordPatch, RecordStore, SqliteStore};
use tempfile::tempdir;

async fn create_test_store() -> (SqliteStore, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let store = SqliteStore::open(&dir.path().join("records.db"))
        .await
        .unwrap();
    (store, dir)
}

/// Pulls the id out of a `Created ... (id: x)` line.
fn created_id(line: &str) -> String {
    let start = line.rfind("(id: ").unwrap() + "(id: ".len();
    line[start..line.len() - 1].to_string()
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("records.db");

    let id = {
        let store = SqliteStore::open(&path).await.unwrap();
        let id = store
            .create(NewRecord::new(EntityKind::Program, "Platform"))
            .await
            .unwrap();
        store.close().await;
        id
    };

    let store = SqliteStore::open(&path).await.unwrap();
    let record = store.get(EntityKind::Program, &id).await.unwrap().unwrap();
    assert_eq!(record.title, "Platform");
    assert_eq!(record.id.len(), 8);
    store.close().await;
}

#[tokio::test]
async fn test_crud_round() {
    let (store, _dir) = create_test_store().await;

    let program = store
        .create(NewRecord::new(EntityKind::Program, "Platform"))
        .await
        .unwrap();
    let mut project = NewRecord::new(EntityKind::Project, "Website").with_parent(&program);
    project
        .attributes
        .insert("status".to_string(), "todo".to_string());
    let project = store.create(project).await.unwrap();

    let patch = RecordPatch {
        title: Some("Public website".to_string()),
        attributes: [
            ("status".to_string(), "done".to_string()),
            ("priority".to_string(), "high".to_string()),
        ]
        .into_iter()
        .collect(),
        ..Default::default()
    };
    store
        .update(EntityKind::Project, &project, patch)
        .await
        .unwrap();

    let record = store
        .get(EntityKind::Project, &project)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.title, "Public website");
    assert_eq!(record.parent_id.as_deref(), Some(program.as_str()));
    assert_eq!(record.status(), Some("done"));
    assert_eq!(record.priority(), Some("high"));

    // Wrong kind does not match.
    assert!(store
        .get(EntityKind::Task, &project)
        .await
        .unwrap()
        .is_none());

    store.close().await;
}

#[tokio::test]
async fn test_list_filters() {
    let (store, _dir) = create_test_store().await;

    for (title, status, parent) in [
        ("Login", "todo", "proj-a"),
        ("Logout", "done", "proj-a"),
        ("Signup", "todo", "proj-b"),
    ] {
        let mut task = NewRecord::new(EntityKind::Task, title).with_parent(parent);
        task.attributes
            .insert("status".to_string(), status.to_string());
        store.create(task).await.unwrap();
    }

    let titles = |records: Vec<taskbrew::store::Record>| {
        records.into_iter().map(|r| r.title).collect::<Vec<_>>()
    };

    let all = store
        .list(EntityKind::Task, &ListFilter::default())
        .await
        .unwrap();
    assert_eq!(titles(all), vec!["Login", "Logout", "Signup"]);

    let todo_in_a = ListFilter {
        parent_id: Some("proj-a".to_string()),
        status: Some("todo".to_string()),
        ..Default::default()
    };
    assert_eq!(
        titles(store.list(EntityKind::Task, &todo_in_a).await.unwrap()),
        vec!["Login"]
    );

    let limited = ListFilter {
        limit: Some(2),
        ..Default::default()
    };
    assert_eq!(
        titles(store.list(EntityKind::Task, &limited).await.unwrap()),
        vec!["Login", "Logout"]
    );

    assert!(store
        .list(EntityKind::Program, &ListFilter::default())
        .await
        .unwrap()
        .is_empty());

    store.close().await;
}

#[tokio::test]
async fn test_delete_cascades_to_descendants() {
    let (store, _dir) = create_test_store().await;

    let program = store
        .create(NewRecord::new(EntityKind::Program, "Platform"))
        .await
        .unwrap();
    let project = store
        .create(NewRecord::new(EntityKind::Project, "Website").with_parent(&program))
        .await
        .unwrap();
    let task = store
        .create(NewRecord::new(EntityKind::Task, "Login").with_parent(&project))
        .await
        .unwrap();
    let other = store
        .create(NewRecord::new(EntityKind::Program, "Marketing"))
        .await
        .unwrap();

    store.delete(EntityKind::Program, &program).await.unwrap();

    assert!(store.get(EntityKind::Task, &task).await.unwrap().is_none());
    assert!(store
        .get(EntityKind::Project, &project)
        .await
        .unwrap()
        .is_none());
    assert!(store
        .get(EntityKind::Program, &other)
        .await
        .unwrap()
        .is_some());

    let err = store
        .delete(EntityKind::Program, &program)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), format!("Program '{program}' not found."));

    store.close().await;
}

#[tokio::test]
async fn test_delete_finishes_on_parent_loop() {
    let (store, _dir) = create_test_store().await;

    let first = store
        .create(NewRecord::new(EntityKind::Task, "Login").with_parent("proj-a"))
        .await
        .unwrap();
    let second = store
        .create(NewRecord::new(EntityKind::Task, "Logout").with_parent(&first))
        .await
        .unwrap();
    // first -> second -> first, plus a self link on second.
    store
        .update(
            EntityKind::Task,
            &first,
            RecordPatch {
                parent_id: Some(second.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let lone = store
        .create(NewRecord::new(EntityKind::Task, "Signup").with_parent("proj-b"))
        .await
        .unwrap();
    store
        .update(
            EntityKind::Task,
            &lone,
            RecordPatch {
                parent_id: Some(lone.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    tokio::time::timeout(Duration::from_secs(5), store.delete(EntityKind::Task, &first))
        .await
        .expect("delete did not finish")
        .unwrap();
    tokio::time::timeout(Duration::from_secs(5), store.delete(EntityKind::Task, &lone))
        .await
        .expect("delete did not finish")
        .unwrap();

    assert!(store
        .list(EntityKind::Task, &ListFilter::default())
        .await
        .unwrap()
        .is_empty());

    store.close().await;
}

#[tokio::test]
async fn test_update_parent_against_sqlite() {
    let (store, _dir) = create_test_store().await;
    let store = Arc::new(store);
    let out = BufferSink::new();
    let mut interpreter =
        Interpreter::new(store.clone(), Arc::new(LogNotifier), Box::new(out.clone()));

    interpreter.handle_command("create program Platform").await;
    let program = created_id(&out.lines()[0]);
    out.clear();
    interpreter
        .handle_command(&format!("create project Website parent:{program}"))
        .await;
    let website = created_id(&out.lines()[0]);
    out.clear();
    interpreter
        .handle_command(&format!("create project Mobile parent:{program}"))
        .await;
    let mobile = created_id(&out.lines()[0]);
    out.clear();
    interpreter
        .handle_command(&format!("create task Login parent:{website}"))
        .await;
    let task = created_id(&out.lines()[0]);

    for (value, expected) in [
        ("\"\"".to_string(), "Error: Parent id cannot be empty.".to_string()),
        (task.clone(), "Error: A task cannot be its own parent.".to_string()),
        (program.clone(), format!("Error: Project '{program}' not found.")),
    ] {
        out.clear();
        interpreter
            .handle_command(&format!("update task {task} parent:{value}"))
            .await;
        assert_eq!(out.lines()[0], expected);
    }
    let record = store.get(EntityKind::Task, &task).await.unwrap().unwrap();
    assert_eq!(record.parent_id.as_deref(), Some(website.as_str()));

    out.clear();
    interpreter
        .handle_command(&format!("update task {task} parent:{mobile}"))
        .await;
    assert_eq!(
        out.lines(),
        vec![format!("Updated task 'Login' (id: {task}): parent")]
    );
    let record = store.get(EntityKind::Task, &task).await.unwrap().unwrap();
    assert_eq!(record.parent_id.as_deref(), Some(mobile.as_str()));

    // The removed task no longer hangs a cascade.
    out.clear();
    tokio::time::timeout(
        Duration::from_secs(5),
        interpreter.handle_command(&format!("rm program {program}")),
    )
    .await
    .expect("remove did not finish");
    assert!(store.get(EntityKind::Task, &task).await.unwrap().is_none());

    store.close().await;
}

#[tokio::test]
async fn test_interpreter_against_sqlite() {
    let (store, _dir) = create_test_store().await;
    let store = Arc::new(store);
    let out = BufferSink::new();
    let mut interpreter =
        Interpreter::new(store.clone(), Arc::new(LogNotifier), Box::new(out.clone()));

    interpreter.handle_command("create program Platform").await;
    let program = created_id(&out.lines()[0]);

    interpreter
        .handle_command(&format!("create project \"Website\" parent:{program}"))
        .await;
    out.clear();

    interpreter.handle_command("ls projects").await;
    let lines = out.lines();
    assert_eq!(lines[0], "Projects (1):");
    assert!(lines[1].contains("Website"));

    store.close().await;
}
