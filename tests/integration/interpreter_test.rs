//! End-to-end tests driving the interpreter the way the console does.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use taskbrew::commands::output::BufferSink;
use taskbrew::commands::schema::EntityKind;
use taskbrew::interpreter::Interpreter;
use taskbrew::session::{Session, MAX_HISTORY_SIZE};
use taskbrew::store::{FailingStore, MemoryStore, RecordStore, RecordingNotifier};

struct Harness {
    interpreter: Interpreter,
    store: Arc<MemoryStore>,
    notifier: RecordingNotifier,
    out: BufferSink,
}

impl Harness {
    fn new() -> Self {
        Self::with_session(Session::new())
    }

    fn with_session(session: Session) -> Self {
        let store = Arc::new(MemoryStore::new());
        let notifier = RecordingNotifier::new();
        let out = BufferSink::new();
        let interpreter =
            Interpreter::new(store.clone(), Arc::new(notifier.clone()), Box::new(out.clone()))
                .with_session(session);
        Self {
            interpreter,
            store,
            notifier,
            out,
        }
    }

    /// Submits a line the way the console does.
    async fn submit(&mut self, line: &str) {
        if !self.interpreter.handle_prompt_input(line).await {
            self.interpreter.handle_command(line).await;
        }
    }
}

#[tokio::test]
async fn test_quick_create_with_explicit_parent() {
    let mut h = Harness::new();
    h.submit("create project \"Website\" parent:abc123").await;

    let creates = h.store.creates();
    assert_eq!(creates.len(), 1);
    assert_eq!(creates[0].kind, EntityKind::Project);
    assert_eq!(creates[0].title, "Website");
    assert_eq!(creates[0].parent_id.as_deref(), Some("abc123"));
    assert!(!h.interpreter.is_prompt_mode());
    assert_eq!(
        h.out.lines(),
        vec!["Created project 'Website' (id: mem-1)"]
    );
    assert_eq!(h.notifier.calls(), vec![EntityKind::Project]);
}

#[tokio::test]
async fn test_context_supplies_parents() {
    let mut h = Harness::new();
    h.submit("create program Platform").await;
    h.submit("use program mem-1").await;
    h.submit("create project Website").await;
    h.submit("use project mem-2").await;
    h.submit("create task \"Fix the login bug\" priority:high").await;

    assert_eq!(h.store.creates().len(), 3);
    let task = h
        .store
        .get(EntityKind::Task, "mem-3")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(task.parent_id.as_deref(), Some("mem-2"));
    assert_eq!(task.priority(), Some("high"));

    let session = h.interpreter.session();
    assert_eq!(session.current_program_id(), Some("mem-1"));
    assert_eq!(session.current_project_id(), Some("mem-2"));
}

#[tokio::test]
async fn test_guided_program_create() {
    let mut h = Harness::new();
    h.submit("create program --guided").await;
    assert!(h.interpreter.is_prompt_mode());
    assert_eq!(h.out.lines(), vec!["Title*: "]);

    h.submit("Platform").await;
    h.submit("Shared services").await;
    h.submit("teal").await;

    assert!(!h.interpreter.is_prompt_mode());
    let creates = h.store.creates();
    assert_eq!(creates.len(), 1);
    assert_eq!(creates[0].title, "Platform");
    assert_eq!(
        creates[0].attributes.get("description").map(String::as_str),
        Some("Shared services")
    );
    assert_eq!(
        creates[0].attributes.get("color").map(String::as_str),
        Some("teal")
    );
}

#[tokio::test]
async fn test_guided_create_reissues_title_on_empty_answer() {
    let mut h = Harness::new();
    h.submit("create task").await;
    h.submit("").await;
    h.submit("   ").await;

    assert!(h.interpreter.is_prompt_mode());
    assert_eq!(
        h.out.lines(),
        vec![
            "Title*: ",
            "This field is required.",
            "Title*: ",
            "This field is required.",
            "Title*: ",
        ]
    );
    assert!(h.store.creates().is_empty());
}

#[tokio::test]
async fn test_guided_task_uses_context_default_and_reasks_bad_values() {
    let mut h = Harness::with_session(Session::with_context(
        Some("p1".to_string()),
        Some("proj1".to_string()),
    ));
    h.submit("create task --guided").await;
    h.submit("Write docs").await;
    assert_eq!(
        h.interpreter.current_question().as_deref(),
        Some("Parent project id* [proj1]: ")
    );
    h.submit("").await;
    h.submit("").await;
    h.submit("hgh").await;
    assert!(h.interpreter.is_prompt_mode());
    h.submit("high").await;
    h.submit("").await;
    h.submit("").await;

    assert!(!h.interpreter.is_prompt_mode());
    let creates = h.store.creates();
    assert_eq!(creates.len(), 1);
    assert_eq!(creates[0].title, "Write docs");
    assert_eq!(creates[0].parent_id.as_deref(), Some("proj1"));
    assert_eq!(
        creates[0].attributes.get("priority").map(String::as_str),
        Some("high")
    );
    assert!(!creates[0].attributes.contains_key("description"));
}

#[tokio::test]
async fn test_commands_after_store_failure() {
    let out = BufferSink::new();
    let mut interpreter = Interpreter::new(
        Arc::new(FailingStore::new("disk I/O error")),
        Arc::new(RecordingNotifier::new()),
        Box::new(out.clone()),
    );

    interpreter.handle_command("create program Platform").await;
    interpreter.handle_command("help").await;

    let lines = out.lines();
    assert_eq!(lines[0], "Error: disk I/O error");
    assert!(lines.len() > 1);
    assert!(!interpreter.is_prompt_mode());
}

#[tokio::test]
async fn test_update_info_remove_flow() {
    let mut h = Harness::new();
    h.submit("create program Platform").await;
    h.submit("create project Website parent:mem-1").await;
    h.submit("update project mem-2 status:done").await;
    h.out.clear();

    h.submit("info project mem-2").await;
    let text = h.out.text();
    assert!(text.contains("Project mem-2"));
    assert!(text.contains("done"));

    h.submit("rm program mem-1").await;
    assert!(h.store.is_empty());
    assert_eq!(
        h.notifier.calls(),
        vec![
            EntityKind::Program,
            EntityKind::Project,
            EntityKind::Project,
            EntityKind::Program,
        ]
    );
}

#[tokio::test]
async fn test_history_is_capped() {
    let mut h = Harness::new();
    for i in 0..MAX_HISTORY_SIZE + 5 {
        h.submit(&format!("bogus{i}")).await;
    }

    let history: Vec<&str> = h.interpreter.session().history().collect();
    assert_eq!(history.len(), MAX_HISTORY_SIZE);
    assert_eq!(history[0], "bogus5");
    assert_eq!(history[MAX_HISTORY_SIZE - 1], format!("bogus{}", MAX_HISTORY_SIZE + 4));
}
