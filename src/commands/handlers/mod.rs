//! Command handlers for taskbrew.
//!
//! Each handler takes the parsed command and a [`HandlerContext`], writes its
//! output to the sink and returns a [`Step`](super::prompt::Step). A handler
//! that needs more input returns `Step::Ask` and the router installs the
//! question.

pub mod create;
pub mod info;
pub mod list;
pub mod navigation;
pub mod remove;
pub mod system;
pub mod update;

use super::output::OutputSink;
use super::schema::EntityKind;
use super::tokenizer::ParsedCommand;
use crate::error::{BrewError, Result};
use crate::session::Session;
use crate::store::{ChangeNotifier, Record, RecordStore};

/// Context provided to command handlers and continuations.
pub struct HandlerContext<'a> {
    /// Record storage.
    pub store: &'a dyn RecordStore,
    /// Told after every successful write.
    pub notifier: &'a dyn ChangeNotifier,
    /// Context and history for this console.
    pub session: &'a mut Session,
    /// Where output lines go.
    pub out: &'a mut dyn OutputSink,
}

impl HandlerContext<'_> {
    /// Writes one line of output.
    pub fn say(&mut self, line: impl AsRef<str>) {
        self.out.writeln(line.as_ref());
    }
}

/// Returns the entity kind of a validated command.
pub(crate) fn entity_kind(cmd: &ParsedCommand) -> Result<EntityKind> {
    cmd.entity
        .as_deref()
        .and_then(EntityKind::parse)
        .ok_or_else(|| BrewError::internal("Command reached a handler without a valid entity"))
}

/// Returns the record id of a validated command.
pub(crate) fn record_id(cmd: &ParsedCommand) -> Result<&str> {
    cmd.target_or_id()
        .ok_or_else(|| BrewError::internal("Command reached a handler without a record id"))
}

/// Fetches a record, turning absence into a user-facing error.
pub(crate) async fn fetch(ctx: &HandlerContext<'_>, kind: EntityKind, id: &str) -> Result<Record> {
    ctx.store
        .get(kind, id)
        .await?
        .ok_or_else(|| BrewError::store(format!("{} '{}' not found.", kind.display_name(), id)))
}

/// One-line summary of a record: `  <id>  <title>` plus status and priority.
pub(crate) fn summary_line(record: &Record) -> String {
    let mut line = format!("  {}  {}", record.id, record.title);
    let tags: Vec<&str> = [record.status(), record.priority()]
        .into_iter()
        .flatten()
        .collect();
    if !tags.is_empty() {
        line.push_str(&format!("  [{}]", tags.join(", ")));
    }
    line
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(attributes: &[(&str, &str)]) -> Record {
        Record {
            id: "abc".to_string(),
            kind: EntityKind::Task,
            title: "Fix bug".to_string(),
            parent_id: None,
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(summary_line(&record(&[])), "  abc  Fix bug");
        assert_eq!(
            summary_line(&record(&[("status", "todo"), ("priority", "high")])),
            "  abc  Fix bug  [todo, high]"
        );
    }

    #[test]
    fn test_entity_kind_requires_valid_entity() {
        assert!(entity_kind(&test_support::parse("list task")).is_ok());
        assert!(entity_kind(&test_support::parse("list")).is_err());
    }
}
