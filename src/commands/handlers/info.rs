//! `info` handler.

use super::{entity_kind, fetch, record_id, HandlerContext};
use crate::commands::prompt::Step;
use crate::commands::schema::{EntityKind, TITLE};
use crate::commands::tokenizer::ParsedCommand;
use crate::error::Result;
use crate::store::{ListFilter, Record};

/// Handle `info <entity> <id>`.
pub async fn handle_info(cmd: &ParsedCommand, ctx: &mut HandlerContext<'_>) -> Result<Step> {
    let kind = entity_kind(cmd)?;
    let id = record_id(cmd)?;
    let record = fetch(ctx, kind, id).await?;

    let mut lines = describe(&record);

    if let Some(child) = child_kind(kind) {
        let filter = ListFilter {
            parent_id: Some(record.id.clone()),
            ..Default::default()
        };
        let children = ctx.store.list(child, &filter).await?;
        lines.push(format!("  {:<12} {}", format!("{}:", child.plural()), children.len()));
    }

    for line in lines {
        ctx.say(line);
    }
    Ok(Step::Done)
}

/// Every field of a record, schema fields first.
fn describe(record: &Record) -> Vec<String> {
    let mut lines = vec![format!("{} {}", record.kind.display_name(), record.id)];
    let mut push = |name: &str, value: &str| lines.push(format!("  {:<12} {}", format!("{}:", name), value));

    for field in record.kind.fields() {
        if let Some(value) = record.field(field.name) {
            push(field.name, value);
        }
    }
    for (name, value) in &record.attributes {
        if record.kind.field(name).is_none() && name != TITLE {
            push(name, value);
        }
    }
    if !record.created_at.is_empty() {
        push("created", &record.created_at);
    }
    if !record.updated_at.is_empty() {
        push("updated", &record.updated_at);
    }

    lines
}

fn child_kind(kind: EntityKind) -> Option<EntityKind> {
    EntityKind::ALL.into_iter().find(|k| k.parent() == Some(kind))
}
