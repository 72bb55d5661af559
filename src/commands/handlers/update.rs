//! `update` handler.

use tracing::info;

use super::{entity_kind, fetch, record_id, HandlerContext};
use crate::commands::prompt::Step;
use crate::commands::schema::{self, EntityKind, TITLE};
use crate::commands::tokenizer::ParsedCommand;
use crate::commands::validator::UPDATE_SWITCHES;
use crate::error::{BrewError, Result};
use crate::store::RecordPatch;

/// Handle `update <entity> <id> field:value...`.
pub async fn handle_update(cmd: &ParsedCommand, ctx: &mut HandlerContext<'_>) -> Result<Step> {
    let kind = entity_kind(cmd)?;
    let id = record_id(cmd)?;

    let fields = schema::collect_fields(kind, &cmd.flags, UPDATE_SWITCHES)?;
    let patch = RecordPatch::from_fields(&fields);
    if patch.is_empty() {
        return Err(BrewError::input(format!(
            "Nothing to update. Give at least one field, e.g. update {} {} status:done",
            kind, id
        )));
    }
    if fields.get(TITLE).is_some_and(|t| t.is_empty()) {
        return Err(BrewError::input("Title cannot be empty."));
    }

    let mut record = fetch(ctx, kind, id).await?;
    if let Some(parent) = &patch.parent_id {
        check_parent(ctx, kind, id, parent).await?;
    }
    ctx.store.update(kind, id, patch.clone()).await?;
    patch.apply(&mut record);
    info!("Updated {} {}", kind, id);

    let changed: Vec<&str> = fields.keys().copied().collect();
    ctx.say(format!(
        "Updated {} '{}' (id: {}): {}",
        kind,
        record.title,
        record.id,
        changed.join(", ")
    ));
    ctx.notifier.data_changed(kind);
    Ok(Step::Done)
}

/// Checks a new parent: it must exist with the kind one level up and must not
/// be the record itself or sit below it.
async fn check_parent(
    ctx: &HandlerContext<'_>,
    kind: EntityKind,
    id: &str,
    parent: &str,
) -> Result<()> {
    if parent.is_empty() {
        return Err(BrewError::input("Parent id cannot be empty."));
    }
    if parent == id {
        return Err(BrewError::input(format!(
            "A {} cannot be its own parent.",
            kind
        )));
    }
    let parent_kind = kind
        .parent()
        .ok_or_else(|| BrewError::input(format!("A {} has no parent.", kind)))?;

    let mut ancestor = fetch(ctx, parent_kind, parent).await?;
    let mut ancestor_kind = parent_kind;
    // Walk to the top; stored links may already loop back.
    while let (Some(up_id), Some(up_kind)) =
        (ancestor.parent_id.clone(), ancestor_kind.parent())
    {
        if up_id == id {
            return Err(BrewError::input(format!(
                "Cannot move {} '{}' under its own descendant '{}'.",
                kind, id, parent
            )));
        }
        match ctx.store.get(up_kind, &up_id).await? {
            Some(next) => {
                ancestor = next;
                ancestor_kind = up_kind;
            }
            None => break,
        }
    }
    Ok(())
}
