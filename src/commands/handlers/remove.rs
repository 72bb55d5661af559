//! `remove` handler.

use tracing::info;

use super::{entity_kind, fetch, record_id, HandlerContext};
use crate::commands::prompt::Step;
use crate::commands::tokenizer::ParsedCommand;
use crate::error::Result;

/// Handle `remove <entity> <id>`. Records below the removed one go with it.
pub async fn handle_remove(cmd: &ParsedCommand, ctx: &mut HandlerContext<'_>) -> Result<Step> {
    let kind = entity_kind(cmd)?;
    let id = record_id(cmd)?;

    let record = fetch(ctx, kind, id).await?;
    ctx.store.delete(kind, id).await?;
    info!("Removed {} {}", kind, id);

    ctx.session.forget(id);
    ctx.say(format!("Removed {} '{}' (id: {})", kind, record.title, record.id));
    ctx.notifier.data_changed(kind);
    Ok(Step::Done)
}
