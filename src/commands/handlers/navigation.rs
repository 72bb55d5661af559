//! `use` handler: moves the session between programs and projects.

use super::{entity_kind, fetch, HandlerContext};
use crate::commands::prompt::Step;
use crate::commands::schema::EntityKind;
use crate::commands::tokenizer::ParsedCommand;
use crate::commands::validator::USE_NONE;
use crate::error::{BrewError, Result};

/// Handle `use`, `use none` and `use program|project <id>`.
pub async fn handle_use(cmd: &ParsedCommand, ctx: &mut HandlerContext<'_>) -> Result<Step> {
    let Some(entity) = cmd.entity.as_deref() else {
        show_context(ctx).await?;
        return Ok(Step::Done);
    };

    if entity.eq_ignore_ascii_case(USE_NONE) {
        ctx.session.clear_context();
        ctx.say("Context cleared.");
        return Ok(Step::Done);
    }

    let kind = entity_kind(cmd)?;
    if !matches!(kind, EntityKind::Program | EntityKind::Project) {
        return Err(BrewError::input(
            "Only a program or a project can be the current context.",
        ));
    }
    let id = cmd
        .target_or_id()
        .ok_or_else(|| BrewError::input(format!("Usage: use {} <id>", kind)))?;

    let record = fetch(ctx, kind, id).await?;
    match kind {
        EntityKind::Project => ctx.session.set_project(&record.id, record.parent_id.clone()),
        _ => ctx.session.set_program(&record.id),
    }

    tracing::debug!("Context set to {} {}", kind, record.id);
    ctx.say(format!("Now in {} '{}' (id: {})", kind, record.title, record.id));
    Ok(Step::Done)
}

async fn show_context(ctx: &mut HandlerContext<'_>) -> Result<()> {
    let current = [
        (EntityKind::Program, ctx.session.current_program_id().map(str::to_string)),
        (EntityKind::Project, ctx.session.current_project_id().map(str::to_string)),
    ];

    if current.iter().all(|(_, id)| id.is_none()) {
        ctx.say("No context set. Use 'use program <id>' or 'use project <id>'.");
        return Ok(());
    }

    for (kind, id) in current {
        let Some(id) = id else { continue };
        let title = ctx.store.get(kind, &id).await?.map(|r| r.title);
        match title {
            Some(title) => ctx.say(format!("{}: {} ({})", kind.display_name(), title, id)),
            None => ctx.say(format!("{}: {} (missing)", kind.display_name(), id)),
        }
    }
    Ok(())
}
