//! `list` handler.

use super::{entity_kind, summary_line, HandlerContext};
use crate::commands::prompt::Step;
use crate::commands::schema::{check_enum, EntityKind, PRIORITIES, STATUSES};
use crate::commands::tokenizer::ParsedCommand;
use crate::error::{BrewError, Result};
use crate::store::ListFilter;

const PARENT_KEYS: &[&str] = &["parent", "parentid", "parent_id", "parent-id"];

/// Handle `list <entity> [--parent] [--status] [--priority] [--limit] [--all]`.
pub async fn handle_list(cmd: &ParsedCommand, ctx: &mut HandlerContext<'_>) -> Result<Step> {
    let kind = entity_kind(cmd)?;
    let filter = build_filter(cmd, kind, ctx)?;

    let records = ctx.store.list(kind, &filter).await?;
    ctx.session.last_filter = Some(filter);

    if records.is_empty() {
        ctx.say(format!("No {} found.", kind.plural()));
        return Ok(Step::Done);
    }

    ctx.say(format!("{} ({}):", capitalize(kind.plural()), records.len()));
    for record in &records {
        ctx.say(summary_line(record));
    }
    Ok(Step::Done)
}

fn build_filter(cmd: &ParsedCommand, kind: EntityKind, ctx: &HandlerContext<'_>) -> Result<ListFilter> {
    let mut filter = ListFilter {
        parent_id: PARENT_KEYS.iter().find_map(|k| flag(cmd, k)).map(str::to_string),
        ..Default::default()
    };

    if let Some(status) = flag(cmd, "status") {
        filter.status = Some(check_enum("status", status, STATUSES)?);
    }
    if let Some(priority) = flag(cmd, "priority") {
        filter.priority = Some(check_enum("priority", priority, PRIORITIES)?);
    }
    if let Some(limit) = flag(cmd, "limit") {
        let limit = limit
            .parse::<u32>()
            .map_err(|_| BrewError::input(format!("Invalid limit '{}'. Use a whole number.", limit)))?;
        filter.limit = Some(limit);
    }

    let all = cmd
        .flags
        .iter()
        .any(|(k, v)| k.eq_ignore_ascii_case("all") && v != "false" && v != "0");
    if filter.parent_id.is_none() && !all {
        filter.parent_id = ctx.session.default_parent(kind).map(str::to_string);
    }

    Ok(filter)
}

/// Looks up a flag ignoring the case of its key.
fn flag<'a>(cmd: &'a ParsedCommand, key: &str) -> Option<&'a str> {
    cmd.flags
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.as_str())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
