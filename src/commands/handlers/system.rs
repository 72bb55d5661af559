//! Built-in handlers: help, man, history, and verbs without an implementation.

use super::HandlerContext;
use crate::commands::definitions::{find_verb, verb_names, Verb};
use crate::commands::fuzzy::{find_closest_match, DEFAULT_THRESHOLD};
use crate::commands::help::{entity_page, manual, manual_page, quick_reference};
use crate::commands::output::OutputSink;
use crate::commands::prompt::Step;
use crate::commands::schema::EntityKind;
use crate::error::Result;

/// Handle `help`.
pub fn handle_help(out: &mut dyn OutputSink) {
    out.write_block(&quick_reference());
}

/// Handle `man [topic]`. A topic is a verb (or alias) or an entity.
pub fn handle_man(topic: Option<&str>, out: &mut dyn OutputSink) {
    let Some(topic) = topic else {
        out.write_block(&manual());
        return;
    };

    if let Some(def) = find_verb(topic) {
        out.write_block(&manual_page(def.verb));
        return;
    }
    if let Some(kind) = EntityKind::parse(topic) {
        out.write_block(&entity_page(kind));
        return;
    }

    let mut topics = verb_names();
    topics.extend(EntityKind::NAMES);
    match find_closest_match(topic, &topics, DEFAULT_THRESHOLD) {
        Some(closest) => out.writeln(&format!(
            "No manual entry for '{}'. Did you mean '{}'?",
            topic, closest
        )),
        None => out.writeln(&format!(
            "No manual entry for '{}'. Type 'man' for the full manual.",
            topic
        )),
    }
}

/// Handle `history`: numbered, oldest first.
pub fn handle_history(ctx: &mut HandlerContext<'_>) -> Result<Step> {
    let lines: Vec<String> = ctx
        .session
        .history()
        .enumerate()
        .map(|(i, line)| format!("{:>4}  {}", i + 1, line))
        .collect();

    if lines.is_empty() {
        ctx.say("No history yet.");
    }
    for line in lines {
        ctx.say(line);
    }
    Ok(Step::Done)
}

/// Handle a recognized verb that has no handler yet.
pub fn handle_not_implemented(verb: Verb, ctx: &mut HandlerContext<'_>) -> Result<Step> {
    ctx.say(format!("\"{}\" is not yet implemented.", verb));
    Ok(Step::Done)
}
