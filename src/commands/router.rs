//! Routes validated commands to their handlers.

use super::definitions::Verb;
use super::handlers::{self, HandlerContext};
use super::prompt::Step;
use super::tokenizer::ParsedCommand;
use crate::error::Result;

/// Dispatches a validated, normalized command by its canonical verb.
pub async fn dispatch(cmd: &ParsedCommand, ctx: &mut HandlerContext<'_>) -> Result<Step> {
    let Some(verb) = cmd.verb.as_deref().and_then(Verb::parse) else {
        let name = cmd.verb.as_deref().unwrap_or_default();
        ctx.say(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            name
        ));
        return Ok(Step::Done);
    };

    tracing::debug!("Dispatching '{}'", verb);
    match verb {
        Verb::List => handlers::list::handle_list(cmd, ctx).await,
        Verb::Create => handlers::create::handle_create(cmd, ctx).await,
        Verb::Info => handlers::info::handle_info(cmd, ctx).await,
        Verb::Update => handlers::update::handle_update(cmd, ctx).await,
        Verb::Remove => handlers::remove::handle_remove(cmd, ctx).await,
        Verb::Use => handlers::navigation::handle_use(cmd, ctx).await,
        Verb::History => handlers::system::handle_history(ctx),
        Verb::Help => {
            handlers::system::handle_help(ctx.out);
            Ok(Step::Done)
        }
        Verb::Man => {
            handlers::system::handle_man(cmd.entity.as_deref(), ctx.out);
            Ok(Step::Done)
        }
        Verb::Move | Verb::Export => handlers::system::handle_not_implemented(verb, ctx),
    }
}
