//! The command interpreter.
//!
//! One interpreter serves one console. Every submitted line goes first to
//! [`Interpreter::handle_prompt_input`]; only when no question is pending does
//! it go through [`Interpreter::handle_command`]:
//! history → shortcut → tokenize → normalize → help/man → validate → dispatch.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::commands::handlers::{system, HandlerContext};
use crate::commands::normalize::normalize_command;
use crate::commands::output::OutputSink;
use crate::commands::prompt::{PromptEngine, PromptInput, Step};
use crate::commands::router::dispatch;
use crate::commands::shortcuts::expand_shortcut;
use crate::commands::tokenizer::tokenize;
use crate::commands::validator::validate;
use crate::error::Result;
use crate::session::Session;
use crate::store::{ChangeNotifier, RecordStore};

/// Turns lines of input into store calls and output.
pub struct Interpreter {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn ChangeNotifier>,
    sink: Box<dyn OutputSink>,
    session: Session,
    prompt: PromptEngine,
}

impl Interpreter {
    pub fn new(
        store: Arc<dyn RecordStore>,
        notifier: Arc<dyn ChangeNotifier>,
        sink: Box<dyn OutputSink>,
    ) -> Self {
        Self {
            store,
            notifier,
            sink,
            session: Session::new(),
            prompt: PromptEngine::new(),
        }
    }

    /// Replaces the session, e.g. to start in a configured context.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// True while a question is waiting for an answer.
    pub fn is_prompt_mode(&self) -> bool {
        self.prompt.is_prompting()
    }

    /// The pending question as shown on screen, e.g. `Title*: `.
    pub fn current_question(&self) -> Option<String> {
        self.prompt.current_question().map(|q| q.render())
    }

    /// Offers a line to the pending question. Returns false if nothing was
    /// pending, in which case the line should go to [`Self::handle_command`].
    pub async fn handle_prompt_input(&mut self, line: &str) -> bool {
        let (answer, continuation) = match self.prompt.answer(line, self.sink.as_mut()) {
            PromptInput::Idle => return false,
            PromptInput::Retry => return true,
            PromptInput::Accepted {
                answer,
                continuation,
            } => (answer, continuation),
        };

        let result = {
            let mut ctx = HandlerContext {
                store: self.store.as_ref(),
                notifier: self.notifier.as_ref(),
                session: &mut self.session,
                out: self.sink.as_mut(),
            };
            continuation.resume(answer, &mut ctx).await
        };
        self.finish(result);
        true
    }

    /// Runs one command line.
    pub async fn handle_command(&mut self, line: &str) {
        self.session.push_history(line);

        let expanded = expand_shortcut(line);
        let mut cmd = tokenize(&expanded);
        normalize_command(&mut cmd);
        debug!("Parsed command: {:?}", cmd);

        match cmd.verb.as_deref() {
            Some("help") => {
                match cmd.entity.as_deref() {
                    Some(topic) => system::handle_man(Some(topic), self.sink.as_mut()),
                    None => system::handle_help(self.sink.as_mut()),
                }
                return;
            }
            Some("man") => {
                system::handle_man(cmd.entity.as_deref(), self.sink.as_mut());
                return;
            }
            _ => {}
        }

        let validation = validate(&cmd);
        if !validation.valid {
            if let Some(error) = &validation.error {
                self.sink.writeln(error);
            }
            if let Some(suggestions) = &validation.suggestions {
                self.sink
                    .writeln(&format!("Suggestions: {}", suggestions.join(", ")));
            }
            return;
        }

        let result = {
            let mut ctx = HandlerContext {
                store: self.store.as_ref(),
                notifier: self.notifier.as_ref(),
                session: &mut self.session,
                out: self.sink.as_mut(),
            };
            dispatch(&cmd, &mut ctx).await
        };
        self.finish(result);
    }

    /// Installs a follow-up question or reports a handler error.
    fn finish(&mut self, result: Result<Step>) {
        match result {
            Ok(Step::Done) => {}
            Ok(Step::Ask(question, continuation)) => {
                if let Err(e) = self.prompt.prompt(question, continuation, self.sink.as_mut()) {
                    warn!("Dropped follow-up question: {}", e);
                    self.sink.error(&e.to_string());
                }
            }
            Err(e) => {
                debug!("Command failed ({}): {}", e.category(), e);
                self.sink.error(&e.to_string());
            }
        }
    }
}
