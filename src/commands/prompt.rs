//! Interactive question/answer engine.
//!
//! A handler that needs more input returns [`Step::Ask`] with a [`Question`]
//! and the [`Continuation`] to run on the answer. The engine keeps at most one
//! pending question, so the console knows whether the next line is an answer
//! or a new command.

use std::fmt;

use async_trait::async_trait;

use super::handlers::HandlerContext;
use super::output::OutputSink;
use crate::error::{BrewError, Result};

/// Notice written when a required question gets an empty answer.
pub const REQUIRED_NOTICE: &str = "This field is required.";

/// A question shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub label: String,
    pub required: bool,
    pub default: Option<String>,
}

impl Question {
    /// A question that must be answered.
    pub fn required(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            required: true,
            default: None,
        }
    }

    /// A question that may be skipped with an empty answer.
    pub fn optional(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            required: false,
            default: None,
        }
    }

    /// Sets the answer used when the user enters nothing.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Renders the question as shown on screen, e.g. `Title*: `.
    pub fn render(&self) -> String {
        let mut text = self.label.clone();
        if self.required {
            text.push('*');
        }
        if let Some(default) = &self.default {
            text.push_str(&format!(" [{}]", default));
        }
        text.push_str(": ");
        text
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// What a handler or continuation wants to happen next.
pub enum Step {
    /// The command is finished.
    Done,
    /// Ask a question and resume with the answer.
    Ask(Question, Box<dyn Continuation>),
}

impl Step {
    pub fn ask(question: Question, continuation: impl Continuation + 'static) -> Self {
        Self::Ask(question, Box::new(continuation))
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done => f.write_str("Done"),
            Self::Ask(question, _) => f.debug_tuple("Ask").field(question).finish(),
        }
    }
}

/// The rest of a command, waiting for an answer.
#[async_trait]
pub trait Continuation: Send {
    /// Runs with the (trimmed, default-substituted) answer.
    async fn resume(self: Box<Self>, answer: String, ctx: &mut HandlerContext<'_>) -> Result<Step>;
}

/// A question on screen and the continuation that owns its answer.
pub struct PendingQuestion {
    pub question: Question,
    pub continuation: Box<dyn Continuation>,
}

impl fmt::Debug for PendingQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingQuestion")
            .field("question", &self.question)
            .finish_non_exhaustive()
    }
}

/// Whether a question is pending.
#[derive(Debug, Default)]
pub enum PromptState {
    #[default]
    Idle,
    Prompting(PendingQuestion),
}

/// Result of offering a line to the engine.
pub enum PromptInput {
    /// Nothing was pending; the line is a command.
    Idle,
    /// The answer was rejected and the question asked again.
    Retry,
    /// The answer was taken; run the continuation with it.
    Accepted {
        answer: String,
        continuation: Box<dyn Continuation>,
    },
}

impl fmt::Debug for PromptInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("Idle"),
            Self::Retry => f.write_str("Retry"),
            Self::Accepted { answer, .. } => f
                .debug_struct("Accepted")
                .field("answer", answer)
                .finish_non_exhaustive(),
        }
    }
}

/// Holds the single pending question, if any.
#[derive(Debug, Default)]
pub struct PromptEngine {
    state: PromptState,
}

impl PromptEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_prompting(&self) -> bool {
        matches!(self.state, PromptState::Prompting(_))
    }

    /// The question waiting for an answer.
    pub fn current_question(&self) -> Option<&Question> {
        match &self.state {
            PromptState::Idle => None,
            PromptState::Prompting(pending) => Some(&pending.question),
        }
    }

    /// Asks a question. Fails if another question is still pending.
    pub fn prompt(
        &mut self,
        question: Question,
        continuation: Box<dyn Continuation>,
        out: &mut dyn OutputSink,
    ) -> Result<()> {
        if let PromptState::Prompting(pending) = &self.state {
            return Err(BrewError::prompt(format!(
                "Already waiting for an answer to '{}'",
                pending.question.label
            )));
        }

        out.writeln(&question.render());
        self.state = PromptState::Prompting(PendingQuestion {
            question,
            continuation,
        });
        Ok(())
    }

    /// Offers a line as the answer to the pending question.
    pub fn answer(&mut self, line: &str, out: &mut dyn OutputSink) -> PromptInput {
        let pending = match std::mem::take(&mut self.state) {
            PromptState::Idle => return PromptInput::Idle,
            PromptState::Prompting(pending) => pending,
        };

        let trimmed = line.trim();
        let answer = if trimmed.is_empty() {
            match &pending.question.default {
                Some(default) => default.clone(),
                None if pending.question.required => {
                    out.writeln(REQUIRED_NOTICE);
                    out.writeln(&pending.question.render());
                    self.state = PromptState::Prompting(pending);
                    return PromptInput::Retry;
                }
                None => String::new(),
            }
        } else {
            trimmed.to_string()
        };

        PromptInput::Accepted {
            answer,
            continuation: pending.continuation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::output::BufferSink;
    use pretty_assertions::assert_eq;

    struct Noop;

    #[async_trait]
    impl Continuation for Noop {
        async fn resume(self: Box<Self>, _answer: String, _ctx: &mut HandlerContext<'_>) -> Result<Step> {
            Ok(Step::Done)
        }
    }

    struct Echo;

    #[async_trait]
    impl Continuation for Echo {
        async fn resume(self: Box<Self>, answer: String, ctx: &mut HandlerContext<'_>) -> Result<Step> {
            ctx.say(format!("got {answer}"));
            Ok(Step::Done)
        }
    }

    #[test]
    fn test_render() {
        assert_eq!(Question::required("Title").render(), "Title*: ");
        assert_eq!(Question::optional("Description").render(), "Description: ");
        assert_eq!(
            Question::required("Parent program id")
                .with_default("abc")
                .render(),
            "Parent program id* [abc]: "
        );
    }

    #[test]
    fn test_idle_engine_does_not_consume() {
        let mut engine = PromptEngine::new();
        let mut out = BufferSink::new();
        assert!(matches!(engine.answer("list tasks", &mut out), PromptInput::Idle));
        assert!(out.lines().is_empty());
    }

    #[test]
    fn test_prompt_writes_question() {
        let mut engine = PromptEngine::new();
        let mut out = BufferSink::new();
        engine
            .prompt(Question::required("Title"), Box::new(Noop), &mut out)
            .unwrap();
        assert!(engine.is_prompting());
        assert_eq!(out.lines(), vec!["Title*: "]);
        assert_eq!(engine.current_question().map(|q| q.label.as_str()), Some("Title"));
    }

    #[test]
    fn test_second_prompt_is_rejected() {
        let mut engine = PromptEngine::new();
        let mut out = BufferSink::new();
        engine
            .prompt(Question::required("Title"), Box::new(Noop), &mut out)
            .unwrap();
        let err = engine
            .prompt(Question::optional("Other"), Box::new(Noop), &mut out)
            .unwrap_err();
        assert!(err.to_string().contains("Title"));
        assert_eq!(engine.current_question().map(|q| q.label.as_str()), Some("Title"));
    }

    #[test]
    fn test_empty_required_answer_retries() {
        let mut engine = PromptEngine::new();
        let mut out = BufferSink::new();
        engine
            .prompt(Question::required("Title"), Box::new(Noop), &mut out)
            .unwrap();

        assert!(matches!(engine.answer("   ", &mut out), PromptInput::Retry));
        assert!(engine.is_prompting());
        assert_eq!(out.lines(), vec!["Title*: ", REQUIRED_NOTICE, "Title*: "]);
    }

    #[test]
    fn test_answer_is_trimmed() {
        let mut engine = PromptEngine::new();
        let mut out = BufferSink::new();
        engine
            .prompt(Question::required("Title"), Box::new(Noop), &mut out)
            .unwrap();

        match engine.answer("  Platform  ", &mut out) {
            PromptInput::Accepted { answer, .. } => assert_eq!(answer, "Platform"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(!engine.is_prompting());
    }

    #[test]
    fn test_default_substituted() {
        let mut engine = PromptEngine::new();
        let mut out = BufferSink::new();
        engine
            .prompt(
                Question::required("Parent program id").with_default("p1"),
                Box::new(Noop),
                &mut out,
            )
            .unwrap();

        match engine.answer("", &mut out) {
            PromptInput::Accepted { answer, .. } => assert_eq!(answer, "p1"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_accepted_continuation_resumes() {
        let mut fixture = crate::commands::handlers::test_support::Fixture::new();
        let mut engine = PromptEngine::new();
        let mut out = BufferSink::new();
        engine
            .prompt(Question::required("Title"), Box::new(Echo), &mut out)
            .unwrap();

        let PromptInput::Accepted {
            answer,
            continuation,
        } = engine.answer("Platform", &mut out)
        else {
            panic!("answer not accepted");
        };

        let (mut ctx, lines) = fixture.ctx();
        let step = tokio_test::block_on(continuation.resume(answer, &mut ctx)).unwrap();
        assert!(matches!(step, Step::Done));
        assert_eq!(lines.lines(), vec!["got Platform"]);
    }

    #[test]
    fn test_empty_optional_answer_accepted() {
        let mut engine = PromptEngine::new();
        let mut out = BufferSink::new();
        engine
            .prompt(Question::optional("Description"), Box::new(Noop), &mut out)
            .unwrap();

        match engine.answer("", &mut out) {
            PromptInput::Accepted { answer, .. } => assert!(answer.is_empty()),
            other => panic!("unexpected {other:?}"),
        }
    }
}
