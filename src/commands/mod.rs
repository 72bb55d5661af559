//! Command parsing and dispatch for taskbrew.
//!
//! Parsing (shortcuts, tokenizer, normalize, validator) is kept apart from
//! execution (router, handlers) so it can be tested without a store.

pub mod definitions;
pub mod fuzzy;
pub mod handlers;
pub mod help;
pub mod normalize;
pub mod output;
pub mod prompt;
pub mod router;
pub mod schema;
pub mod shortcuts;
pub mod tokenizer;
pub mod validator;

pub use definitions::{Verb, VerbCategory, VerbDef, VERBS};
pub use handlers::HandlerContext;
pub use output::OutputSink;
pub use prompt::{Continuation, PromptEngine, PromptState, Question, Step};
pub use schema::EntityKind;
pub use tokenizer::{tokenize, ParsedCommand};
pub use validator::{validate, ValidationResult};
