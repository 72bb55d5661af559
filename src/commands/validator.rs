//! Grammar and vocabulary checks for parsed commands.
//!
//! Validation is pure: it reads a normalized [`ParsedCommand`] and returns a
//! [`ValidationResult`]. Misspellings get a "did you mean" from the fuzzy matcher.

use super::definitions::{verb_names, Verb};
use super::fuzzy::{find_closest_match, get_suggestions, DEFAULT_THRESHOLD};
use super::schema::{self, EntityKind, FieldError, PRIORITIES, STATUSES};
use super::tokenizer::ParsedCommand;

/// Flags accepted by `list`.
pub const LIST_FLAGS: &[&str] = &[
    "parent", "parentid", "parent_id", "parent-id", "status", "priority", "limit", "all",
];

/// Verb-level switches accepted by `create`.
pub const CREATE_SWITCHES: &[&str] = &["guided"];

/// Verb-level flags accepted by `update`.
pub const UPDATE_SWITCHES: &[&str] = &["id"];

/// Entity word that makes `use` clear the context.
pub const USE_NONE: &str = "none";

/// Outcome of validating one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether the command may be dispatched.
    pub valid: bool,
    /// What is wrong, when invalid.
    pub error: Option<String>,
    /// Close alternatives, best first.
    pub suggestions: Option<Vec<String>>,
}

impl ValidationResult {
    /// A passing result with no other fields.
    pub fn ok() -> Self {
        Self {
            valid: true,
            ..Default::default()
        }
    }

    /// A failing result.
    pub fn invalid(error: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
            suggestions: if suggestions.is_empty() {
                None
            } else {
                Some(suggestions)
            },
        }
    }
}

impl From<FieldError> for ValidationResult {
    fn from(err: FieldError) -> Self {
        Self::invalid(err.message, err.suggestions)
    }
}

/// Validates a normalized command.
pub fn validate(command: &ParsedCommand) -> ValidationResult {
    match check(command) {
        Ok(()) => ValidationResult::ok(),
        Err(result) => result,
    }
}

fn check(command: &ParsedCommand) -> Result<(), ValidationResult> {
    if command.is_empty() {
        return Err(ValidationResult::invalid(
            "Empty command. Type 'help' for available commands.",
            Vec::new(),
        ));
    }

    let verb = match command.verb.as_deref() {
        Some(v) => check_verb(v)?,
        None => {
            return Err(ValidationResult::invalid(
                "Missing verb. Type 'help' for available commands.",
                Vec::new(),
            ))
        }
    };

    let kind = match command.entity.as_deref() {
        Some(e) if verb == Verb::Use && e.eq_ignore_ascii_case(USE_NONE) => None,
        Some(e) => Some(check_entity(e)?),
        None => None,
    };

    if verb.requires_target() && command.target_or_id().is_none() {
        return Err(ValidationResult::invalid(
            format!(
                "'{}' needs a record id. Usage: {}",
                verb,
                verb.def().usage
            ),
            Vec::new(),
        ));
    }

    if verb.requires_entity() && kind.is_none() {
        return Err(ValidationResult::invalid(
            format!(
                "Missing entity for '{}'. Usage: {}",
                verb,
                verb.def().usage
            ),
            EntityKind::NAMES.iter().map(|s| s.to_string()).collect(),
        ));
    }

    if let Some(extra) = command.extra.first() {
        return Err(ValidationResult::invalid(
            format!(
                "Unexpected argument '{}'. Wrap values containing spaces in quotes.",
                extra
            ),
            Vec::new(),
        ));
    }

    if let Some(priority) = command.flag("priority") {
        schema::check_enum("priority", priority, PRIORITIES)?;
    }
    if let Some(status) = command.flag("status") {
        schema::check_enum("status", status, STATUSES)?;
    }

    if let Some(kind) = kind {
        check_flags(verb, kind, command)?;
    }

    Ok(())
}

fn check_verb(verb: &str) -> Result<Verb, ValidationResult> {
    if let Some(v) = Verb::parse(verb) {
        return Ok(v);
    }

    let names = verb_names();
    let error = match find_closest_match(verb, &names, DEFAULT_THRESHOLD) {
        Some(closest) => format!("Unknown command '{}'. Did you mean '{}'?", verb, closest),
        None => format!(
            "Unknown command '{}'. Valid commands: {}",
            verb,
            names.join(", ")
        ),
    };

    Err(ValidationResult::invalid(error, get_suggestions(verb, &names)))
}

fn check_entity(entity: &str) -> Result<EntityKind, ValidationResult> {
    if let Some(kind) = EntityKind::parse(entity) {
        return Ok(kind);
    }

    let names = EntityKind::NAMES;
    let error = match find_closest_match(entity, &names, DEFAULT_THRESHOLD) {
        Some(closest) => format!("Unknown entity '{}'. Did you mean '{}'?", entity, closest),
        None => format!(
            "Unknown entity '{}'. Valid entities: {}",
            entity,
            names.join(", ")
        ),
    };

    Err(ValidationResult::invalid(error, get_suggestions(entity, &names)))
}

/// Checks flag names (and the values the schema types) for verbs that take fields.
fn check_flags(verb: Verb, kind: EntityKind, command: &ParsedCommand) -> Result<(), ValidationResult> {
    match verb {
        Verb::Create => {
            schema::collect_fields(kind, &command.flags, CREATE_SWITCHES)?;
        }
        Verb::Update => {
            schema::collect_fields(kind, &command.flags, UPDATE_SWITCHES)?;
        }
        Verb::List => {
            for key in command.flags.keys() {
                if LIST_FLAGS.contains(&key.to_lowercase().as_str()) {
                    continue;
                }
                let error = match find_closest_match(key, LIST_FLAGS, DEFAULT_THRESHOLD) {
                    Some(closest) => {
                        format!("Unknown flag '{}' for list. Did you mean '{}'?", key, closest)
                    }
                    None => format!(
                        "Unknown flag '{}' for list. Flags: parent, status, priority, limit, all",
                        key
                    ),
                };
                return Err(ValidationResult::invalid(error, get_suggestions(key, LIST_FLAGS)));
            }
            if let Some(limit) = command.flag("limit") {
                if limit.parse::<u32>().is_err() {
                    return Err(ValidationResult::invalid(
                        format!("Invalid limit '{}'. Use a whole number.", limit),
                        Vec::new(),
                    ));
                }
            }
        }
        _ => {}
    }
    Ok(())
}
