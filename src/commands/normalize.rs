//! Canonical verb and entity names.
//!
//! Both functions are total and idempotent. They run exactly once per line,
//! between tokenizing and validating.

use super::tokenizer::ParsedCommand;

/// Maps a verb synonym to its canonical verb. Unknown input is returned unchanged.
pub fn normalize_verb(s: &str) -> String {
    let canonical = match s.to_lowercase().as_str() {
        "list" | "ls" | "show" => "list",
        "create" | "new" | "add" | "mk" => "create",
        "remove" | "rm" | "del" | "delete" => "remove",
        "update" | "edit" | "set" => "update",
        "info" | "get" | "view" | "describe" => "info",
        "use" | "cd" | "enter" | "select" => "use",
        "move" | "mv" => "move",
        "export" => "export",
        "history" => "history",
        "help" | "?" => "help",
        "man" | "manual" => "man",
        _ => return s.to_string(),
    };
    canonical.to_string()
}

/// Maps a plural or abbreviated entity name to its canonical singular form.
/// Unknown input is returned unchanged.
pub fn normalize_entity(s: &str) -> String {
    let canonical = match s.to_lowercase().as_str() {
        "program" | "programs" | "prog" | "progs" | "prg" => "program",
        "project" | "projects" | "proj" | "projs" | "prj" => "project",
        "task" | "tasks" | "tsk" => "task",
        "subtask" | "subtasks" | "sub" | "subs" | "sub-task" | "sub-tasks" => "subtask",
        _ => return s.to_string(),
    };
    canonical.to_string()
}

/// Rewrites a parsed command's verb and entity into canonical form.
pub fn normalize_command(command: &mut ParsedCommand) {
    if let Some(verb) = command.verb.as_mut() {
        *verb = normalize_verb(verb);
    }
    if let Some(entity) = command.entity.as_mut() {
        *entity = normalize_entity(entity);
    }
}
