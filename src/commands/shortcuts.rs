//! Single-word shortcuts expanded before tokenizing.

/// Returns the full command for a shortcut, if `word` is one.
fn lookup(word: &str) -> Option<&'static str> {
    match word {
        "programs" | "progs" => Some("list program"),
        "projects" | "projs" => Some("list project"),
        "tasks" => Some("list task"),
        "subtasks" => Some("list subtask"),
        "ctx" => Some("use"),
        "h" => Some("history"),
        _ => None,
    }
}

/// Expands a single-word shortcut into its full command.
///
/// Anything that is not exactly one known word is returned unchanged, so the
/// expansion is idempotent.
pub fn expand_shortcut(line: &str) -> String {
    let trimmed = line.trim();
    if trimmed.split_whitespace().count() != 1 {
        return line.to_string();
    }

    match lookup(&trimmed.to_lowercase()) {
        Some(expanded) => {
            tracing::debug!("Expanded shortcut '{}' to '{}'", trimmed, expanded);
            expanded.to_string()
        }
        None => line.to_string(),
    }
}
