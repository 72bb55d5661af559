//! Help and manual text, generated from the verb and entity definitions.

use super::definitions::{verbs_in, Verb, VerbCategory, VerbDef, VERBS};
use super::schema::{EntityKind, PRIORITIES, STATUSES};

const CATEGORIES: [VerbCategory; 3] = [
    VerbCategory::Records,
    VerbCategory::Session,
    VerbCategory::Help,
];

const GRAMMAR: &str = r#"Usage: <verb> <entity> [target] [flag]...
  Flags: --key=value, --key, or key:value
  Quote values with spaces: "like this" or 'like this'"#;

const KEYS: &str = r#"Keys:
  Enter           - Submit the line (or answer the current question)
  Ctrl+C          - Clear the line being typed
  Up/Down         - Recall earlier lines
  Ctrl+D          - Exit (on an empty line)
  exit, quit      - Exit"#;

/// Quick reference printed by `help`.
pub fn quick_reference() -> String {
    let blocks = CATEGORIES
        .iter()
        .map(|category| {
            let lines = verbs_in(*category)
                .map(|def| format!("  {:<10} - {}", def.name, def.description))
                .collect::<Vec<_>>()
                .join("\n");
            format!("{}:\n{}", category.display_name(), lines)
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "{}\n\n{}\n\nEntities: {}\nShortcuts: programs, projects, tasks, subtasks, ctx, h\n\n{}\n\nType 'man <verb>' for details.",
        GRAMMAR,
        blocks,
        EntityKind::NAMES.join(", "),
        KEYS
    )
}

/// Full manual printed by `man` with no topic.
pub fn manual() -> String {
    let pages = VERBS.iter().map(page).collect::<Vec<_>>().join("\n\n");

    let entities = EntityKind::ALL
        .iter()
        .map(|kind| {
            let parent = kind
                .parent()
                .map(|p| format!(" (child of {})", p))
                .unwrap_or_default();
            let fields = kind
                .fields()
                .iter()
                .map(|f| if f.required { format!("{}*", f.name) } else { f.name.to_string() })
                .collect::<Vec<_>>()
                .join(", ");
            format!("  {}{}: {}", kind, parent, fields)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "TASKBREW MANUAL\n\n{}\n\nENTITIES\n{}\n\n  Priorities: {}\n  Statuses: {}\n\nVERBS\n\n{}",
        GRAMMAR,
        entities,
        PRIORITIES.join(", "),
        STATUSES.join(", "),
        pages
    )
}

/// Manual page for one entity: its place in the hierarchy and its fields.
pub fn entity_page(kind: EntityKind) -> String {
    let mut out = kind.as_str().to_uppercase();
    match kind.parent() {
        Some(parent) => out.push_str(&format!(" - child of {}", parent)),
        None => out.push_str(" - top level"),
    }
    out.push_str("\n  Fields:");

    for field in kind.fields() {
        let name = if field.required {
            format!("{}*", field.name)
        } else {
            field.name.to_string()
        };
        let hint = field.hint().map(|h| format!(" [{}]", h)).unwrap_or_default();
        let aliases = if field.aliases.is_empty() {
            String::new()
        } else {
            format!(" (also: {})", field.aliases.join(", "))
        };
        out.push_str(&format!("\n    {:<14} {}{}{}", name, field.label, hint, aliases));
    }

    out
}

/// Manual page for one verb.
pub fn manual_page(verb: Verb) -> String {
    page(verb.def())
}

fn page(def: &VerbDef) -> String {
    let mut out = format!("{} - {}\n  Usage: {}", def.name.to_uppercase(), def.description, def.usage);

    if !def.aliases.is_empty() {
        out.push_str(&format!("\n  Aliases: {}", def.aliases.join(", ")));
    }
    if !def.verb.is_implemented() {
        out.push_str("\n  (not yet implemented)");
    }
    if !def.flags.is_empty() {
        out.push_str("\n  Flags:");
        for (flag, description) in def.flags {
            out.push_str(&format!("\n    {:<24} {}", flag, description));
        }
    }
    if !def.examples.is_empty() {
        out.push_str("\n  Examples:");
        for example in def.examples {
            out.push_str(&format!("\n    {}", example));
        }
    }

    out
}
