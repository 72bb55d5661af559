//! Entity vocabulary and per-entity field schemas.
//!
//! Each entity has an ordered list of [`FieldDef`]s. The same list drives flag
//! validation, record construction, and the question sequence of guided create.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::fuzzy::{find_closest_match, get_suggestions, DEFAULT_THRESHOLD};

/// Canonical field name for a record's title.
pub const TITLE: &str = "title";
/// Canonical field name for a record's parent id.
pub const PARENT: &str = "parent";

/// Field values keyed by canonical field name.
pub type FieldValues = BTreeMap<&'static str, String>;

/// The four levels of the record hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Program,
    Project,
    Task,
    Subtask,
}

impl EntityKind {
    /// All entity kinds, top of the hierarchy first.
    pub const ALL: [EntityKind; 4] = [Self::Program, Self::Project, Self::Task, Self::Subtask];

    /// Canonical (singular, lowercase) names, in hierarchy order.
    pub const NAMES: [&'static str; 4] = ["program", "project", "task", "subtask"];

    /// Returns the canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Program => "program",
            Self::Project => "project",
            Self::Task => "task",
            Self::Subtask => "subtask",
        }
    }

    /// Returns the plural name used in listings.
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Program => "programs",
            Self::Project => "projects",
            Self::Task => "tasks",
            Self::Subtask => "subtasks",
        }
    }

    /// Returns the capitalized name for messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Program => "Program",
            Self::Project => "Project",
            Self::Task => "Task",
            Self::Subtask => "Subtask",
        }
    }

    /// Parses a canonical entity name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "program" => Some(Self::Program),
            "project" => Some(Self::Project),
            "task" => Some(Self::Task),
            "subtask" => Some(Self::Subtask),
            _ => None,
        }
    }

    /// Returns the kind one level up, if any.
    pub fn parent(&self) -> Option<EntityKind> {
        match self {
            Self::Program => None,
            Self::Project => Some(Self::Program),
            Self::Task => Some(Self::Project),
            Self::Subtask => Some(Self::Task),
        }
    }

    /// Returns true if records of this kind must have a parent.
    pub fn requires_parent(&self) -> bool {
        self.parent().is_some()
    }

    /// Returns the ordered field schema for this kind.
    pub fn fields(&self) -> &'static [FieldDef] {
        match self {
            Self::Program => PROGRAM_FIELDS,
            Self::Project => PROJECT_FIELDS,
            Self::Task => TASK_FIELDS,
            Self::Subtask => SUBTASK_FIELDS,
        }
    }

    /// Finds a field of this kind by canonical name or alias, ignoring case.
    pub fn field(&self, key: &str) -> Option<&'static FieldDef> {
        let key = key.to_lowercase();
        self.fields()
            .iter()
            .find(|f| f.name == key || f.aliases.iter().any(|a| *a == key))
    }

    /// Returns the names accepted as flags for this kind (canonical names and aliases).
    pub fn flag_names(&self) -> Vec<&'static str> {
        self.fields()
            .iter()
            .flat_map(|f| std::iter::once(f.name).chain(f.aliases.iter().copied()))
            .collect()
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true if the named entity must have a parent. Accepts any synonym.
pub fn requires_parent(entity: &str) -> bool {
    EntityKind::parse(&super::normalize::normalize_entity(entity))
        .map(|k| k.requires_parent())
        .unwrap_or(false)
}

/// Allowed values of the `priority` field.
pub const PRIORITIES: &[&str] = &["low", "medium", "high", "urgent"];

/// Allowed values of the `status` field.
pub const STATUSES: &[&str] = &["todo", "in-progress", "blocked", "done"];

/// How a field's value is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Id of a record one level up.
    Parent,
    /// One of [`PRIORITIES`].
    Priority,
    /// One of [`STATUSES`].
    Status,
    /// Calendar date in `YYYY-MM-DD` form.
    Date,
}

/// Definition of one field of an entity.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Canonical field name.
    pub name: &'static str,
    /// Alternative flag names.
    pub aliases: &'static [&'static str],
    /// Label shown in guided prompts.
    pub label: &'static str,
    /// Value type.
    pub kind: FieldKind,
    /// Whether guided create must collect a value.
    pub required: bool,
}

/// A rejected field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Human-readable reason.
    pub message: String,
    /// Close valid values, best first.
    pub suggestions: Vec<String>,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl FieldDef {
    /// Checks a value and returns its canonical form.
    pub fn check(&self, value: &str) -> Result<String, FieldError> {
        let value = value.trim();
        match self.kind {
            FieldKind::Text | FieldKind::Parent => Ok(value.to_string()),
            FieldKind::Priority => check_enum("priority", value, PRIORITIES),
            FieldKind::Status => check_enum("status", value, STATUSES),
            FieldKind::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|d| d.format("%Y-%m-%d").to_string())
                .map_err(|_| FieldError {
                    message: format!("Invalid date '{}'. Use YYYY-MM-DD.", value),
                    suggestions: Vec::new(),
                }),
        }
    }

    /// Returns a short hint of accepted values, used in guided prompts.
    pub fn hint(&self) -> Option<String> {
        match self.kind {
            FieldKind::Priority => Some(PRIORITIES.join("/")),
            FieldKind::Status => Some(STATUSES.join("/")),
            FieldKind::Date => Some("YYYY-MM-DD".to_string()),
            FieldKind::Text | FieldKind::Parent => None,
        }
    }
}

/// Checks an enumerated value, producing a "did you mean" error on mismatch.
pub fn check_enum(field: &str, value: &str, allowed: &[&str]) -> Result<String, FieldError> {
    let lowered = value.to_lowercase();
    if allowed.contains(&lowered.as_str()) {
        return Ok(lowered);
    }

    let message = match find_closest_match(&lowered, allowed, DEFAULT_THRESHOLD) {
        Some(closest) => format!(
            "Invalid {} '{}'. Did you mean '{}'?",
            field, value, closest
        ),
        None => format!(
            "Invalid {} '{}'. Valid values: {}",
            field,
            value,
            allowed.join(", ")
        ),
    };

    Err(FieldError {
        message,
        suggestions: get_suggestions(&lowered, allowed),
    })
}

const TITLE_FIELD: FieldDef = FieldDef {
    name: TITLE,
    aliases: &["name"],
    label: "Title",
    kind: FieldKind::Text,
    required: true,
};

const DESCRIPTION_FIELD: FieldDef = FieldDef {
    name: "description",
    aliases: &["desc"],
    label: "Description",
    kind: FieldKind::Text,
    required: false,
};

const PRIORITY_FIELD: FieldDef = FieldDef {
    name: "priority",
    aliases: &["prio"],
    label: "Priority",
    kind: FieldKind::Priority,
    required: false,
};

const STATUS_FIELD: FieldDef = FieldDef {
    name: "status",
    aliases: &[],
    label: "Status",
    kind: FieldKind::Status,
    required: false,
};

const DUE_FIELD: FieldDef = FieldDef {
    name: "due",
    aliases: &["deadline", "due_date", "duedate"],
    label: "Due date",
    kind: FieldKind::Date,
    required: false,
};

const fn parent_field(label: &'static str) -> FieldDef {
    FieldDef {
        name: PARENT,
        aliases: &["parentid", "parent_id", "parent-id"],
        label,
        kind: FieldKind::Parent,
        required: true,
    }
}

static PROGRAM_FIELDS: &[FieldDef] = &[
    TITLE_FIELD,
    DESCRIPTION_FIELD,
    FieldDef {
        name: "color",
        aliases: &["colour"],
        label: "Color",
        kind: FieldKind::Text,
        required: false,
    },
];

static PROJECT_FIELDS: &[FieldDef] = &[
    TITLE_FIELD,
    parent_field("Parent program id"),
    DESCRIPTION_FIELD,
    STATUS_FIELD,
    PRIORITY_FIELD,
    DUE_FIELD,
];

static TASK_FIELDS: &[FieldDef] = &[
    TITLE_FIELD,
    parent_field("Parent project id"),
    DESCRIPTION_FIELD,
    PRIORITY_FIELD,
    STATUS_FIELD,
    DUE_FIELD,
];

static SUBTASK_FIELDS: &[FieldDef] = &[
    TITLE_FIELD,
    parent_field("Parent task id"),
    STATUS_FIELD,
];

/// Maps flags onto an entity's fields, checking every value.
///
/// Keys in `ignore` (verb-level switches such as `guided`) are skipped. Any
/// other key that is not a field of `kind` is an error.
pub fn collect_fields(
    kind: EntityKind,
    flags: &BTreeMap<String, String>,
    ignore: &[&str],
) -> Result<FieldValues, FieldError> {
    let mut values = FieldValues::new();

    for (key, value) in flags {
        if ignore.iter().any(|i| i.eq_ignore_ascii_case(key)) {
            continue;
        }
        let field = kind.field(key).ok_or_else(|| unknown_field(kind, key))?;
        values.insert(field.name, field.check(value)?);
    }

    Ok(values)
}

/// Builds the error for a flag that is not part of an entity's schema.
pub fn unknown_field(kind: EntityKind, key: &str) -> FieldError {
    let names = kind.flag_names();
    let message = match find_closest_match(key, &names, DEFAULT_THRESHOLD) {
        Some(closest) => format!(
            "Unknown field '{}' for {}. Did you mean '{}'?",
            key, kind, closest
        ),
        None => format!(
            "Unknown field '{}' for {}. Fields: {}",
            key,
            kind,
            kind.fields()
                .iter()
                .map(|f| f.name)
                .collect::<Vec<_>>()
                .join(", ")
        ),
    };

    FieldError {
        message,
        suggestions: get_suggestions(key, &names),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_requires_parent() {
        assert!(requires_parent("task"));
        assert!(requires_parent("projects"));
        assert!(requires_parent("subtask"));
        assert!(!requires_parent("program"));
        assert!(!requires_parent("nonsense"));
    }

    #[test]
    fn test_hierarchy() {
        assert_eq!(EntityKind::Program.parent(), None);
        assert_eq!(EntityKind::Project.parent(), Some(EntityKind::Program));
        assert_eq!(EntityKind::Task.parent(), Some(EntityKind::Project));
        assert_eq!(EntityKind::Subtask.parent(), Some(EntityKind::Task));
    }

    #[test]
    fn test_parse_round_trips_names() {
        for name in EntityKind::NAMES {
            assert_eq!(EntityKind::parse(name).map(|k| k.as_str()), Some(name));
        }
        assert_eq!(EntityKind::parse("tasks"), None);
    }

    #[test]
    fn test_schema_starts_with_title_then_parent() {
        for kind in EntityKind::ALL {
            let fields = kind.fields();
            assert_eq!(fields[0].name, TITLE);
            assert!(fields[0].required);
            if kind.requires_parent() {
                assert_eq!(fields[1].name, PARENT);
            } else {
                assert!(fields.iter().all(|f| f.name != PARENT));
            }
        }
    }

    #[test]
    fn test_field_lookup_by_alias() {
        let task = EntityKind::Task;
        assert_eq!(task.field("parentId").map(|f| f.name), Some(PARENT));
        assert_eq!(task.field("parent").map(|f| f.name), Some(PARENT));
        assert_eq!(task.field("desc").map(|f| f.name), Some("description"));
        assert!(task.field("color").is_none());
    }

    #[test]
    fn test_check_enum_canonicalizes_case() {
        assert_eq!(check_enum("priority", "HIGH", PRIORITIES), Ok("high".to_string()));
    }

    #[test]
    fn test_check_enum_suggests() {
        let err = check_enum("status", "dne", STATUSES).unwrap_err();
        assert!(err.message.contains("Did you mean 'done'?"));
        assert_eq!(err.suggestions, vec!["done".to_string()]);
    }

    #[test]
    fn test_check_enum_lists_values_when_far() {
        let err = check_enum("priority", "whenever", PRIORITIES).unwrap_err();
        assert!(err.message.contains("low, medium, high, urgent"));
    }

    #[test]
    fn test_date_field() {
        let due = EntityKind::Task.field("due").unwrap();
        assert_eq!(due.check("2026-03-01"), Ok("2026-03-01".to_string()));
        assert!(due.check("2026-02-30").is_err());
        assert!(due.check("next week").is_err());
    }

    #[test]
    fn test_collect_fields_resolves_aliases() {
        let values = collect_fields(
            EntityKind::Project,
            &flags(&[("parentId", "abc123"), ("priority", "High"), ("guided", "true")]),
            &["guided"],
        )
        .unwrap();
        assert_eq!(values.get(PARENT).map(String::as_str), Some("abc123"));
        assert_eq!(values.get("priority").map(String::as_str), Some("high"));
        assert!(!values.contains_key("guided"));
    }

    #[test]
    fn test_collect_fields_rejects_unknown() {
        let err = collect_fields(EntityKind::Subtask, &flags(&[("priorty", "low")]), &[])
            .unwrap_err();
        assert!(err.message.contains("Unknown field 'priorty' for subtask"));
    }

    #[test]
    fn test_unknown_field_suggests_close_name() {
        let err = unknown_field(EntityKind::Task, "titel");
        assert!(err.message.contains("Did you mean 'title'?"));
        assert!(err.suggestions.contains(&"title".to_string()));
    }
}
