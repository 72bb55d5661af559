//! Verb definitions for declarative command metadata.
//!
//! This module provides a declarative way to define verbs with their aliases,
//! descriptions and usage. This enables:
//! - The verb vocabulary used by the validator and its suggestions
//! - Auto-generated `help` and `man` text
//! - Routing of recognized verbs that have no handler yet

use std::fmt;

/// A canonical verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    List,
    Create,
    Info,
    Update,
    Remove,
    Use,
    Move,
    Export,
    History,
    Help,
    Man,
}

impl Verb {
    /// Parses a verb name or alias.
    pub fn parse(s: &str) -> Option<Self> {
        find_verb(s).map(|def| def.verb)
    }

    /// Returns the canonical name.
    pub fn as_str(&self) -> &'static str {
        self.def().name
    }

    /// Returns the definition of this verb.
    pub fn def(&self) -> &'static VerbDef {
        VERBS
            .iter()
            .find(|d| d.verb == *self)
            .unwrap_or(&VERBS[0])
    }

    /// Returns true if the verb acts on a single record and needs its id.
    pub fn requires_target(&self) -> bool {
        matches!(self, Self::Info | Self::Remove | Self::Update)
    }

    /// Returns true if the verb needs an entity type.
    pub fn requires_entity(&self) -> bool {
        matches!(
            self,
            Self::List | Self::Create | Self::Info | Self::Update | Self::Remove | Self::Move | Self::Export
        )
    }

    /// Returns true if a handler exists for the verb.
    pub fn is_implemented(&self) -> bool {
        !matches!(self, Self::Move | Self::Export)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category for grouping verbs in help output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbCategory {
    /// Record commands.
    Records,
    /// Session and navigation commands.
    Session,
    /// Built-in help.
    Help,
}

impl VerbCategory {
    /// Returns the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Records => "Record commands",
            Self::Session => "Session commands",
            Self::Help => "Help",
        }
    }
}

/// Definition of a verb.
#[derive(Debug, Clone)]
pub struct VerbDef {
    /// The verb.
    pub verb: Verb,
    /// Canonical name.
    pub name: &'static str,
    /// Synonyms accepted by the normalizer.
    pub aliases: &'static [&'static str],
    /// Short description shown in help.
    pub description: &'static str,
    /// Usage line.
    pub usage: &'static str,
    /// Flags accepted, with descriptions, for the manual.
    pub flags: &'static [(&'static str, &'static str)],
    /// Example lines for the manual.
    pub examples: &'static [&'static str],
    /// Category for grouping in help.
    pub category: VerbCategory,
}

/// All verb definitions.
pub static VERBS: &[VerbDef] = &[
    VerbDef {
        verb: Verb::List,
        name: "list",
        aliases: &["ls", "show"],
        description: "List records of one type",
        usage: "list <entity> [--parent=<id>] [--status=<s>] [--priority=<p>] [--limit=<n>] [--all]",
        flags: &[
            ("--parent=<id>", "Only children of this record (defaults to the current context)"),
            ("--status=<status>", "Only records with this status"),
            ("--priority=<priority>", "Only records with this priority"),
            ("--limit=<n>", "Show at most n records"),
            ("--all", "Ignore the current context"),
        ],
        examples: &["list programs", "ls tasks status:todo", "list projects --limit=10"],
        category: VerbCategory::Records,
    },
    VerbDef {
        verb: Verb::Create,
        name: "create",
        aliases: &["new", "add", "mk"],
        description: "Create a record (prompts for anything missing)",
        usage: "create <entity> [\"title\"] [parent:<id>] [field:value]... [--guided]",
        flags: &[
            ("title:<text>", "Title (or give it as the third word)"),
            ("parent:<id>", "Parent record id (defaults to the current context)"),
            ("description:<text>", "Free-text description"),
            ("priority:<priority>", "low, medium, high or urgent"),
            ("status:<status>", "todo, in-progress, blocked or done"),
            ("due:<date>", "Due date, YYYY-MM-DD"),
            ("color:<text>", "Program color"),
            ("--guided", "Ask for every field step by step"),
        ],
        examples: &[
            "create program \"Platform\"",
            "create project \"Website\" parent:abc123",
            "create task \"Fix bug\" priority:high",
            "create program --guided",
        ],
        category: VerbCategory::Records,
    },
    VerbDef {
        verb: Verb::Info,
        name: "info",
        aliases: &["get", "view", "describe"],
        description: "Show every field of one record",
        usage: "info <entity> <id>",
        flags: &[("--id=<id>", "Record id (instead of the third word)")],
        examples: &["info task 1a2b3c4d"],
        category: VerbCategory::Records,
    },
    VerbDef {
        verb: Verb::Update,
        name: "update",
        aliases: &["edit", "set"],
        description: "Change fields of one record",
        usage: "update <entity> <id> field:value...",
        flags: &[
            ("title:<text>", "New title"),
            ("parent:<id>", "New parent id"),
            ("<field>:<value>", "Any other field of the entity"),
        ],
        examples: &["update task 1a2b3c4d status:done", "edit project 9f8e7d6c priority:urgent"],
        category: VerbCategory::Records,
    },
    VerbDef {
        verb: Verb::Remove,
        name: "remove",
        aliases: &["rm", "del", "delete"],
        description: "Delete a record and everything under it",
        usage: "remove <entity> <id>",
        flags: &[("--id=<id>", "Record id (instead of the third word)")],
        examples: &["rm task 1a2b3c4d"],
        category: VerbCategory::Records,
    },
    VerbDef {
        verb: Verb::Move,
        name: "move",
        aliases: &["mv"],
        description: "Move a record under another parent",
        usage: "move <entity> <id> parent:<id>",
        flags: &[],
        examples: &[],
        category: VerbCategory::Records,
    },
    VerbDef {
        verb: Verb::Export,
        name: "export",
        aliases: &[],
        description: "Export records as JSON",
        usage: "export <entity>",
        flags: &[],
        examples: &[],
        category: VerbCategory::Records,
    },
    VerbDef {
        verb: Verb::Use,
        name: "use",
        aliases: &["cd", "enter", "select"],
        description: "Set the current program or project",
        usage: "use [program|project <id>] | use none",
        flags: &[],
        examples: &["use program abc123", "use project 9f8e7d6c", "use", "use none"],
        category: VerbCategory::Session,
    },
    VerbDef {
        verb: Verb::History,
        name: "history",
        aliases: &[],
        description: "Show commands entered in this session",
        usage: "history",
        flags: &[],
        examples: &[],
        category: VerbCategory::Session,
    },
    VerbDef {
        verb: Verb::Help,
        name: "help",
        aliases: &["?"],
        description: "Show the quick reference",
        usage: "help",
        flags: &[],
        examples: &[],
        category: VerbCategory::Help,
    },
    VerbDef {
        verb: Verb::Man,
        name: "man",
        aliases: &["manual"],
        description: "Show the manual, or the page for one verb",
        usage: "man [verb]",
        flags: &[],
        examples: &["man", "man create"],
        category: VerbCategory::Help,
    },
];

/// Returns the canonical names of every verb, in definition order.
pub fn verb_names() -> Vec<&'static str> {
    VERBS.iter().map(|d| d.name).collect()
}

/// Finds a verb definition by canonical name or alias.
pub fn find_verb(name: &str) -> Option<&'static VerbDef> {
    let name_lower = name.to_lowercase();
    VERBS
        .iter()
        .find(|d| d.name == name_lower || d.aliases.iter().any(|a| *a == name_lower))
}

/// Returns verbs in the given category.
pub fn verbs_in(category: VerbCategory) -> impl Iterator<Item = &'static VerbDef> {
    VERBS.iter().filter(move |d| d.category == category)
}
