//! Per-console session state.
//!
//! Holds the current program/project context, the last list filter and the
//! command history. One session belongs to one interpreter.

use std::collections::VecDeque;

use crate::commands::schema::EntityKind;
use crate::store::ListFilter;

/// Maximum number of commands kept in history.
pub const MAX_HISTORY_SIZE: usize = 100;

/// Navigation context and history for one console.
#[derive(Debug, Default, Clone)]
pub struct Session {
    current_program_id: Option<String>,
    current_project_id: Option<String>,
    /// Filter used by the most recent `list`.
    pub last_filter: Option<ListFilter>,
    history: VecDeque<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session with a context, typically from the config file.
    pub fn with_context(program_id: Option<String>, project_id: Option<String>) -> Self {
        Self {
            current_program_id: program_id,
            current_project_id: project_id,
            ..Default::default()
        }
    }

    pub fn current_program_id(&self) -> Option<&str> {
        self.current_program_id.as_deref()
    }

    pub fn current_project_id(&self) -> Option<&str> {
        self.current_project_id.as_deref()
    }

    /// Parent id a new record of `kind` gets when none is given.
    ///
    /// Projects default to the current program and tasks to the current
    /// project. Subtasks have no default.
    pub fn default_parent(&self, kind: EntityKind) -> Option<&str> {
        match kind {
            EntityKind::Project => self.current_program_id(),
            EntityKind::Task => self.current_project_id(),
            EntityKind::Program | EntityKind::Subtask => None,
        }
    }

    /// Enters a program. Leaves any project that belongs to another program.
    pub fn set_program(&mut self, id: impl Into<String>) {
        let id = id.into();
        if self.current_program_id.as_deref() != Some(id.as_str()) {
            self.current_project_id = None;
        }
        self.current_program_id = Some(id);
    }

    /// Enters a project and the program it belongs to.
    pub fn set_project(&mut self, id: impl Into<String>, program_id: Option<String>) {
        if let Some(program_id) = program_id {
            self.current_program_id = Some(program_id);
        }
        self.current_project_id = Some(id.into());
    }

    pub fn clear_context(&mut self) {
        self.current_program_id = None;
        self.current_project_id = None;
    }

    /// Drops any context entry pointing at a removed record.
    pub fn forget(&mut self, id: &str) {
        if self.current_program_id.as_deref() == Some(id) {
            self.clear_context();
        } else if self.current_project_id.as_deref() == Some(id) {
            self.current_project_id = None;
        }
    }

    /// Records a submitted line. Blank lines are skipped; the oldest entry
    /// is evicted beyond [`MAX_HISTORY_SIZE`].
    pub fn push_history(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        self.history.push_back(line.to_string());
        while self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
    }

    /// History entries, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(|s| s.as_str())
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}
