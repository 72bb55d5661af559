//! Record storage for taskbrew.
//!
//! The interpreter only talks to the [`RecordStore`] trait. Two implementations
//! ship with the crate: [`SqliteStore`] for real use and [`MemoryStore`], which
//! also records every create call, for embedding and tests.

mod memory;
mod migrations;
mod sqlite;

pub use memory::{FailingStore, MemoryStore};
pub use sqlite::SqliteStore;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::commands::schema::{EntityKind, FieldValues, PARENT, TITLE};
use crate::error::Result;

/// Attribute key for a record's status.
pub const STATUS: &str = "status";

/// Attribute key for a record's priority.
pub const PRIORITY: &str = "priority";

/// A stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub kind: EntityKind,
    pub title: String,
    pub parent_id: Option<String>,
    /// Every other field, keyed by canonical field name.
    pub attributes: BTreeMap<String, String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Record {
    /// Returns a field by canonical name, including `title` and `parent`.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            TITLE => Some(self.title.as_str()),
            PARENT => self.parent_id.as_deref(),
            _ => self.attributes.get(name).map(|s| s.as_str()),
        }
    }

    pub fn status(&self) -> Option<&str> {
        self.field(STATUS)
    }

    pub fn priority(&self) -> Option<&str> {
        self.field(PRIORITY)
    }
}

/// A record to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub kind: EntityKind,
    pub title: String,
    pub parent_id: Option<String>,
    pub attributes: BTreeMap<String, String>,
}

impl NewRecord {
    pub fn new(kind: EntityKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            parent_id: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Builds a record from checked field values. Empty values are dropped.
    pub fn from_fields(kind: EntityKind, fields: &FieldValues) -> Self {
        let mut record = Self::new(kind, fields.get(TITLE).cloned().unwrap_or_default());
        for (name, value) in fields {
            if value.is_empty() {
                continue;
            }
            match *name {
                TITLE => {}
                PARENT => record.parent_id = Some(value.clone()),
                other => {
                    record.attributes.insert(other.to_string(), value.clone());
                }
            }
        }
        record
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }
}

/// Field changes for an existing record. `None` leaves a column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub title: Option<String>,
    pub parent_id: Option<String>,
    /// Attributes to set. An empty value removes the attribute.
    pub attributes: BTreeMap<String, String>,
}

impl RecordPatch {
    pub fn from_fields(fields: &FieldValues) -> Self {
        let mut patch = Self::default();
        for (name, value) in fields {
            match *name {
                TITLE => patch.title = Some(value.clone()),
                PARENT => patch.parent_id = Some(value.clone()),
                other => {
                    patch.attributes.insert(other.to_string(), value.clone());
                }
            }
        }
        patch
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.parent_id.is_none() && self.attributes.is_empty()
    }

    /// Applies the patch to a record in place.
    pub fn apply(&self, record: &mut Record) {
        if let Some(title) = &self.title {
            record.title = title.clone();
        }
        if let Some(parent_id) = &self.parent_id {
            record.parent_id = Some(parent_id.clone());
        }
        for (key, value) in &self.attributes {
            if value.is_empty() {
                record.attributes.remove(key);
            } else {
                record.attributes.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Narrows a `list` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilter {
    pub parent_id: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub limit: Option<u32>,
}

impl ListFilter {
    /// Returns true if a record passes every set condition (the limit aside).
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(parent_id) = &self.parent_id {
            if record.parent_id.as_deref() != Some(parent_id.as_str()) {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if record.status() != Some(status.as_str()) {
                return false;
            }
        }
        if let Some(priority) = &self.priority {
            if record.priority() != Some(priority.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Asynchronous record storage.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Creates a record and returns its new id.
    async fn create(&self, record: NewRecord) -> Result<String>;

    /// Fetches one record, if it exists.
    async fn get(&self, kind: EntityKind, id: &str) -> Result<Option<Record>>;

    /// Lists records of one kind, oldest first.
    async fn list(&self, kind: EntityKind, filter: &ListFilter) -> Result<Vec<Record>>;

    /// Applies a patch. Errors if the record does not exist.
    async fn update(&self, kind: EntityKind, id: &str, patch: RecordPatch) -> Result<()>;

    /// Deletes a record and every record below it. Errors if it does not exist.
    async fn delete(&self, kind: EntityKind, id: &str) -> Result<()>;
}

/// Told after every successful write so views can refresh.
pub trait ChangeNotifier: Send + Sync {
    fn data_changed(&self, kind: EntityKind);
}

/// Notifier that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl ChangeNotifier for LogNotifier {
    fn data_changed(&self, kind: EntityKind) {
        tracing::debug!("{} data changed", kind);
    }
}

/// Notifier that remembers every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    calls: Arc<Mutex<Vec<EntityKind>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<EntityKind> {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ChangeNotifier for RecordingNotifier {
    fn data_changed(&self, kind: EntityKind) {
        match self.calls.lock() {
            Ok(mut calls) => calls.push(kind),
            Err(poisoned) => poisoned.into_inner().push(kind),
        }
    }
}
