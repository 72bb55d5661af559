//! In-memory record stores.
//!
//! [`MemoryStore`] backs `--memory` sessions and tests. [`FailingStore`]
//! rejects every call so error paths can be exercised.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ListFilter, NewRecord, Record, RecordPatch, RecordStore};
use crate::commands::schema::EntityKind;
use crate::error::{BrewError, Result};

#[derive(Debug, Default)]
struct Inner {
    records: Vec<Record>,
    creates: Vec<NewRecord>,
    next_id: u64,
}

/// A record store held in memory. Records are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `create` call received, in order.
    pub fn creates(&self) -> Vec<NewRecord> {
        self.with_inner(|inner| inner.creates.clone())
    }

    /// Number of stored records of every kind.
    pub fn len(&self) -> usize {
        self.with_inner(|inner| inner.records.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_inner<T>(&self, f: impl FnOnce(&mut Inner) -> T) -> T {
        match self.inner.lock() {
            Ok(mut inner) => f(&mut inner),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }

    fn not_found(kind: EntityKind, id: &str) -> BrewError {
        BrewError::store(format!("{} '{}' not found.", kind.display_name(), id))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create(&self, record: NewRecord) -> Result<String> {
        Ok(self.with_inner(|inner| {
            inner.next_id += 1;
            let id = format!("mem-{}", inner.next_id);
            inner.creates.push(record.clone());
            inner.records.push(Record {
                id: id.clone(),
                kind: record.kind,
                title: record.title,
                parent_id: record.parent_id,
                attributes: record.attributes,
                created_at: String::new(),
                updated_at: String::new(),
            });
            id
        }))
    }

    async fn get(&self, kind: EntityKind, id: &str) -> Result<Option<Record>> {
        Ok(self.with_inner(|inner| {
            inner
                .records
                .iter()
                .find(|r| r.kind == kind && r.id == id)
                .cloned()
        }))
    }

    async fn list(&self, kind: EntityKind, filter: &ListFilter) -> Result<Vec<Record>> {
        Ok(self.with_inner(|inner| {
            let matching = inner
                .records
                .iter()
                .filter(|r| r.kind == kind && filter.matches(r))
                .cloned();
            match filter.limit {
                Some(limit) => matching.take(limit as usize).collect(),
                None => matching.collect(),
            }
        }))
    }

    async fn update(&self, kind: EntityKind, id: &str, patch: RecordPatch) -> Result<()> {
        self.with_inner(|inner| {
            let record = inner
                .records
                .iter_mut()
                .find(|r| r.kind == kind && r.id == id)
                .ok_or_else(|| Self::not_found(kind, id))?;
            patch.apply(record);
            Ok(())
        })
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<()> {
        self.with_inner(|inner| {
            if !inner.records.iter().any(|r| r.kind == kind && r.id == id) {
                return Err(Self::not_found(kind, id));
            }

            let mut doomed = HashSet::from([id.to_string()]);
            loop {
                let before = doomed.len();
                for record in &inner.records {
                    if let Some(parent) = &record.parent_id {
                        if doomed.contains(parent) {
                            doomed.insert(record.id.clone());
                        }
                    }
                }
                if doomed.len() == before {
                    break;
                }
            }

            inner.records.retain(|r| !doomed.contains(&r.id));
            Ok(())
        })
    }
}

/// A store whose every call fails with the given message.
#[derive(Debug, Clone)]
pub struct FailingStore {
    message: String,
}

impl FailingStore {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn fail<T>(&self) -> Result<T> {
        Err(BrewError::store(self.message.clone()))
    }
}

#[async_trait]
impl RecordStore for FailingStore {
    async fn create(&self, _record: NewRecord) -> Result<String> {
        self.fail()
    }

    async fn get(&self, _kind: EntityKind, _id: &str) -> Result<Option<Record>> {
        self.fail()
    }

    async fn list(&self, _kind: EntityKind, _filter: &ListFilter) -> Result<Vec<Record>> {
        self.fail()
    }

    async fn update(&self, _kind: EntityKind, _id: &str, _patch: RecordPatch) -> Result<()> {
        self.fail()
    }

    async fn delete(&self, _kind: EntityKind, _id: &str) -> Result<()> {
        self.fail()
    }
}
