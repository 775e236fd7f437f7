//! Record store boundary
//!
//! This module defines the trait that separates the models from whatever
//! holds the records (a database layer, a test fixture, an import buffer).
//! The models never see storage details, only handles and raw records.

use std::collections::HashMap;

use crate::data::record::{EntityKind, Handle, RawRecord, Tag};

/// Read-only access to a handle-keyed record store
///
/// One implementation serves every entity kind so that projectors can
/// follow cross-entity references (family members, citation sources, tags).
/// The store is treated as read-only while a model rebuild is running;
/// mutating it mid-rebuild is out of contract.
pub trait RecordStore: Send + Sync {
    /// Number of records of one kind, before any filtering
    fn count(&self, kind: EntityKind) -> usize;

    /// Iterate all (handle, record) pairs of one kind.
    /// Finite, restartable on each call, stable order between calls
    /// as long as the store is not mutated.
    fn cursor<'a>(&'a self, kind: EntityKind)
        -> Box<dyn Iterator<Item = (Handle, RawRecord)> + 'a>;

    /// Point lookup; None when the handle is unknown
    fn get(&self, kind: EntityKind, handle: &str) -> Option<RawRecord>;

    /// Resolve a tag handle to its name/priority/color
    fn tag(&self, handle: &str) -> Option<Tag>;
}

#[derive(Debug, Default)]
struct Table {
    order: Vec<Handle>,
    records: HashMap<Handle, RawRecord>,
}

/// In-memory `RecordStore` for tests, tools, and embedders without a
/// database. Cursor order is insertion order.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: HashMap<EntityKind, Table>,
    tags: HashMap<Handle, Tag>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record. Replacing keeps the original cursor
    /// position.
    pub fn insert(&mut self, kind: EntityKind, handle: impl Into<Handle>, record: RawRecord) {
        let handle = handle.into();
        let table = self.tables.entry(kind).or_default();
        if table.records.insert(handle.clone(), record).is_none() {
            table.order.push(handle);
        }
    }

    pub fn remove(&mut self, kind: EntityKind, handle: &str) -> Option<RawRecord> {
        let table = self.tables.get_mut(&kind)?;
        let removed = table.records.remove(handle);
        if removed.is_some() {
            table.order.retain(|h| h != handle);
        }
        removed
    }

    pub fn insert_tag(&mut self, handle: impl Into<Handle>, tag: Tag) {
        self.tags.insert(handle.into(), tag);
    }

    pub fn is_empty(&self) -> bool {
        self.tables.values().all(|t| t.order.is_empty())
    }
}

impl RecordStore for InMemoryStore {
    fn count(&self, kind: EntityKind) -> usize {
        self.tables.get(&kind).map_or(0, |t| t.order.len())
    }

    fn cursor<'a>(
        &'a self,
        kind: EntityKind,
    ) -> Box<dyn Iterator<Item = (Handle, RawRecord)> + 'a> {
        match self.tables.get(&kind) {
            Some(table) => Box::new(table.order.iter().filter_map(move |handle| {
                table
                    .records
                    .get(handle)
                    .map(|record| (handle.clone(), record.clone()))
            })),
            None => Box::new(std::iter::empty()),
        }
    }

    fn get(&self, kind: EntityKind, handle: &str) -> Option<RawRecord> {
        self.tables.get(&kind)?.records.get(handle).cloned()
    }

    fn tag(&self, handle: &str) -> Option<Tag> {
        self.tags.get(handle).cloned()
    }
}
