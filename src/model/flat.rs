//! Flat model: a single-level, filterable, searchable view of one entity
//!
//! The model owns its ordered rows and the handle index for its whole
//! lifetime; both are rebuilt together and always kept in step. The
//! record store is read through an `Arc` and never mutated from here.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, bail, Result};
use tracing::debug;

use crate::data::record::{EntityKind, Handle, RawRecord};
use crate::data::store::RecordStore;
use crate::data::value::compare_values;
use crate::model::predicate::Predicate;
use crate::model::progress::{CancelToken, NullProgress, ProgressSink, RebuildOutcome};
use crate::model::projection::{GroupKeyFn, Projection, Row};

/// Single-level ordered view over one entity kind
pub struct FlatModel {
    store: Arc<dyn RecordStore>,
    kind: EntityKind,
    projection: Projection,
    group_key: Option<GroupKeyFn>,
    predicate: Predicate,
    skip: HashSet<Handle>,
    rows: Vec<Row>,
    index: HashMap<Handle, usize>,
}

impl FlatModel {
    pub fn new(store: Arc<dyn RecordStore>, kind: EntityKind, projection: Projection) -> Self {
        Self {
            store,
            kind,
            projection,
            group_key: None,
            predicate: Predicate::All,
            skip: HashSet::new(),
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Handles excluded from every rebuild (records being edited, etc.)
    pub fn with_skip(mut self, skip: HashSet<Handle>) -> Self {
        self.skip = skip;
        self
    }

    /// Group-key derivation, needed only to evaluate `FastFilter::Group`
    pub fn with_group_key(mut self, group_key: GroupKeyFn) -> Self {
        self.group_key = Some(group_key);
        self
    }

    /// Replace the active predicate.
    ///
    /// This does not rebuild: call `rebuild` afterwards and reattach the
    /// model to its consumer so nothing renders against the stale rows.
    pub fn set_predicate(&mut self, predicate: Predicate) {
        self.predicate = predicate;
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Rebuild without progress reporting
    pub fn rebuild(&mut self, cancel: &CancelToken) -> RebuildOutcome {
        self.rebuild_with_progress(cancel, &mut NullProgress)
    }

    /// Clear and refill the model from the store cursor under the active
    /// predicate. The cancellation token is polled once per record; on
    /// cancellation the rows inserted so far remain displayed.
    pub fn rebuild_with_progress(
        &mut self,
        cancel: &CancelToken,
        progress: &mut dyn ProgressSink,
    ) -> RebuildOutcome {
        let started = Instant::now();
        self.rows.clear();
        self.index.clear();

        let store = Arc::clone(&self.store);
        let total = store.count(self.kind);
        let accepted = self.predicate.prepass(&*store, self.kind, progress);

        let mut done = 0;
        for (handle, record) in store.cursor(self.kind) {
            done += 1;
            progress.heartbeat(done, total);
            if cancel.is_cancelled() {
                debug!(
                    "{} rebuild cancelled after {} of {} records",
                    self.kind.label(),
                    done,
                    total
                );
                return RebuildOutcome::Cancelled;
            }
            if self.skip.contains(&handle) {
                continue;
            }
            let keep = match &accepted {
                Some(set) => set.contains(&handle),
                None => self.predicate.matches(
                    &record,
                    &*store,
                    &self.projection,
                    self.group_key.as_ref(),
                ),
            };
            if keep {
                self.insert_row(handle, &record, &*store);
            }
        }

        debug!(
            "{} rebuild: {} of {} rows in {:?}",
            self.kind.label(),
            self.rows.len(),
            total,
            started.elapsed()
        );
        RebuildOutcome::Completed
    }

    fn insert_row(&mut self, handle: Handle, record: &RawRecord, store: &dyn RecordStore) {
        let row = self.projection.project_row(record, store, &handle);
        self.index.insert(handle, self.rows.len());
        self.rows.push(row);
    }

    /// Append the row for a newly created record.
    ///
    /// The record is projected unconditionally; the active predicate is
    /// not re-checked. Precondition: the handle is not already displayed;
    /// a duplicate add is a caller error and fails loudly.
    pub fn add_row_by_handle(&mut self, handle: &str) -> Result<()> {
        if self.index.contains_key(handle) {
            bail!(
                "{} handle '{}' is already displayed",
                self.kind.label(),
                handle
            );
        }
        let record = self
            .store
            .get(self.kind, handle)
            .ok_or_else(|| anyhow!("no {} record for handle '{}'", self.kind.label(), handle))?;
        let store = Arc::clone(&self.store);
        self.insert_row(handle.to_string(), &record, &*store);
        Ok(())
    }

    /// Re-project a changed record over its existing row, in place.
    /// Fails when the handle is not displayed.
    pub fn update_row_by_handle(&mut self, handle: &str) -> Result<()> {
        let position = *self
            .index
            .get(handle)
            .ok_or_else(|| anyhow!("{} handle '{}' is not displayed", self.kind.label(), handle))?;
        let record = self
            .store
            .get(self.kind, handle)
            .ok_or_else(|| anyhow!("no {} record for handle '{}'", self.kind.label(), handle))?;
        let store = Arc::clone(&self.store);
        self.rows[position] = self.projection.project_row(&record, &*store, handle);
        Ok(())
    }

    /// Remove the row for a deleted record.
    /// Fails when the handle is not displayed.
    pub fn delete_row_by_handle(&mut self, handle: &str) -> Result<()> {
        let position = self
            .index
            .remove(handle)
            .ok_or_else(|| anyhow!("{} handle '{}' is not displayed", self.kind.label(), handle))?;
        self.rows.remove(position);
        for p in self.index.values_mut() {
            if *p > position {
                *p -= 1;
            }
        }
        Ok(())
    }

    /// Reorder rows by one column's sort keys
    pub fn sort_by(&mut self, column: usize, ascending: bool) -> Result<()> {
        if column >= self.projection.column_count() {
            bail!("column index {} out of bounds", column);
        }
        self.rows.sort_by(|a, b| {
            let cmp = compare_values(a.sort_key(column), b.sort_key(column));
            if ascending {
                cmp
            } else {
                cmp.reverse()
            }
        });
        self.reindex();
        Ok(())
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (position, row) in self.rows.iter().enumerate() {
            self.index.insert(row.handle().to_string(), position);
        }
    }

    /// Records in the store before filtering, for progress reporting
    pub fn total(&self) -> usize {
        self.store.count(self.kind)
    }

    /// Rows currently materialized
    pub fn displayed(&self) -> usize {
        self.rows.len()
    }

    /// Which column carries the row-highlight color, if any
    pub fn color_column(&self) -> Option<usize> {
        self.projection.color_column()
    }

    pub fn column_count(&self) -> usize {
        self.projection.column_count()
    }

    pub fn row(&self, position: usize) -> Option<&Row> {
        self.rows.get(position)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Position of a handle's row, if displayed
    pub fn position_of(&self, handle: &str) -> Option<usize> {
        self.index.get(handle).copied()
    }

    /// Handle of the row at `position`
    pub fn handle_at(&self, position: usize) -> Option<&str> {
        self.rows.get(position).map(|row| row.handle())
    }

    /// Number of indexed handles; equals `displayed()` by invariant
    pub fn indexed(&self) -> usize {
        self.index.len()
    }

    /// The row for a handle, if displayed
    pub fn row_by_handle(&self, handle: &str) -> Option<&Row> {
        self.position_of(handle).and_then(|p| self.rows.get(p))
    }
}
