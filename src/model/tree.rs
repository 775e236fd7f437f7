//! Tree model: a two-level grouped view of one entity
//!
//! Children are records of the model's entity kind; parents are either
//! synthetic rows derived from each child's grouping key (people grouped
//! by name grouping) or rows projected from a second entity kind (sources
//! above their citations). Parents are created lazily, once per distinct
//! key, on the first child that needs them.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, bail, Result};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use tracing::debug;

use crate::data::record::{EntityKind, Handle, RawRecord, DEFAULT_TAG_COLOR};
use crate::data::store::RecordStore;
use crate::data::value::compare_values;
use crate::model::predicate::Predicate;
use crate::model::progress::{CancelToken, NullProgress, ProgressSink, RebuildOutcome};
use crate::model::projection::{GroupKeyFn, Projection, Row};

/// How children relate to their parent level
pub enum TreeSpec {
    /// Synthetic parents derived from each child's grouping key; the key
    /// becomes the parent's label and index entry
    Grouped {
        group_key: GroupKeyFn,
        levels: [&'static str; 2],
    },
    /// Parents backed by records of a second entity kind, referenced by
    /// a handle field on the child and projected with their own column set
    Nested {
        parent_kind: EntityKind,
        parent_field: usize,
        parent_projection: Projection,
        levels: [&'static str; 2],
    },
}

struct GroupNode {
    key: String,
    row: Row,
    children: Vec<Row>,
}

/// Position of one row in the tree: a group index, and for child rows the
/// offset under that group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreePos {
    pub group: usize,
    pub child: Option<usize>,
}

/// Two-level grouped view over one entity kind
pub struct TreeModel {
    store: Arc<dyn RecordStore>,
    kind: EntityKind,
    projection: Projection,
    spec: TreeSpec,
    predicate: Predicate,
    skip: HashSet<Handle>,
    groups: Vec<GroupNode>,
    index: HashMap<Handle, TreePos>,
}

impl TreeModel {
    /// Parent and child rows share one column layout; for `Nested` specs
    /// the two projections must have the same column count.
    pub fn new(
        store: Arc<dyn RecordStore>,
        kind: EntityKind,
        projection: Projection,
        spec: TreeSpec,
    ) -> Self {
        if let TreeSpec::Nested {
            parent_projection, ..
        } = &spec
        {
            assert_eq!(
                parent_projection.column_count(),
                projection.column_count(),
                "parent and child column counts differ"
            );
        }
        Self {
            store,
            kind,
            projection,
            spec,
            predicate: Predicate::All,
            skip: HashSet::new(),
            groups: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Handles excluded from every rebuild
    pub fn with_skip(mut self, skip: HashSet<Handle>) -> Self {
        self.skip = skip;
        self
    }

    /// Replace the active predicate; callers rebuild and reattach afterwards
    pub fn set_predicate(&mut self, predicate: Predicate) {
        self.predicate = predicate;
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// The two level headings, parent first
    pub fn tree_levels(&self) -> [&'static str; 2] {
        match &self.spec {
            TreeSpec::Grouped { levels, .. } => *levels,
            TreeSpec::Nested { levels, .. } => *levels,
        }
    }

    /// Rebuild without progress reporting
    pub fn rebuild(&mut self, cancel: &CancelToken) -> RebuildOutcome {
        self.rebuild_with_progress(cancel, &mut NullProgress)
    }

    /// Clear and refill the tree from the store cursor under the active
    /// predicate; same contract as the flat rebuild, including partial
    /// results on cancellation.
    pub fn rebuild_with_progress(
        &mut self,
        cancel: &CancelToken,
        progress: &mut dyn ProgressSink,
    ) -> RebuildOutcome {
        let started = Instant::now();
        self.groups.clear();
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
                    "{} tree rebuild cancelled after {} of {} records",
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
                None => {
                    let group_key: Option<&GroupKeyFn> = match &self.spec {
                        TreeSpec::Grouped { group_key, .. } => Some(group_key),
                        TreeSpec::Nested { .. } => None,
                    };
                    self.predicate
                        .matches(&record, &*store, &self.projection, group_key)
                }
            };
            if keep {
                self.add_row(handle, &record, &*store);
            }
        }

        debug!(
            "{} tree rebuild: {} rows in {} groups from {} records in {:?}",
            self.kind.label(),
            self.displayed(),
            self.groups.len(),
            total,
            started.elapsed()
        );
        RebuildOutcome::Completed
    }

    /// Insert the parent (on first encounter) and the child row
    fn add_row(&mut self, handle: Handle, record: &RawRecord, store: &dyn RecordStore) {
        let group = self.group_index_for(record, store);
        let row = self.projection.project_row(record, store, &handle);
        let node = &mut self.groups[group];
        let child = node.children.len();
        node.children.push(row);
        self.index.insert(
            handle,
            TreePos {
                group,
                child: Some(child),
            },
        );
    }

    fn group_index_for(&mut self, record: &RawRecord, store: &dyn RecordStore) -> usize {
        let key = match &self.spec {
            TreeSpec::Grouped { group_key, .. } => group_key(record, store),
            TreeSpec::Nested { parent_field, .. } => record.str_field(*parent_field).to_string(),
        };
        if let Some(position) = self.index.get(&key) {
            return position.group;
        }

        let row = match &self.spec {
            TreeSpec::Grouped { .. } => {
                self.projection.blank_row(Some(&key), DEFAULT_TAG_COLOR, &key)
            }
            TreeSpec::Nested {
                parent_kind,
                parent_projection,
                ..
            } => match store.get(*parent_kind, &key) {
                Some(parent) => parent_projection.project_row(&parent, store, &key),
                // dangling parent reference: keep the child reachable
                // under a blank parent row
                None => parent_projection.blank_row(None, DEFAULT_TAG_COLOR, &key),
            },
        };

        let group = self.groups.len();
        self.groups.push(GroupNode {
            key: key.clone(),
            row,
            children: Vec::new(),
        });
        self.index.insert(key, TreePos { group, child: None });
        group
    }

    /// Insert the rows for a newly created record.
    ///
    /// Precondition: the handle is not already displayed; a duplicate add
    /// is a caller error and fails loudly.
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
        self.add_row(handle.to_string(), &record, &*store);
        Ok(())
    }

    /// Re-project a changed record over its existing row, in place.
    ///
    /// Children are not re-grouped: a change to the grouping key takes
    /// effect on the next rebuild. Updating a synthetic group label fails
    /// (there is no backing record).
    pub fn update_row_by_handle(&mut self, handle: &str) -> Result<()> {
        let position = *self
            .index
            .get(handle)
            .ok_or_else(|| anyhow!("{} handle '{}' is not displayed", self.kind.label(), handle))?;
        let store = Arc::clone(&self.store);

        match position.child {
            Some(child) => {
                let record = self.store.get(self.kind, handle).ok_or_else(|| {
                    anyhow!("no {} record for handle '{}'", self.kind.label(), handle)
                })?;
                let row = self.projection.project_row(&record, &*store, handle);
                self.groups[position.group].children[child] = row;
            }
            None => {
                let row = match &self.spec {
                    TreeSpec::Nested {
                        parent_kind,
                        parent_projection,
                        ..
                    } => {
                        let record = store.get(*parent_kind, handle).ok_or_else(|| {
                            anyhow!(
                                "no {} record for handle '{}'",
                                parent_kind.label(),
                                handle
                            )
                        })?;
                        parent_projection.project_row(&record, &*store, handle)
                    }
                    TreeSpec::Grouped { .. } => {
                        bail!("group '{}' has no backing record", handle)
                    }
                };
                self.groups[position.group].row = row;
            }
        }
        Ok(())
    }

    /// Remove a row. Removing a child leaves its (possibly now empty)
    /// parent until the next rebuild; removing a parent removes the whole
    /// subtree and every index entry under it.
    pub fn delete_row_by_handle(&mut self, handle: &str) -> Result<()> {
        let position = *self
            .index
            .get(handle)
            .ok_or_else(|| anyhow!("{} handle '{}' is not displayed", self.kind.label(), handle))?;

        match position.child {
            Some(child) => {
                self.index.remove(handle);
                self.groups[position.group].children.remove(child);
                for p in self.index.values_mut() {
                    if p.group == position.group {
                        if let Some(c) = p.child {
                            if c > child {
                                p.child = Some(c - 1);
                            }
                        }
                    }
                }
            }
            None => {
                self.index.remove(handle);
                let node = self.groups.remove(position.group);
                for row in &node.children {
                    self.index.remove(row.handle());
                }
                for p in self.index.values_mut() {
                    if p.group > position.group {
                        p.group -= 1;
                    }
                }
            }
        }
        Ok(())
    }

    /// Reorder groups and the children within each group by one column's
    /// sort keys
    pub fn sort_by(&mut self, column: usize, ascending: bool) -> Result<()> {
        if column >= self.projection.column_count() {
            bail!("column index {} out of bounds", column);
        }
        let order = |a: &Row, b: &Row| {
            let cmp = compare_values(a.sort_key(column), b.sort_key(column));
            if ascending {
                cmp
            } else {
                cmp.reverse()
            }
        };
        for node in &mut self.groups {
            node.children.sort_by(&order);
        }
        self.groups.sort_by(|a, b| order(&a.row, &b.row));
        self.reindex();
        Ok(())
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (group, node) in self.groups.iter().enumerate() {
            self.index
                .insert(node.key.clone(), TreePos { group, child: None });
            for (child, row) in node.children.iter().enumerate() {
                self.index.insert(
                    row.handle().to_string(),
                    TreePos {
                        group,
                        child: Some(child),
                    },
                );
            }
        }
    }

    /// Fuzzy-match group labels for side-panel "jump to group" navigation;
    /// best matches first
    pub fn find_groups(&self, pattern: &str) -> Vec<String> {
        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(i64, &str)> = self
            .groups
            .iter()
            .filter_map(|node| {
                let label = node.row.cell(0).as_str().unwrap_or(&node.key);
                matcher.fuzzy_match(label, pattern).map(|s| (s, label))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, label)| label.to_string()).collect()
    }

    /// Records in the store before filtering
    pub fn total(&self) -> usize {
        self.store.count(self.kind)
    }

    /// Rows currently materialized, parents included
    pub fn displayed(&self) -> usize {
        self.groups.len() + self.groups.iter().map(|g| g.children.len()).sum::<usize>()
    }

    /// Which column carries the row-highlight color, if any
    pub fn color_column(&self) -> Option<usize> {
        self.projection.color_column()
    }

    pub fn column_count(&self) -> usize {
        self.projection.column_count()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Display label of the group at `group`
    pub fn group_label(&self, group: usize) -> Option<String> {
        self.groups.get(group).map(|node| node.row.display(0))
    }

    pub fn group_row(&self, group: usize) -> Option<&Row> {
        self.groups.get(group).map(|node| &node.row)
    }

    pub fn children(&self, group: usize) -> &[Row] {
        self.groups
            .get(group)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Position of a handle's row, if displayed
    pub fn position_of(&self, handle: &str) -> Option<TreePos> {
        self.index.get(handle).copied()
    }

    /// The row at a tree position
    pub fn row_at(&self, position: TreePos) -> Option<&Row> {
        let node = self.groups.get(position.group)?;
        match position.child {
            Some(child) => node.children.get(child),
            None => Some(&node.row),
        }
    }

    /// Number of indexed handles; equals `displayed()` by invariant
    pub fn indexed(&self) -> usize {
        self.index.len()
    }
}
