//! Filter and search predicates
//!
//! The active predicate decides which records become rows during a
//! rebuild. Swapping it is a view-configuration change: callers set the
//! new predicate, rebuild, and reattach the model to whatever renders it.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use regex::Regex;

use crate::data::record::{EntityKind, Handle, RawRecord};
use crate::data::store::RecordStore;
use crate::model::progress::ProgressSink;
use crate::model::projection::{GroupKeyFn, Projection};

/// The active filter/search rule of one view configuration
pub enum Predicate {
    /// Accept every record
    All,
    /// Full filter chain; evaluated in a bulk pre-pass over the store
    /// before cursor iteration, so rules may use cross-record context
    Chain(Arc<dyn FilterChain>),
    /// Column search from the top search bar
    Search(ColumnSearch),
    /// Cheap per-record predicate for side-panel navigation
    Fast(FastFilter),
}

impl Predicate {
    /// Whether a bulk pre-pass must run before cursor iteration
    pub fn needs_prepass(&self) -> bool {
        matches!(self, Predicate::Chain(_))
    }

    /// Run the chain pre-pass, producing the accepted handle set.
    /// None for the inline-evaluated variants.
    pub(crate) fn prepass(
        &self,
        store: &dyn RecordStore,
        kind: EntityKind,
        progress: &mut dyn ProgressSink,
    ) -> Option<HashSet<Handle>> {
        match self {
            Predicate::Chain(chain) => Some(chain.apply(store, kind, progress)),
            _ => None,
        }
    }

    /// Inline test for one record. `Chain` accepts here; membership in the
    /// pre-pass set is checked by the caller instead.
    pub(crate) fn matches(
        &self,
        record: &RawRecord,
        store: &dyn RecordStore,
        projection: &Projection,
        group_key: Option<&GroupKeyFn>,
    ) -> bool {
        match self {
            Predicate::All | Predicate::Chain(_) => true,
            Predicate::Search(search) => {
                search.matches(&projection.display_value(search.column, record, store).to_string())
            }
            Predicate::Fast(FastFilter::RelatedHandle { field, handle }) => {
                record.str_field(*field) == handle
            }
            Predicate::Fast(FastFilter::Group(group)) => match group_key {
                Some(f) => f(record, store) == *group,
                None => false,
            },
        }
    }
}

impl Default for Predicate {
    fn default() -> Self {
        Predicate::All
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::All => write!(f, "Predicate::All"),
            Predicate::Chain(_) => write!(f, "Predicate::Chain(..)"),
            Predicate::Search(s) => write!(f, "Predicate::Search({:?})", s),
            Predicate::Fast(fast) => write!(f, "Predicate::Fast({:?})", fast),
        }
    }
}

/// Search against one projected column: substring or exact, with an
/// optional inversion (accept non-matches). Matching is case-insensitive.
#[derive(Debug, Clone)]
pub struct ColumnSearch {
    pub column: usize,
    pub text: String,
    pub invert: bool,
    pub exact: bool,
}

impl ColumnSearch {
    pub fn substring(column: usize, text: impl Into<String>, invert: bool) -> Self {
        Self {
            column,
            text: text.into(),
            invert,
            exact: false,
        }
    }

    pub fn exact(column: usize, text: impl Into<String>, invert: bool) -> Self {
        Self {
            column,
            text: text.into(),
            invert,
            exact: true,
        }
    }

    fn matches(&self, projected: &str) -> bool {
        let value = projected.to_lowercase();
        let text = self.text.to_lowercase();
        let hit = if self.exact {
            value == text
        } else {
            value.contains(&text)
        };
        hit != self.invert
    }
}

/// Cheap predicate scoped to one related handle or one group value,
/// evaluated inline with no pre-pass
#[derive(Debug, Clone)]
pub enum FastFilter {
    /// Accept records whose raw field at `field` holds `handle`
    RelatedHandle { field: usize, handle: Handle },
    /// Accept records whose derived group key equals `group`
    Group(String),
}

/// External filter-chain evaluator.
///
/// `apply` runs one bulk pass over the store and returns the accepted
/// handle set; it heartbeats the progress sink once per record so the
/// interface can repaint during long filters.
pub trait FilterChain: Send + Sync {
    fn apply(
        &self,
        store: &dyn RecordStore,
        kind: EntityKind,
        progress: &mut dyn ProgressSink,
    ) -> HashSet<Handle>;
}

/// One rule in a `RuleChain`
pub trait FilterRule: Send + Sync {
    fn matches(&self, record: &RawRecord, store: &dyn RecordStore) -> bool;
}

/// Conjunction of rules: a record is accepted when every rule matches
#[derive(Default)]
pub struct RuleChain {
    rules: Vec<Box<dyn FilterRule>>,
}

impl RuleChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, rule: Box<dyn FilterRule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FilterChain for RuleChain {
    fn apply(
        &self,
        store: &dyn RecordStore,
        kind: EntityKind,
        progress: &mut dyn ProgressSink,
    ) -> HashSet<Handle> {
        let total = store.count(kind);
        let mut accepted = HashSet::new();
        let mut done = 0;
        for (handle, record) in store.cursor(kind) {
            done += 1;
            progress.heartbeat(done, total);
            if self.rules.iter().all(|rule| rule.matches(&record, store)) {
                accepted.insert(handle);
            }
        }
        accepted
    }
}

/// Rule matching a regex against one raw string field
pub struct PatternRule {
    field: usize,
    pattern: Regex,
}

impl PatternRule {
    /// Compile a case-insensitive pattern over the raw field at `field`
    pub fn new(field: usize, pattern: &str) -> Result<Self> {
        let pattern = Regex::new(&format!("(?i){}", pattern))
            .with_context(|| format!("invalid filter pattern '{}'", pattern))?;
        Ok(Self { field, pattern })
    }
}

impl FilterRule for PatternRule {
    fn matches(&self, record: &RawRecord, _store: &dyn RecordStore) -> bool {
        self.pattern.is_match(record.str_field(self.field))
    }
}

/// Rule matching records carrying a tag with the given name
pub struct HasTagRule {
    field: usize,
    name: String,
}

impl HasTagRule {
    /// `field` is the entity's tag-handle list field
    pub fn new(field: usize, name: impl Into<String>) -> Self {
        Self {
            field,
            name: name.into(),
        }
    }
}

impl FilterRule for HasTagRule {
    fn matches(&self, record: &RawRecord, store: &dyn RecordStore) -> bool {
        record
            .handle_list(self.field)
            .filter_map(|handle| store.tag(handle))
            .any(|tag| tag.name == self.name)
    }
}

/// Rule matching records flagged private
pub struct PrivateRule {
    field: usize,
}

impl PrivateRule {
    /// `field` is the entity's private flag field
    pub fn new(field: usize) -> Self {
        Self { field }
    }
}

impl FilterRule for PrivateRule {
    fn matches(&self, record: &RawRecord, _store: &dyn RecordStore) -> bool {
        record.bool_field(self.field)
    }
}
