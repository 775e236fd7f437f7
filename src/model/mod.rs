//! Model layer: generic flat and tree view engines
//!
//! One engine per shape; everything entity-specific is injected as data
//! (a `Projection`, a `TreeSpec`, a `Predicate`). Consumers hold a model,
//! rebuild it under the active predicate, and apply incremental
//! add/update/delete notifications keyed by handle.

pub mod flat;
pub mod predicate;
pub mod progress;
pub mod projection;
pub mod tree;

pub use flat::FlatModel;
pub use predicate::{
    ColumnSearch, FastFilter, FilterChain, FilterRule, HasTagRule, PatternRule, Predicate,
    PrivateRule, RuleChain,
};
pub use progress::{CancelToken, IntervalProgress, NullProgress, ProgressSink, RebuildOutcome};
pub use projection::{ColumnFn, GroupKeyFn, Projection, Row};
pub use tree::{TreeModel, TreePos, TreeSpec};
