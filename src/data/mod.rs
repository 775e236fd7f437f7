//! Data layer: values, records, and the record store boundary
//!
//! This module separates what records *are* (positional tuples of
//! primitive fields keyed by handle) from how they are presented
//! (the model layer).

pub mod loaders;
pub mod record;
pub mod store;
pub mod value;

pub use record::{EntityKind, Handle, RawRecord, Tag, DEFAULT_TAG_COLOR};
pub use store::{InMemoryStore, RecordStore};
pub use value::{compare_values, FieldValue};
