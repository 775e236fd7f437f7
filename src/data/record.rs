use serde::{Deserialize, Serialize};

use crate::data::value::FieldValue;

/// Stable, globally unique string key for one record
pub type Handle = String;

/// Color returned for the tag color column when a record has no tags
/// or none of its tag handles resolve
pub const DEFAULT_TAG_COLOR: &str = "#000000000000";

/// The record categories a store can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Person,
    Family,
    Event,
    Media,
    Repository,
    Source,
    Citation,
}

impl EntityKind {
    pub fn all() -> [EntityKind; 7] {
        [
            EntityKind::Person,
            EntityKind::Family,
            EntityKind::Event,
            EntityKind::Media,
            EntityKind::Repository,
            EntityKind::Source,
            EntityKind::Citation,
        ]
    }

    /// Lowercase name, also used as the key in JSON fixtures
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Person => "person",
            EntityKind::Family => "family",
            EntityKind::Event => "event",
            EntityKind::Media => "media",
            EntityKind::Repository => "repository",
            EntityKind::Source => "source",
            EntityKind::Citation => "citation",
        }
    }

    pub fn from_label(label: &str) -> Option<EntityKind> {
        EntityKind::all().into_iter().find(|k| k.label() == label)
    }
}

/// A tag attached to records, resolved from a tag handle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub priority: i64,
    pub color: String,
}

/// One record as stored: an ordered tuple of primitive fields.
///
/// Field order and arity are fixed per entity kind by the store; the
/// per-entity projector modules are the only code aware of positions.
/// Field zero is always the record's own handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub fields: Vec<FieldValue>,
}

static NULL_FIELD: FieldValue = FieldValue::Null;

impl RawRecord {
    pub fn new(fields: Vec<FieldValue>) -> Self {
        Self { fields }
    }

    /// Field at `index`; Null when the record is too short
    pub fn field(&self, index: usize) -> &FieldValue {
        self.fields.get(index).unwrap_or(&NULL_FIELD)
    }

    /// String field, degrading to "" for anything else
    pub fn str_field(&self, index: usize) -> &str {
        self.field(index).as_str().unwrap_or("")
    }

    /// Integer field, degrading to 0
    pub fn int_field(&self, index: usize) -> i64 {
        self.field(index).as_int().unwrap_or(0)
    }

    /// Boolean field, degrading to false
    pub fn bool_field(&self, index: usize) -> bool {
        self.field(index).as_bool().unwrap_or(false)
    }

    /// List field, degrading to an empty slice
    pub fn list_field(&self, index: usize) -> &[FieldValue] {
        self.field(index).as_list().unwrap_or(&[])
    }

    /// Handles held in a list field (non-string entries are skipped)
    pub fn handle_list(&self, index: usize) -> impl Iterator<Item = &str> {
        self.list_field(index).iter().filter_map(|v| v.as_str())
    }

    /// The record's own handle (field zero)
    pub fn handle(&self) -> &str {
        self.str_field(0)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_access_degrades_to_defaults() {
        let record = RawRecord::new(vec![
            FieldValue::Str("H1".to_string()),
            FieldValue::Int(7),
            FieldValue::Null,
        ]);

        assert_eq!(record.handle(), "H1");
        assert_eq!(record.int_field(1), 7);
        assert_eq!(record.str_field(1), "");
        assert_eq!(record.str_field(2), "");
        assert_eq!(record.int_field(99), 0);
        assert!(record.list_field(99).is_empty());
        assert!(!record.bool_field(2));
    }

    #[test]
    fn test_handle_list_skips_non_strings() {
        let record = RawRecord::new(vec![
            FieldValue::Str("H1".to_string()),
            FieldValue::List(vec![
                FieldValue::Str("T1".to_string()),
                FieldValue::Int(3),
                FieldValue::Str("T2".to_string()),
            ]),
        ]);

        let handles: Vec<&str> = record.handle_list(1).collect();
        assert_eq!(handles, vec!["T1", "T2"]);
    }

    #[test]
    fn test_entity_kind_labels_round_trip() {
        for kind in EntityKind::all() {
            assert_eq!(EntityKind::from_label(kind.label()), Some(kind));
        }
        assert_eq!(EntityKind::from_label("bogus"), None);
    }
}
