//! Column and sort-key projection
//!
//! A `Projection` is the per-entity strategy injected into the generic
//! flat/tree engines: one ordered list of display-column functions, a
//! parallel list of sort-key functions, and the color-column index. The
//! entity-specific behavior lives entirely in this data; there is one
//! engine, not one model type per entity.

use crate::data::record::RawRecord;
use crate::data::store::RecordStore;
use crate::data::value::FieldValue;

/// One projected value from one raw record.
///
/// Column functions must be total over well-formed records: a missing
/// optional sub-structure or a dangling reference degrades to the field's
/// default value, never to an error.
pub type ColumnFn = Box<dyn Fn(&RawRecord, &dyn RecordStore) -> FieldValue + Send + Sync>;

/// Derives the tree grouping key for a record
pub type GroupKeyFn = Box<dyn Fn(&RawRecord, &dyn RecordStore) -> String + Send + Sync>;

/// Per-entity projection strategy: display columns, sort keys, color column
pub struct Projection {
    columns: Vec<ColumnFn>,
    sort_keys: Vec<ColumnFn>,
    color_column: Option<usize>,
}

impl Projection {
    /// Build from parallel display and sort-key function lists.
    /// The lists must be the same length; sort keys must keep a consistent
    /// value type per column across all records of the entity.
    pub fn new(columns: Vec<ColumnFn>, sort_keys: Vec<ColumnFn>) -> Self {
        assert_eq!(
            columns.len(),
            sort_keys.len(),
            "display and sort-key column counts differ"
        );
        Self {
            columns,
            sort_keys,
            color_column: None,
        }
    }

    /// Mark which column carries the row-highlight color
    pub fn with_color_column(mut self, index: usize) -> Self {
        self.color_column = Some(index);
        self
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// The color column, if this entity has color semantics
    pub fn color_column(&self) -> Option<usize> {
        self.color_column
    }

    /// One display value, for predicate evaluation against a single column
    pub fn display_value(
        &self,
        column: usize,
        record: &RawRecord,
        store: &dyn RecordStore,
    ) -> FieldValue {
        match self.columns.get(column) {
            Some(f) => f(record, store),
            None => FieldValue::Null,
        }
    }

    /// Project a full row: display cells, hidden sort keys, trailing handle
    pub fn project_row(&self, record: &RawRecord, store: &dyn RecordStore, handle: &str) -> Row {
        let mut values = Vec::with_capacity(self.columns.len() * 2 + 1);
        for f in &self.columns {
            values.push(f(record, store));
        }
        for f in &self.sort_keys {
            values.push(f(record, store));
        }
        values.push(FieldValue::Str(handle.to_string()));
        Row {
            values,
            columns: self.columns.len(),
        }
    }

    /// A row with every cell blank except optional seeds; used for
    /// synthetic tree parents. The color column is seeded with `color`.
    pub(crate) fn blank_row(&self, label: Option<&str>, color: &str, handle: &str) -> Row {
        let columns = self.columns.len();
        let mut values = vec![FieldValue::Null; columns * 2];
        if let Some(label) = label {
            values[0] = FieldValue::Str(label.to_string());
            values[columns] = FieldValue::Str(label.to_string());
        }
        if let Some(color_column) = self.color_column {
            values[color_column] = FieldValue::Str(color.to_string());
        }
        values.push(FieldValue::Str(handle.to_string()));
        Row { values, columns }
    }
}

/// One materialized row: the projected display cells, then the hidden
/// sort-key cells, then the record handle as the trailing field.
/// Rows are derived data; they are replaced, never edited.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<FieldValue>,
    columns: usize,
}

impl Row {
    pub fn column_count(&self) -> usize {
        self.columns
    }

    /// Display cell at `column`
    pub fn cell(&self, column: usize) -> &FieldValue {
        static NULL: FieldValue = FieldValue::Null;
        if column < self.columns {
            &self.values[column]
        } else {
            &NULL
        }
    }

    /// All display cells in column order
    pub fn cells(&self) -> &[FieldValue] {
        &self.values[..self.columns]
    }

    /// Hidden comparison key for `column`
    pub fn sort_key(&self, column: usize) -> &FieldValue {
        static NULL: FieldValue = FieldValue::Null;
        if column < self.columns {
            &self.values[self.columns + column]
        } else {
            &NULL
        }
    }

    /// The trailing handle field
    pub fn handle(&self) -> &str {
        self.values
            .last()
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }

    /// Display string for `column` ("" for Null)
    pub fn display(&self, column: usize) -> String {
        self.cell(column).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::store::InMemoryStore;

    fn projection() -> Projection {
        Projection::new(
            vec![
                Box::new(|data, _| FieldValue::Str(data.str_field(1).to_string())),
                Box::new(|data, _| FieldValue::Str(data.int_field(2).to_string())),
            ],
            vec![
                Box::new(|data, _| FieldValue::Str(data.str_field(1).to_string())),
                Box::new(|data, _| FieldValue::Int(data.int_field(2))),
            ],
        )
        .with_color_column(1)
    }

    fn record() -> RawRecord {
        RawRecord::new(vec![
            FieldValue::Str("H1".to_string()),
            FieldValue::Str("Alice".to_string()),
            FieldValue::Int(30),
        ])
    }

    #[test]
    fn test_project_row_shape() {
        let store = InMemoryStore::new();
        let row = projection().project_row(&record(), &store, "H1");

        assert_eq!(row.column_count(), 2);
        assert_eq!(row.display(0), "Alice");
        assert_eq!(row.display(1), "30");
        assert_eq!(row.sort_key(1), &FieldValue::Int(30));
        assert_eq!(row.handle(), "H1");
    }

    #[test]
    fn test_out_of_range_cells_are_null() {
        let store = InMemoryStore::new();
        let row = projection().project_row(&record(), &store, "H1");

        assert!(row.cell(7).is_null());
        assert!(row.sort_key(7).is_null());
        assert!(projection()
            .display_value(7, &record(), &store)
            .is_null());
    }

    #[test]
    fn test_blank_row_seeds_label_and_color() {
        let row = projection().blank_row(Some("Smith"), "#000000000000", "Smith");

        assert_eq!(row.display(0), "Smith");
        assert_eq!(row.display(1), "#000000000000");
        assert_eq!(row.sort_key(0), &FieldValue::Str("Smith".to_string()));
        assert_eq!(row.handle(), "Smith");
        assert!(row.cell(2).is_null());
    }

    #[test]
    #[should_panic(expected = "column counts differ")]
    fn test_mismatched_lists_panic() {
        let _ = Projection::new(
            vec![Box::new(|_, _| FieldValue::Null)],
            vec![],
        );
    }
}
