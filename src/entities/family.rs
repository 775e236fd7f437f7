//! Family columns
//!
//! Display column order: 0 id, 1 father, 2 mother, 3 relationship,
//! 4 marriage date, 5 private, 6 tags, 7 change, 8 tag color.
//! Father and mother sort by their surname-first names, the marriage date
//! by its numeric key, change by raw epoch seconds.

use crate::data::record::{EntityKind, RawRecord};
use crate::data::store::RecordStore;
use crate::data::value::FieldValue;
use crate::entities::{
    change_display, change_sort, date_display, date_sort, private_marker, tag_color, tag_names,
};
use crate::model::projection::Projection;

// Raw record layout
pub const HANDLE: usize = 0;
pub const ID: usize = 1;
/// Father person handle, Null when unrecorded
pub const FATHER: usize = 2;
/// Mother person handle, Null when unrecorded
pub const MOTHER: usize = 3;
/// Handles of child persons
pub const CHILDREN: usize = 4;
/// Relationship code, see `REL_*`
pub const REL_TYPE: usize = 5;
/// Marriage event handle, Null when unrecorded
pub const MARRIAGE: usize = 6;
pub const PRIVATE: usize = 7;
pub const CHANGE: usize = 8;
pub const TAGS: usize = 9;

pub const REL_MARRIED: i64 = 0;

const REL_LABELS: [&str; 4] = ["Married", "Unmarried", "Civil Union", "Unknown"];

/// Display name of a referenced person; "" when absent or dangling
fn member_name(data: &RawRecord, field: usize, store: &dyn RecordStore) -> String {
    let handle = data.str_field(field);
    if handle.is_empty() {
        return String::new();
    }
    match store.get(EntityKind::Person, handle) {
        Some(person) => super::person::display_name(&person),
        None => String::new(),
    }
}

fn relationship(data: &RawRecord) -> FieldValue {
    let code = data.int_field(REL_TYPE).clamp(0, 3) as usize;
    FieldValue::Str(REL_LABELS[code].to_string())
}

/// (sort key, date text) of the marriage event
fn marriage_info(data: &RawRecord, store: &dyn RecordStore) -> (i64, String) {
    let handle = data.str_field(MARRIAGE);
    if handle.is_empty() {
        return (0, String::new());
    }
    match store.get(EntityKind::Event, handle) {
        Some(event) => {
            let date = event.field(super::event::DATE);
            (
                date_sort(date).as_int().unwrap_or(0),
                date_display(date).to_string(),
            )
        }
        None => (0, String::new()),
    }
}

/// The family projection; see the module doc for column order
pub fn projection() -> Projection {
    let columns: Vec<crate::model::projection::ColumnFn> = vec![
        Box::new(|data, _| FieldValue::Str(data.str_field(ID).to_string())),
        Box::new(|data, store| FieldValue::Str(member_name(data, FATHER, store))),
        Box::new(|data, store| FieldValue::Str(member_name(data, MOTHER, store))),
        Box::new(|data, _| relationship(data)),
        Box::new(|data, store| FieldValue::Str(marriage_info(data, store).1)),
        Box::new(|data, _| private_marker(data, PRIVATE)),
        Box::new(|data, store| tag_names(data, TAGS, store)),
        Box::new(|data, _| change_display(data, CHANGE)),
        Box::new(|data, store| tag_color(data, TAGS, store)),
    ];
    let sort_keys: Vec<crate::model::projection::ColumnFn> = vec![
        Box::new(|data, _| FieldValue::Str(data.str_field(ID).to_string())),
        Box::new(|data, store| FieldValue::Str(member_name(data, FATHER, store))),
        Box::new(|data, store| FieldValue::Str(member_name(data, MOTHER, store))),
        Box::new(|data, _| relationship(data)),
        Box::new(|data, store| FieldValue::Int(marriage_info(data, store).0)),
        Box::new(|data, _| private_marker(data, PRIVATE)),
        Box::new(|data, store| tag_names(data, TAGS, store)),
        Box::new(|data, _| change_sort(data, CHANGE)),
        Box::new(|data, store| tag_color(data, TAGS, store)),
    ];
    Projection::new(columns, sort_keys).with_color_column(8)
}
