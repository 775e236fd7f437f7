//! Event columns
//!
//! Display column order: 0 description, 1 id, 2 type, 3 date, 4 place,
//! 5 private, 6 tags, 7 change, 8 tag color. The date sorts by its
//! numeric key, change by raw epoch seconds.

use crate::data::record::RawRecord;
use crate::data::value::FieldValue;
use crate::entities::{
    change_display, change_sort, date_display, date_sort, private_marker, tag_color, tag_names,
};
use crate::model::projection::Projection;

// Raw record layout
pub const HANDLE: usize = 0;
pub const ID: usize = 1;
/// Event type code, see `type_label`
pub const TYPE: usize = 2;
/// `[sort, text]` date pair, Null when undated
pub const DATE: usize = 3;
pub const DESCRIPTION: usize = 4;
/// Place title, "" when unplaced
pub const PLACE: usize = 5;
pub const PRIVATE: usize = 6;
pub const CHANGE: usize = 7;
pub const TAGS: usize = 8;

const TYPE_LABELS: [&str; 10] = [
    "Birth",
    "Death",
    "Marriage",
    "Divorce",
    "Baptism",
    "Burial",
    "Cremation",
    "Census",
    "Residence",
    "Occupation",
];

/// Label for an event type code; codes outside the table are "Other"
pub fn type_label(code: i64) -> &'static str {
    usize::try_from(code)
        .ok()
        .and_then(|code| TYPE_LABELS.get(code))
        .copied()
        .unwrap_or("Other")
}

/// The event projection; see the module doc for column order
pub fn projection() -> Projection {
    let columns: Vec<crate::model::projection::ColumnFn> = vec![
        Box::new(|data, _| FieldValue::Str(data.str_field(DESCRIPTION).to_string())),
        Box::new(|data, _| FieldValue::Str(data.str_field(ID).to_string())),
        Box::new(|data, _| FieldValue::Str(type_label(data.int_field(TYPE)).to_string())),
        Box::new(|data, _| date_display(data.field(DATE))),
        Box::new(|data, _| FieldValue::Str(data.str_field(PLACE).to_string())),
        Box::new(|data, _| private_marker(data, PRIVATE)),
        Box::new(|data, store| tag_names(data, TAGS, store)),
        Box::new(|data, _| change_display(data, CHANGE)),
        Box::new(|data, store| tag_color(data, TAGS, store)),
    ];
    let sort_keys: Vec<crate::model::projection::ColumnFn> = vec![
        Box::new(|data, _| FieldValue::Str(data.str_field(DESCRIPTION).to_string())),
        Box::new(|data, _| FieldValue::Str(data.str_field(ID).to_string())),
        Box::new(|data, _| FieldValue::Str(type_label(data.int_field(TYPE)).to_string())),
        Box::new(|data, _| date_sort(data.field(DATE))),
        Box::new(|data, _| FieldValue::Str(data.str_field(PLACE).to_string())),
        Box::new(|data, _| private_marker(data, PRIVATE)),
        Box::new(|data, store| tag_names(data, TAGS, store)),
        Box::new(|data, _| change_sort(data, CHANGE)),
        Box::new(|data, store| tag_color(data, TAGS, store)),
    ];
    Projection::new(columns, sort_keys).with_color_column(8)
}
