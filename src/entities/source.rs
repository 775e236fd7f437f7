//! Source columns
//!
//! Display column order: 0 title, 1 id, 2 author, 3 abbreviation,
//! 4 publication info, 5 private, 6 tags, 7 change, 8 tag color.

use crate::data::value::FieldValue;
use crate::entities::{change_display, change_sort, private_marker, tag_color, tag_names};
use crate::model::projection::Projection;

// Raw record layout
pub const HANDLE: usize = 0;
pub const ID: usize = 1;
pub const TITLE: usize = 2;
pub const AUTHOR: usize = 3;
pub const PUBINFO: usize = 4;
pub const ABBREV: usize = 5;
pub const PRIVATE: usize = 6;
pub const CHANGE: usize = 7;
pub const TAGS: usize = 8;

/// The source projection; see the module doc for column order
pub fn projection() -> Projection {
    let columns: Vec<crate::model::projection::ColumnFn> = vec![
        Box::new(|data, _| FieldValue::Str(data.str_field(TITLE).to_string())),
        Box::new(|data, _| FieldValue::Str(data.str_field(ID).to_string())),
        Box::new(|data, _| FieldValue::Str(data.str_field(AUTHOR).to_string())),
        Box::new(|data, _| FieldValue::Str(data.str_field(ABBREV).to_string())),
        Box::new(|data, _| FieldValue::Str(data.str_field(PUBINFO).to_string())),
        Box::new(|data, _| private_marker(data, PRIVATE)),
        Box::new(|data, store| tag_names(data, TAGS, store)),
        Box::new(|data, _| change_display(data, CHANGE)),
        Box::new(|data, store| tag_color(data, TAGS, store)),
    ];
    let sort_keys: Vec<crate::model::projection::ColumnFn> = vec![
        Box::new(|data, _| FieldValue::Str(data.str_field(TITLE).to_string())),
        Box::new(|data, _| FieldValue::Str(data.str_field(ID).to_string())),
        Box::new(|data, _| FieldValue::Str(data.str_field(AUTHOR).to_string())),
        Box::new(|data, _| FieldValue::Str(data.str_field(ABBREV).to_string())),
        Box::new(|data, _| FieldValue::Str(data.str_field(PUBINFO).to_string())),
        Box::new(|data, _| private_marker(data, PRIVATE)),
        Box::new(|data, store| tag_names(data, TAGS, store)),
        Box::new(|data, _| change_sort(data, CHANGE)),
        Box::new(|data, store| tag_color(data, TAGS, store)),
    ];
    Projection::new(columns, sort_keys).with_color_column(8)
}
