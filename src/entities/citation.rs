//! Citation columns, flat and tree
//!
//! The flat projection joins the owning source's columns onto every
//! citation row: 0 page, 1 id, 2 date, 3 confidence, 4 private, 5 tags,
//! 6 change, 7 source title, 8 source id, 9 source author,
//! 10 source abbreviation, 11 source publication info, 12 source private,
//! 13 source change, 14 tag color.
//!
//! The tree pairs a citation projection with a source projection over a
//! shared 11-column layout: 0 page/title, 1 id, 2 date, 3 confidence,
//! 4 private, 5 tags, 6 change, 7 author, 8 abbreviation,
//! 9 publication info, 10 tag color. Columns that only apply to the other
//! level stay blank.

use crate::data::record::{EntityKind, RawRecord};
use crate::data::store::RecordStore;
use crate::data::value::FieldValue;
use crate::entities::{
    change_display, change_sort, date_display, date_sort, format_change_time, private_marker,
    tag_color, tag_names,
};
use crate::model::projection::Projection;
use crate::model::tree::TreeSpec;

// Raw record layout
pub const HANDLE: usize = 0;
pub const ID: usize = 1;
/// `[sort, text]` date pair, Null when undated
pub const DATE: usize = 2;
pub const PAGE: usize = 3;
/// Confidence code, see `confidence_label`
pub const CONFIDENCE: usize = 4;
/// Handle of the owning source
pub const SOURCE: usize = 5;
pub const PRIVATE: usize = 6;
pub const CHANGE: usize = 7;
pub const TAGS: usize = 8;

const CONFIDENCE_LABELS: [&str; 5] = ["Very Low", "Low", "Normal", "High", "Very High"];

/// Label for a confidence code; codes outside the table are "Unknown"
pub fn confidence_label(code: i64) -> &'static str {
    usize::try_from(code)
        .ok()
        .and_then(|code| CONFIDENCE_LABELS.get(code))
        .copied()
        .unwrap_or("Unknown")
}

/// One field of the owning source record; Null when the source handle
/// dangles
fn source_field(
    data: &RawRecord,
    store: &dyn RecordStore,
    project: impl Fn(&RawRecord) -> FieldValue,
) -> FieldValue {
    match store.get(EntityKind::Source, data.str_field(SOURCE)) {
        Some(source) => project(&source),
        None => FieldValue::Null,
    }
}

/// The flat citation projection with joined source columns; see the
/// module doc for column order
pub fn projection() -> Projection {
    let columns: Vec<crate::model::projection::ColumnFn> = vec![
        Box::new(|data, _| FieldValue::Str(data.str_field(PAGE).to_string())),
        Box::new(|data, _| FieldValue::Str(data.str_field(ID).to_string())),
        Box::new(|data, _| date_display(data.field(DATE))),
        Box::new(|data, _| {
            FieldValue::Str(confidence_label(data.int_field(CONFIDENCE)).to_string())
        }),
        Box::new(|data, _| private_marker(data, PRIVATE)),
        Box::new(|data, store| tag_names(data, TAGS, store)),
        Box::new(|data, _| change_display(data, CHANGE)),
        Box::new(|data, store| {
            source_field(data, store, |s| {
                FieldValue::Str(s.str_field(super::source::TITLE).to_string())
            })
        }),
        Box::new(|data, store| {
            source_field(data, store, |s| {
                FieldValue::Str(s.str_field(super::source::ID).to_string())
            })
        }),
        Box::new(|data, store| {
            source_field(data, store, |s| {
                FieldValue::Str(s.str_field(super::source::AUTHOR).to_string())
            })
        }),
        Box::new(|data, store| {
            source_field(data, store, |s| {
                FieldValue::Str(s.str_field(super::source::ABBREV).to_string())
            })
        }),
        Box::new(|data, store| {
            source_field(data, store, |s| {
                FieldValue::Str(s.str_field(super::source::PUBINFO).to_string())
            })
        }),
        Box::new(|data, store| {
            source_field(data, store, |s| private_marker(s, super::source::PRIVATE))
        }),
        Box::new(|data, store| {
            source_field(data, store, |s| {
                FieldValue::Str(format_change_time(s.int_field(super::source::CHANGE)))
            })
        }),
        Box::new(|data, store| tag_color(data, TAGS, store)),
    ];
    let sort_keys: Vec<crate::model::projection::ColumnFn> = vec![
        Box::new(|data, _| FieldValue::Str(data.str_field(PAGE).to_string())),
        Box::new(|data, _| FieldValue::Str(data.str_field(ID).to_string())),
        Box::new(|data, _| date_sort(data.field(DATE))),
        Box::new(|data, _| {
            FieldValue::Str(confidence_label(data.int_field(CONFIDENCE)).to_string())
        }),
        Box::new(|data, _| private_marker(data, PRIVATE)),
        Box::new(|data, store| tag_names(data, TAGS, store)),
        Box::new(|data, _| change_sort(data, CHANGE)),
        Box::new(|data, store| {
            source_field(data, store, |s| {
                FieldValue::Str(s.str_field(super::source::TITLE).to_string())
            })
        }),
        Box::new(|data, store| {
            source_field(data, store, |s| {
                FieldValue::Str(s.str_field(super::source::ID).to_string())
            })
        }),
        Box::new(|data, store| {
            source_field(data, store, |s| {
                FieldValue::Str(s.str_field(super::source::AUTHOR).to_string())
            })
        }),
        Box::new(|data, store| {
            source_field(data, store, |s| {
                FieldValue::Str(s.str_field(super::source::ABBREV).to_string())
            })
        }),
        Box::new(|data, store| {
            source_field(data, store, |s| {
                FieldValue::Str(s.str_field(super::source::PUBINFO).to_string())
            })
        }),
        Box::new(|data, store| {
            source_field(data, store, |s| private_marker(s, super::source::PRIVATE))
        }),
        Box::new(|data, store| {
            source_field(data, store, |s| FieldValue::Int(s.int_field(super::source::CHANGE)))
        }),
        Box::new(|data, store| tag_color(data, TAGS, store)),
    ];
    Projection::new(columns, sort_keys).with_color_column(14)
}

/// The citation side of the tree's shared 11-column layout
pub fn tree_projection() -> Projection {
    let columns: Vec<crate::model::projection::ColumnFn> = vec![
        Box::new(|data, _| FieldValue::Str(data.str_field(PAGE).to_string())),
        Box::new(|data, _| FieldValue::Str(data.str_field(ID).to_string())),
        Box::new(|data, _| date_display(data.field(DATE))),
        Box::new(|data, _| {
            FieldValue::Str(confidence_label(data.int_field(CONFIDENCE)).to_string())
        }),
        Box::new(|data, _| private_marker(data, PRIVATE)),
        Box::new(|data, store| tag_names(data, TAGS, store)),
        Box::new(|data, _| change_display(data, CHANGE)),
        Box::new(|_, _| FieldValue::Null),
        Box::new(|_, _| FieldValue::Null),
        Box::new(|_, _| FieldValue::Null),
        Box::new(|data, store| tag_color(data, TAGS, store)),
    ];
    let sort_keys: Vec<crate::model::projection::ColumnFn> = vec![
        Box::new(|data, _| FieldValue::Str(data.str_field(PAGE).to_string())),
        Box::new(|data, _| FieldValue::Str(data.str_field(ID).to_string())),
        Box::new(|data, _| date_sort(data.field(DATE))),
        Box::new(|data, _| {
            FieldValue::Str(confidence_label(data.int_field(CONFIDENCE)).to_string())
        }),
        Box::new(|data, _| private_marker(data, PRIVATE)),
        Box::new(|data, store| tag_names(data, TAGS, store)),
        Box::new(|data, _| change_sort(data, CHANGE)),
        Box::new(|_, _| FieldValue::Null),
        Box::new(|_, _| FieldValue::Null),
        Box::new(|_, _| FieldValue::Null),
        Box::new(|data, store| tag_color(data, TAGS, store)),
    ];
    Projection::new(columns, sort_keys).with_color_column(10)
}

/// The source side of the tree's shared 11-column layout
fn tree_parent_projection() -> Projection {
    use super::source::{ABBREV, AUTHOR, CHANGE, ID, PRIVATE, PUBINFO, TAGS, TITLE};

    let columns: Vec<crate::model::projection::ColumnFn> = vec![
        Box::new(|data, _| FieldValue::Str(data.str_field(TITLE).to_string())),
        Box::new(|data, _| FieldValue::Str(data.str_field(ID).to_string())),
        Box::new(|_, _| FieldValue::Null),
        Box::new(|_, _| FieldValue::Null),
        Box::new(|data, _| private_marker(data, PRIVATE)),
        Box::new(|data, store| tag_names(data, TAGS, store)),
        Box::new(|data, _| change_display(data, CHANGE)),
        Box::new(|data, _| FieldValue::Str(data.str_field(AUTHOR).to_string())),
        Box::new(|data, _| FieldValue::Str(data.str_field(ABBREV).to_string())),
        Box::new(|data, _| FieldValue::Str(data.str_field(PUBINFO).to_string())),
        Box::new(|data, store| tag_color(data, TAGS, store)),
    ];
    let sort_keys: Vec<crate::model::projection::ColumnFn> = vec![
        Box::new(|data, _| FieldValue::Str(data.str_field(TITLE).to_string())),
        Box::new(|data, _| FieldValue::Str(data.str_field(ID).to_string())),
        Box::new(|_, _| FieldValue::Null),
        Box::new(|_, _| FieldValue::Null),
        Box::new(|data, _| private_marker(data, PRIVATE)),
        Box::new(|data, store| tag_names(data, TAGS, store)),
        Box::new(|data, _| change_sort(data, CHANGE)),
        Box::new(|data, _| FieldValue::Str(data.str_field(AUTHOR).to_string())),
        Box::new(|data, _| FieldValue::Str(data.str_field(ABBREV).to_string())),
        Box::new(|data, _| FieldValue::Str(data.str_field(PUBINFO).to_string())),
        Box::new(|data, store| tag_color(data, TAGS, store)),
    ];
    Projection::new(columns, sort_keys).with_color_column(10)
}

/// Citations grouped under their owning source
pub fn tree_spec() -> TreeSpec {
    TreeSpec::Nested {
        parent_kind: EntityKind::Source,
        parent_field: SOURCE,
        parent_projection: tree_parent_projection(),
        levels: ["Source", "Citation"],
    }
}
