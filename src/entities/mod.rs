//! Per-entity column projections
//!
//! One module per entity kind, each owning two things: the raw-record
//! field layout (position constants; nothing outside the module reads
//! fields by index) and the `Projection` describing that entity's display
//! columns and sort keys. The column order of each projection is a stable
//! contract with whatever renders the rows.
//!
//! Shared here: the tag columns every entity carries, change-time
//! formatting, and `[sort, text]` date-pair handling.

pub mod citation;
pub mod event;
pub mod family;
pub mod media;
pub mod person;
pub mod repository;
pub mod source;

use chrono::{LocalResult, TimeZone, Utc};

use crate::data::record::{RawRecord, DEFAULT_TAG_COLOR};
use crate::data::store::RecordStore;
use crate::data::value::FieldValue;

/// Build a `[sort, text]` date pair field
pub fn date_value(sort: i64, text: &str) -> FieldValue {
    FieldValue::List(vec![
        FieldValue::Int(sort),
        FieldValue::Str(text.to_string()),
    ])
}

/// Display text of a `[sort, text]` date pair; "" when absent
pub(crate) fn date_display(value: &FieldValue) -> FieldValue {
    match value.as_list() {
        Some(pair) => match pair.get(1).and_then(|v| v.as_str()) {
            Some(text) => FieldValue::Str(text.to_string()),
            None => FieldValue::Str(String::new()),
        },
        None => FieldValue::Str(String::new()),
    }
}

/// Numeric sort key of a `[sort, text]` date pair; 0 when absent
pub(crate) fn date_sort(value: &FieldValue) -> FieldValue {
    match value.as_list() {
        Some(pair) => FieldValue::Int(pair.first().and_then(|v| v.as_int()).unwrap_or(0)),
        None => FieldValue::Int(0),
    }
}

/// Format a change timestamp (epoch seconds) for display
pub(crate) fn format_change_time(seconds: i64) -> String {
    match Utc.timestamp_opt(seconds, 0) {
        LocalResult::Single(time) => time.format("%Y-%m-%d %H:%M:%S").to_string(),
        _ => String::new(),
    }
}

/// Change column: formatted timestamp from an epoch-seconds field
pub(crate) fn change_display(record: &RawRecord, field: usize) -> FieldValue {
    FieldValue::Str(format_change_time(record.int_field(field)))
}

/// Change sort key: the raw epoch seconds
pub(crate) fn change_sort(record: &RawRecord, field: usize) -> FieldValue {
    FieldValue::Int(record.int_field(field))
}

/// Marker column for private records
pub(crate) fn private_marker(record: &RawRecord, field: usize) -> FieldValue {
    if record.bool_field(field) {
        FieldValue::Str("locked".to_string())
    } else {
        FieldValue::Str(String::new())
    }
}

/// Row-highlight color: the color of the record's highest-precedence tag
/// (numerically lowest priority). Dangling tag handles are skipped; with
/// no resolvable tag the opaque-black sentinel is returned.
pub(crate) fn tag_color(record: &RawRecord, field: usize, store: &dyn RecordStore) -> FieldValue {
    let mut color = DEFAULT_TAG_COLOR.to_string();
    let mut best: Option<i64> = None;
    for handle in record.handle_list(field) {
        if let Some(tag) = store.tag(handle) {
            if best.map_or(true, |priority| tag.priority < priority) {
                best = Some(tag.priority);
                color = tag.color;
            }
        }
    }
    FieldValue::Str(color)
}

/// Tag names, sorted case-insensitively and joined with ", "
pub(crate) fn tag_names(record: &RawRecord, field: usize, store: &dyn RecordStore) -> FieldValue {
    let mut names: Vec<String> = record
        .handle_list(field)
        .filter_map(|handle| store.tag(handle))
        .map(|tag| tag.name)
        .collect();
    names.sort_by_key(|name| name.to_lowercase());
    FieldValue::Str(names.join(", "))
}
