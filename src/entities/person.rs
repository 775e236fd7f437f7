//! Person columns
//!
//! Display column order (the stable contract with the view):
//! 0 name, 1 id, 2 gender, 3 birth date, 4 birth place, 5 death date,
//! 6 death place, 7 spouses, 8 parents, 9 marriages, 10 children,
//! 11 private, 12 tags, 13 change, 14 tag color.
//!
//! Birth and death dates sort by their numeric date key, change by raw
//! epoch seconds; everything else sorts by its display value except the
//! name, which sorts by the surname-first form.

use crate::data::record::{EntityKind, RawRecord};
use crate::data::store::RecordStore;
use crate::data::value::FieldValue;
use crate::entities::{
    change_display, change_sort, date_display, date_sort, private_marker, tag_color, tag_names,
};
use crate::model::projection::{GroupKeyFn, Projection};
use crate::model::tree::TreeSpec;

// Raw record layout
pub const HANDLE: usize = 0;
pub const ID: usize = 1;
/// 0 female, 1 male, 2 unknown
pub const GENDER: usize = 2;
/// `[given, surname]` or `[given, surname, grouping]`
pub const NAME: usize = 3;
/// Birth event handle, Null when unrecorded
pub const BIRTH: usize = 4;
/// Death event handle, Null when unrecorded
pub const DEATH: usize = 5;
/// Handles of families this person is a spouse in
pub const FAMILIES: usize = 6;
/// Handles of families this person is a child in
pub const PARENT_FAMILIES: usize = 7;
pub const PRIVATE: usize = 8;
pub const CHANGE: usize = 9;
pub const TAGS: usize = 10;

const GENDER_LABELS: [&str; 3] = ["female", "male", "unknown"];

fn name_parts(data: &RawRecord) -> (&str, &str, Option<&str>) {
    let name = data.list_field(NAME);
    let given = name.first().and_then(|v| v.as_str()).unwrap_or("");
    let surname = name.get(1).and_then(|v| v.as_str()).unwrap_or("");
    let group = name.get(2).and_then(|v| v.as_str());
    (given, surname, group)
}

/// "Surname, Given" with graceful degradation when a part is missing
pub(crate) fn display_name(data: &RawRecord) -> String {
    let (given, surname, _) = name_parts(data);
    match (surname.is_empty(), given.is_empty()) {
        (false, false) => format!("{}, {}", surname, given),
        (false, true) => surname.to_string(),
        (true, false) => given.to_string(),
        (true, true) => String::new(),
    }
}

/// The grouping value: the explicit grouping override when present,
/// otherwise the surname
pub fn group_of(data: &RawRecord) -> String {
    let (_, surname, group) = name_parts(data);
    group.unwrap_or(surname).to_string()
}

/// (sort key, date text, place) of a referenced event; zeros and empty
/// strings when the reference is absent or dangling
fn event_info(data: &RawRecord, field: usize, store: &dyn RecordStore) -> (i64, String, String) {
    let handle = data.str_field(field);
    if handle.is_empty() {
        return (0, String::new(), String::new());
    }
    match store.get(EntityKind::Event, handle) {
        Some(event) => {
            let sort = date_sort(event.field(super::event::DATE))
                .as_int()
                .unwrap_or(0);
            let text = date_display(event.field(super::event::DATE)).to_string();
            let place = event.str_field(super::event::PLACE).to_string();
            (sort, text, place)
        }
        None => (0, String::new(), String::new()),
    }
}

/// Names of the other spouses in this person's families, joined with ", "
fn spouse_names(data: &RawRecord, store: &dyn RecordStore) -> String {
    let own_handle = data.handle();
    let mut spouses = String::new();
    for family_handle in data.handle_list(FAMILIES) {
        let family = match store.get(EntityKind::Family, family_handle) {
            Some(family) => family,
            None => continue,
        };
        for field in [super::family::FATHER, super::family::MOTHER] {
            let spouse_handle = family.str_field(field);
            if spouse_handle.is_empty() || spouse_handle == own_handle {
                continue;
            }
            if let Some(spouse) = store.get(EntityKind::Person, spouse_handle) {
                if !spouses.is_empty() {
                    spouses.push_str(", ");
                }
                spouses.push_str(&display_name(&spouse));
            }
        }
    }
    spouses
}

/// Number of recorded parents in the person's first parent family
fn parents_count(data: &RawRecord, store: &dyn RecordStore) -> i64 {
    let mut parents = 0;
    if let Some(family_handle) = data.handle_list(PARENT_FAMILIES).next() {
        if let Some(family) = store.get(EntityKind::Family, family_handle) {
            if !family.str_field(super::family::FATHER).is_empty() {
                parents += 1;
            }
            if !family.str_field(super::family::MOTHER).is_empty() {
                parents += 1;
            }
        }
    }
    parents
}

/// Number of families with a married relation
fn marriages_count(data: &RawRecord, store: &dyn RecordStore) -> i64 {
    data.handle_list(FAMILIES)
        .filter_map(|handle| store.get(EntityKind::Family, handle))
        .filter(|family| family.int_field(super::family::REL_TYPE) == super::family::REL_MARRIED)
        .count() as i64
}

/// Number of children across the person's families
fn children_count(data: &RawRecord, store: &dyn RecordStore) -> i64 {
    data.handle_list(FAMILIES)
        .filter_map(|handle| store.get(EntityKind::Family, handle))
        .map(|family| family.list_field(super::family::CHILDREN).len() as i64)
        .sum()
}

/// The person projection; see the module doc for column order
pub fn projection() -> Projection {
    let columns: Vec<crate::model::projection::ColumnFn> = vec![
        Box::new(|data, _| FieldValue::Str(display_name(data))),
        Box::new(|data, _| FieldValue::Str(data.str_field(ID).to_string())),
        Box::new(|data, _| {
            let gender = data.int_field(GENDER).clamp(0, 2) as usize;
            FieldValue::Str(GENDER_LABELS[gender].to_string())
        }),
        Box::new(|data, store| FieldValue::Str(event_info(data, BIRTH, store).1)),
        Box::new(|data, store| FieldValue::Str(event_info(data, BIRTH, store).2)),
        Box::new(|data, store| FieldValue::Str(event_info(data, DEATH, store).1)),
        Box::new(|data, store| FieldValue::Str(event_info(data, DEATH, store).2)),
        Box::new(|data, store| FieldValue::Str(spouse_names(data, store))),
        Box::new(|data, store| FieldValue::Int(parents_count(data, store))),
        Box::new(|data, store| FieldValue::Int(marriages_count(data, store))),
        Box::new(|data, store| FieldValue::Int(children_count(data, store))),
        Box::new(|data, _| private_marker(data, PRIVATE)),
        Box::new(|data, store| tag_names(data, TAGS, store)),
        Box::new(|data, _| change_display(data, CHANGE)),
        Box::new(|data, store| tag_color(data, TAGS, store)),
    ];
    let sort_keys: Vec<crate::model::projection::ColumnFn> = vec![
        Box::new(|data, _| FieldValue::Str(display_name(data))),
        Box::new(|data, _| FieldValue::Str(data.str_field(ID).to_string())),
        Box::new(|data, _| {
            let gender = data.int_field(GENDER).clamp(0, 2) as usize;
            FieldValue::Str(GENDER_LABELS[gender].to_string())
        }),
        Box::new(|data, store| FieldValue::Int(event_info(data, BIRTH, store).0)),
        Box::new(|data, store| FieldValue::Str(event_info(data, BIRTH, store).2)),
        Box::new(|data, store| FieldValue::Int(event_info(data, DEATH, store).0)),
        Box::new(|data, store| FieldValue::Str(event_info(data, DEATH, store).2)),
        Box::new(|data, store| FieldValue::Str(spouse_names(data, store))),
        Box::new(|data, store| FieldValue::Int(parents_count(data, store))),
        Box::new(|data, store| FieldValue::Int(marriages_count(data, store))),
        Box::new(|data, store| FieldValue::Int(children_count(data, store))),
        Box::new(|data, _| private_marker(data, PRIVATE)),
        Box::new(|data, store| tag_names(data, TAGS, store)),
        Box::new(|data, _| change_sort(data, CHANGE)),
        Box::new(|data, store| tag_color(data, TAGS, store)),
    ];
    Projection::new(columns, sort_keys).with_color_column(14)
}

/// Group-key derivation for fast group filters on the flat person list
pub fn group_key() -> GroupKeyFn {
    Box::new(|data, _| group_of(data))
}

/// People grouped under their name-grouping value
pub fn tree_spec() -> TreeSpec {
    TreeSpec::Grouped {
        group_key: group_key(),
        levels: ["Group As", "Name"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(given: &str, surname: &str, group: Option<&str>) -> RawRecord {
        let mut name = vec![
            FieldValue::Str(given.to_string()),
            FieldValue::Str(surname.to_string()),
        ];
        if let Some(group) = group {
            name.push(FieldValue::Str(group.to_string()));
        }
        RawRecord::new(vec![
            FieldValue::Str("P1".to_string()),
            FieldValue::Str("I0001".to_string()),
            FieldValue::Int(1),
            FieldValue::List(name),
        ])
    }

    #[test]
    fn test_display_name_forms() {
        assert_eq!(display_name(&named("John", "Smith", None)), "Smith, John");
        assert_eq!(display_name(&named("", "Smith", None)), "Smith");
        assert_eq!(display_name(&named("John", "", None)), "John");
        assert_eq!(display_name(&named("", "", None)), "");
    }

    #[test]
    fn test_group_of_prefers_override() {
        assert_eq!(group_of(&named("John", "Smith", None)), "Smith");
        assert_eq!(
            group_of(&named("John", "MacDonald", Some("McDonald"))),
            "McDonald"
        );
    }
}
