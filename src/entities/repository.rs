//! Repository columns
//!
//! Display column order: 0 name, 1 id, 2 type, 3 home url, 4 street,
//! 5 locality, 6 city, 7 state, 8 country, 9 postal code, 10 email,
//! 11 search url, 12 private, 13 tags, 14 change, 15 tag color.
//! The address fields all come from the repository's first address.

use crate::data::record::RawRecord;
use crate::data::value::FieldValue;
use crate::entities::{change_display, change_sort, private_marker, tag_color, tag_names};
use crate::model::projection::Projection;

// Raw record layout
pub const HANDLE: usize = 0;
pub const ID: usize = 1;
/// Repository type code, see `type_label`
pub const TYPE: usize = 2;
pub const NAME: usize = 3;
/// `[street, locality, city, state, country, postal]`, Null when absent
pub const ADDRESS: usize = 4;
/// List of `[type, path]` url pairs, see `URL_*`
pub const URLS: usize = 5;
pub const PRIVATE: usize = 6;
pub const CHANGE: usize = 7;
pub const TAGS: usize = 8;

pub const URL_EMAIL: i64 = 0;
pub const URL_WEB_HOME: i64 = 1;
pub const URL_WEB_SEARCH: i64 = 2;

const ADDR_STREET: usize = 0;
const ADDR_LOCALITY: usize = 1;
const ADDR_CITY: usize = 2;
const ADDR_STATE: usize = 3;
const ADDR_COUNTRY: usize = 4;
const ADDR_POSTAL: usize = 5;

const TYPE_LABELS: [&str; 9] = [
    "Library",
    "Archive",
    "Cemetery",
    "Church",
    "Collection",
    "Website",
    "Bookstore",
    "Album",
    "Safe",
];

/// Label for a repository type code; codes outside the table are "Other"
pub fn type_label(code: i64) -> &'static str {
    usize::try_from(code)
        .ok()
        .and_then(|code| TYPE_LABELS.get(code))
        .copied()
        .unwrap_or("Other")
}

fn address_part(data: &RawRecord, part: usize) -> FieldValue {
    let text = data
        .list_field(ADDRESS)
        .get(part)
        .and_then(|v| v.as_str())
        .unwrap_or("");
    FieldValue::Str(text.to_string())
}

fn url_of_type(data: &RawRecord, url_type: i64) -> FieldValue {
    for url in data.list_field(URLS) {
        if let Some(pair) = url.as_list() {
            let kind = pair.first().and_then(|v| v.as_int()).unwrap_or(-1);
            if kind == url_type {
                let path = pair.get(1).and_then(|v| v.as_str()).unwrap_or("");
                return FieldValue::Str(path.to_string());
            }
        }
    }
    FieldValue::Str(String::new())
}

/// The repository projection; see the module doc for column order
pub fn projection() -> Projection {
    let column_set = || -> Vec<crate::model::projection::ColumnFn> {
        vec![
            Box::new(|data, _| FieldValue::Str(data.str_field(NAME).to_string())),
            Box::new(|data, _| FieldValue::Str(data.str_field(ID).to_string())),
            Box::new(|data, _| FieldValue::Str(type_label(data.int_field(TYPE)).to_string())),
            Box::new(|data, _| url_of_type(data, URL_WEB_HOME)),
            Box::new(|data, _| address_part(data, ADDR_STREET)),
            Box::new(|data, _| address_part(data, ADDR_LOCALITY)),
            Box::new(|data, _| address_part(data, ADDR_CITY)),
            Box::new(|data, _| address_part(data, ADDR_STATE)),
            Box::new(|data, _| address_part(data, ADDR_COUNTRY)),
            Box::new(|data, _| address_part(data, ADDR_POSTAL)),
            Box::new(|data, _| url_of_type(data, URL_EMAIL)),
            Box::new(|data, _| url_of_type(data, URL_WEB_SEARCH)),
            Box::new(|data, _| private_marker(data, PRIVATE)),
            Box::new(|data, store| tag_names(data, TAGS, store)),
            Box::new(|data, _| change_display(data, CHANGE)),
            Box::new(|data, store| tag_color(data, TAGS, store)),
        ]
    };
    let mut sort_keys = column_set();
    // change sorts by raw epoch seconds, everything else by display value
    sort_keys[14] = Box::new(|data, _| change_sort(data, CHANGE));
    Projection::new(column_set(), sort_keys).with_color_column(15)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_selection() {
        let data = RawRecord::new(vec![
            FieldValue::Str("R1".to_string()),
            FieldValue::Str("R0001".to_string()),
            FieldValue::Int(1),
            FieldValue::Str("County Archive".to_string()),
            FieldValue::Null,
            FieldValue::List(vec![
                FieldValue::List(vec![
                    FieldValue::Int(URL_EMAIL),
                    FieldValue::Str("archive@example.org".to_string()),
                ]),
                FieldValue::List(vec![
                    FieldValue::Int(URL_WEB_HOME),
                    FieldValue::Str("https://example.org".to_string()),
                ]),
            ]),
        ]);

        assert_eq!(
            url_of_type(&data, URL_EMAIL),
            FieldValue::Str("archive@example.org".to_string())
        );
        assert_eq!(
            url_of_type(&data, URL_WEB_HOME),
            FieldValue::Str("https://example.org".to_string())
        );
        assert_eq!(
            url_of_type(&data, URL_WEB_SEARCH),
            FieldValue::Str(String::new())
        );
    }

    #[test]
    fn test_missing_address_degrades_to_empty() {
        let data = RawRecord::new(vec![FieldValue::Str("R1".to_string())]);
        assert_eq!(address_part(&data, ADDR_CITY), FieldValue::Str(String::new()));
    }
}
