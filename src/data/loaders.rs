//! Fixture loaders for the in-memory store
//!
//! Two ingestion paths: a JSON document holding every entity table plus
//! the tag table, and per-entity CSV files for flat layouts. Both build an
//! `InMemoryStore`; neither is a persistence format.

use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::data::record::{EntityKind, RawRecord, Tag};
use crate::data::store::{InMemoryStore, RecordStore};
use crate::data::value::FieldValue;

/// Load a whole store from one JSON document.
///
/// Top-level keys are entity labels ("person", "source", ...) mapped to
/// arrays of records, each record an array of fields; the optional "tags"
/// key maps tag handles to `{name, priority, color}` objects.
pub fn load_store_from_json<P: AsRef<Path>>(path: P) -> Result<InMemoryStore> {
    let path = path.as_ref();
    info!("Loading store fixture from {}", path.display());
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    store_from_json_str(&text)
}

/// Parse a JSON fixture document into a store
pub fn store_from_json_str(text: &str) -> Result<InMemoryStore> {
    let document: JsonValue = serde_json::from_str(text).context("parsing store fixture")?;
    let object = match document.as_object() {
        Some(object) => object,
        None => bail!("store fixture must be a JSON object"),
    };

    let mut store = InMemoryStore::new();

    for (key, value) in object {
        if key == "tags" {
            load_tags(&mut store, value)?;
            continue;
        }
        let kind = match EntityKind::from_label(key) {
            Some(kind) => kind,
            None => bail!("unknown entity table '{}'", key),
        };
        let rows = match value.as_array() {
            Some(rows) => rows,
            None => bail!("table '{}' must be an array of records", key),
        };
        for row in rows {
            let record = json_record(row)
                .with_context(|| format!("in table '{}'", key))?;
            if record.handle().is_empty() {
                bail!("record in table '{}' has no handle in field 0", key);
            }
            store.insert(kind, record.handle().to_string(), record);
        }
        debug!("loaded {} {} records", store.count(kind), kind.label());
    }

    Ok(store)
}

fn load_tags(store: &mut InMemoryStore, value: &JsonValue) -> Result<()> {
    let tags = match value.as_object() {
        Some(tags) => tags,
        None => bail!("'tags' must map tag handles to tag objects"),
    };
    for (handle, tag) in tags {
        let tag: Tag = serde_json::from_value(tag.clone())
            .with_context(|| format!("tag '{}'", handle))?;
        store.insert_tag(handle.clone(), tag);
    }
    Ok(())
}

fn json_record(row: &JsonValue) -> Result<RawRecord> {
    let values = match row.as_array() {
        Some(values) => values,
        None => bail!("each record must be an array of fields"),
    };
    let fields = values
        .iter()
        .map(json_field)
        .collect::<Result<Vec<FieldValue>>>()?;
    Ok(RawRecord::new(fields))
}

fn json_field(value: &JsonValue) -> Result<FieldValue> {
    Ok(match value {
        JsonValue::Null => FieldValue::Null,
        JsonValue::Bool(b) => FieldValue::Bool(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Int(i),
            None => bail!("non-integer number {} in record field", n),
        },
        JsonValue::String(s) => FieldValue::Str(s.clone()),
        JsonValue::Array(values) => FieldValue::List(
            values
                .iter()
                .map(json_field)
                .collect::<Result<Vec<FieldValue>>>()?,
        ),
        JsonValue::Object(_) => bail!("record fields cannot be objects"),
    })
}

/// Load one entity table from a CSV file into an existing store.
///
/// The header row is required but its names are ignored; column order must
/// match the entity's field layout, with the handle in the first column.
/// Cells infer their field type: empty is Null, then bool, then integer;
/// a cell containing ';' becomes a list of strings; anything else is a
/// string. Returns the number of records loaded.
pub fn load_entity_csv<P: AsRef<Path>>(
    store: &mut InMemoryStore,
    kind: EntityKind,
    path: P,
) -> Result<usize> {
    let path = path.as_ref();
    info!("Loading {} records from {}", kind.label(), path.display());

    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut loaded = 0;
    for result in reader.records() {
        let row = result?;
        let fields: Vec<FieldValue> = row.iter().map(csv_field).collect();
        let record = RawRecord::new(fields);
        if record.handle().is_empty() {
            bail!("row {} has no handle in the first column", loaded + 1);
        }
        store.insert(kind, record.handle().to_string(), record);
        loaded += 1;
    }

    debug!("loaded {} {} records", loaded, kind.label());
    Ok(loaded)
}

fn csv_field(cell: &str) -> FieldValue {
    if cell.is_empty() {
        FieldValue::Null
    } else if cell.contains(';') {
        FieldValue::List(
            cell.split(';')
                .filter(|part| !part.is_empty())
                .map(|part| FieldValue::Str(part.to_string()))
                .collect(),
        )
    } else if let Ok(b) = cell.parse::<bool>() {
        FieldValue::Bool(b)
    } else if let Ok(i) = cell.parse::<i64>() {
        FieldValue::Int(i)
    } else {
        FieldValue::Str(cell.to_string())
    }
}
