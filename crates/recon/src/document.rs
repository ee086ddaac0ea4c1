//! JSON documents exchanged with disk: fetched batches, the actual registry
//! and check reports. Callers do the file IO; this module owns the shapes.

use std::io::Write;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use stdcheck_core::{ActualEntry, Body, StandardRecord};
use tracing::warn;

use crate::error::ReconError;
use crate::model::ChangeReportEntry;

/// Fetched batch of `body`'s standards.
///
/// Only the outer array is required. An element that does not read as a
/// record becomes [`StandardRecord::unreadable`], keeping whatever `query`
/// it has, so every element still gets a report entry. Elements without a
/// `body` belong to the document's body.
pub fn parse_fetched(json: &str, body: Body) -> Result<Vec<StandardRecord>, ReconError> {
    let items: Vec<Value> = serde_json::from_str(json)
        .map_err(|source| ReconError::Document { kind: "fetched", source })?;
    Ok(items
        .into_iter()
        .enumerate()
        .map(|(position, item)| fetched_record(position, item, body))
        .collect())
}

fn fetched_record(position: usize, mut item: Value, body: Body) -> StandardRecord {
    if let Value::Object(fields) = &mut item {
        if fields.get("body").map_or(true, Value::is_null) {
            fields.insert("body".into(), Value::String(body.as_str().into()));
        }
    }
    match StandardRecord::deserialize(&item) {
        Ok(record) => record,
        Err(e) => {
            warn!(position, error = %e, "unreadable fetched record");
            let query = item.get("query").and_then(Value::as_str).unwrap_or_default();
            let body = item
                .get("body")
                .and_then(|b| Body::deserialize(b).ok())
                .unwrap_or(body);
            StandardRecord::unreadable(query, body)
        }
    }
}

pub fn parse_actual(json: &str) -> Result<Vec<ActualEntry>, ReconError> {
    serde_json::from_str(json).map_err(|source| ReconError::Document { kind: "actual", source })
}

pub fn parse_report(json: &str) -> Result<Vec<ChangeReportEntry>, ReconError> {
    serde_json::from_str(json).map_err(|source| ReconError::Document { kind: "check", source })
}

/// Pretty JSON with a trailing newline.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ReconError> {
    let mut out = serde_json::to_string_pretty(value).map_err(ReconError::Serialize)?;
    out.push('\n');
    Ok(out)
}

/// Stream report entries as a JSON array, one entry at a time.
///
/// Nothing is buffered beyond the entry being written. Returns the number
/// of entries written.
pub fn write_report<W, I>(mut writer: W, entries: I) -> Result<usize, ReconError>
where
    W: Write,
    I: IntoIterator<Item = ChangeReportEntry>,
{
    writer.write_all(b"[")?;
    let mut written = 0;
    for entry in entries {
        let sep: &[u8] = if written == 0 { b"\n" } else { b",\n" };
        writer.write_all(sep)?;
        serde_json::to_writer_pretty(&mut writer, &entry).map_err(ReconError::Serialize)?;
        written += 1;
    }
    let close: &[u8] = if written == 0 { b"]\n" } else { b"\n]\n" };
    writer.write_all(close)?;
    writer.flush()?;
    Ok(written)
}
