//! JSON reading.
//!
//! Supported inputs:
//! - Newline-delimited JSON (`lines = true`, the default): `{"a":1}\n{"a":2}\n`
//! - A single document (`lines = false`): an array of objects `[{"a":1}, {"a":2}]` or one object
//!
//! Columns are the union of object keys in first-seen order. Nested objects and arrays are kept
//! as their JSON text.

use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::types::{Table, TableBuilder, Value};

use super::text::read_text_file;

/// Read a JSON file into a [`Table`].
pub fn read_json_from_path(
    path: impl AsRef<Path>,
    lines: bool,
    encoding: Option<&str>,
) -> LoadResult<Table> {
    let text = read_text_file(path, encoding)?;
    read_json_from_str(&text, lines)
}

/// Read JSON from an in-memory string into a [`Table`].
pub fn read_json_from_str(input: &str, lines: bool) -> LoadResult<Table> {
    let values = if lines {
        let mut values = Vec::new();
        for line in input.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            values.push(serde_json::from_str::<serde_json::Value>(line)?);
        }
        values
    } else {
        match serde_json::from_str::<serde_json::Value>(input)? {
            serde_json::Value::Array(items) => items,
            v @ serde_json::Value::Object(_) => vec![v],
            _ => {
                return Err(LoadError::SchemaMismatch {
                    message: "json must be an object or an array of objects".to_string(),
                });
            }
        }
    };

    let mut builder = TableBuilder::new();
    for (idx0, v) in values.into_iter().enumerate() {
        let serde_json::Value::Object(obj) = v else {
            return Err(LoadError::SchemaMismatch {
                message: format!("row {} is not a json object", idx0 + 1),
            });
        };
        builder.push_record(obj.into_iter().map(|(k, v)| (k, convert_json_value(v))));
    }
    Ok(builder.finish())
}

fn convert_json_value(v: serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int64(i),
            None => n.as_f64().map(Value::Float64).unwrap_or(Value::Null),
        },
        serde_json::Value::String(s) => Value::Utf8(s),
        nested @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
            Value::Utf8(nested.to_string())
        }
    }
}
