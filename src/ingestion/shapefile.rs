//! Shapefile reading.
//!
//! A shapefile is read from its `.shp` path; the `.dbf` (attributes) and `.shx` (index)
//! siblings must sit next to it with the same stem.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use ::shapefile::dbase::FieldValue;
use ::shapefile::Shape;

use crate::error::{LoadError, LoadResult};
use crate::types::{Table, TableBuilder, Value};

/// Name of the column holding each record's shape.
pub const GEOMETRY_COLUMN: &str = "geometry";

/// Read a shapefile into a [`Table`].
///
/// Attribute columns come first, in `.dbf` field order, followed by [`GEOMETRY_COLUMN`]. Null
/// shapes and empty attribute values become [`Value::Null`].
pub fn read_shapefile_from_path(path: impl AsRef<Path>) -> LoadResult<Table> {
    let path = path.as_ref();
    let mut reader = ::shapefile::Reader::from_path(path)?;
    let field_order = dbf_field_names(path)?;

    let mut seen = BTreeSet::new();
    let mut records = Vec::new();
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result?;
        let fields = HashMap::<String, FieldValue>::from(record);
        seen.extend(fields.keys().cloned());
        records.push((shape, fields));
    }

    let attribute_names = attribute_columns(field_order, seen);
    let mut columns = attribute_names.clone();
    columns.push(GEOMETRY_COLUMN.to_string());

    let mut builder = TableBuilder::with_columns(columns);
    for (shape, mut fields) in records {
        let mut row: Vec<Value> = attribute_names
            .iter()
            .map(|name| fields.remove(name).map(convert_field_value).unwrap_or(Value::Null))
            .collect();
        row.push(convert_shape(shape)?);
        builder.push_row(row);
    }
    Ok(builder.finish())
}

fn dbf_field_names(shp: &Path) -> LoadResult<Vec<String>> {
    let dbf = ::shapefile::dbase::Reader::from_path(shp.with_extension("dbf"))
        .map_err(::shapefile::Error::from)?;
    Ok(dbf.fields().iter().map(|f| f.name().to_string()).collect())
}

// Header fields that records never carry (the deletion flag) drop out; names only seen in
// records go last, sorted.
fn attribute_columns(field_order: Vec<String>, mut seen: BTreeSet<String>) -> Vec<String> {
    let mut columns: Vec<String> = field_order
        .into_iter()
        .filter(|name| seen.remove(name))
        .collect();
    columns.extend(seen);
    columns
}

fn convert_shape(shape: Shape) -> LoadResult<Value> {
    if matches!(shape, Shape::NullShape) {
        return Ok(Value::Null);
    }
    geo_types::Geometry::<f64>::try_from(shape)
        .map(Value::Geometry)
        .map_err(|e| LoadError::Geometry {
            message: e.to_string(),
        })
}

fn convert_field_value(v: FieldValue) -> Value {
    match v {
        FieldValue::Character(Some(s)) | FieldValue::Memo(s) => {
            let s = s.trim_end();
            if s.is_empty() {
                Value::Null
            } else {
                Value::Utf8(s.to_string())
            }
        }
        FieldValue::Numeric(Some(n)) => Value::Float64(n),
        FieldValue::Float(Some(f)) => Value::Float64(f64::from(f)),
        FieldValue::Integer(i) => Value::Int64(i64::from(i)),
        FieldValue::Double(d) | FieldValue::Currency(d) => Value::Float64(d),
        FieldValue::Logical(Some(b)) => Value::Bool(b),
        FieldValue::Date(Some(d)) => {
            Value::Utf8(format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day()))
        }
        FieldValue::Character(None)
        | FieldValue::Numeric(None)
        | FieldValue::Float(None)
        | FieldValue::Logical(None)
        | FieldValue::Date(None) => Value::Null,
        other => Value::Utf8(format!("{other:?}")),
    }
}
