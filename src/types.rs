//! Core data model types for loading.
//!
//! Every reader produces the same in-memory [`Table`]: an ordered [`Schema`] (a list of typed
//! [`Field`]s) plus row-major [`Value`] storage. Column types are not supplied by the caller;
//! they are inferred from the values each reader produces (see [`TableBuilder`]).

use std::collections::{HashMap, HashSet};
use std::fmt;

/// Logical data type for a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
    /// Vector geometry (shapefile shapes).
    Geometry,
}

impl DataType {
    /// Common type of two column types.
    ///
    /// Integers widen to floats; any other mix of types falls back to [`DataType::Utf8`].
    pub fn unify(self, other: DataType) -> DataType {
        match (self, other) {
            (a, b) if a == b => a,
            (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
                DataType::Float64
            }
            _ => DataType::Utf8,
        }
    }
}

/// A single named, typed column in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Column name.
    pub name: String,
    /// Column data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of columns describing the shape of a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A single value in a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
    /// Vector geometry read from a shapefile.
    Geometry(geo_types::Geometry<f64>),
}

impl Value {
    /// Classify a raw text cell.
    ///
    /// Blank cells become [`Value::Null`]; integers, floats and `true`/`false` (any case) are
    /// recognised on the trimmed text; everything else is kept verbatim as [`Value::Utf8`].
    pub fn from_text(raw: &str) -> Value {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Null;
        }
        if let Ok(v) = trimmed.parse::<i64>() {
            return Value::Int64(v);
        }
        if let Ok(v) = trimmed.parse::<f64>() {
            return Value::Float64(v);
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return Value::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Value::Bool(false);
        }
        Value::Utf8(raw.to_owned())
    }

    /// The type of this value, or `None` for [`Value::Null`].
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Int64(_) => Some(DataType::Int64),
            Value::Float64(_) => Some(DataType::Float64),
            Value::Bool(_) => Some(DataType::Bool),
            Value::Utf8(_) => Some(DataType::Utf8),
            Value::Geometry(_) => Some(DataType::Geometry),
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the string slice if this is a [`Value::Utf8`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s.as_str()),
            _ => None,
        }
    }

    fn coerce(self, target: DataType) -> Value {
        match (self, target) {
            (Value::Int64(v), DataType::Float64) => Value::Float64(v as f64),
            (v @ Value::Utf8(_), _) | (v @ Value::Null, _) => v,
            (v, DataType::Utf8) => Value::Utf8(v.to_string()),
            (v, _) => v,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Utf8(v) => f.write_str(v),
            Value::Geometry(g) => write!(f, "{g:?}"),
        }
    }
}

/// In-memory tabular result of a load.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the table.
    pub fn column_count(&self) -> usize {
        self.schema.fields.len()
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.schema.field_names().collect()
    }

    /// All values of the named column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.schema.index_of(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// A single row as `(column name, value)` pairs.
    pub fn row(&self, index: usize) -> Option<Vec<(&str, &Value)>> {
        let row = self.rows.get(index)?;
        Some(self.schema.field_names().zip(row.iter()).collect())
    }
}

/// Positional column labels (`"0"`, `"1"`, ...) for data without a header.
pub fn positional_names(count: usize) -> Vec<String> {
    (0..count).map(|i| i.to_string()).collect()
}

/// Make header names unique: repeats of `name` become `name.1`, `name.2`, ...
///
/// A suffixed name that is itself taken moves on to the next suffix.
pub fn dedup_names(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .map(|name| {
            let unique = unused_name(&name, |candidate| seen.contains(candidate));
            seen.insert(unique.clone());
            unique
        })
        .collect()
}

fn unused_name(name: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(name) {
        return name.to_string();
    }
    (1..)
        .map(|n| format!("{name}.{n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| name.to_string())
}

/// Accumulates raw rows and infers column types when finished.
///
/// Rows can be pushed positionally ([`TableBuilder::push_row`]) or as named records
/// ([`TableBuilder::push_record`]); named records add unseen columns in first-seen order.
/// Missing cells are filled with [`Value::Null`].
#[derive(Debug, Default)]
pub struct TableBuilder {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Value>>,
}

impl TableBuilder {
    /// Create an empty builder with no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with a known set of columns.
    ///
    /// Repeated names are kept as separate columns, renamed as by [`dedup_names`].
    pub fn with_columns(columns: Vec<String>) -> Self {
        let mut builder = Self::new();
        for name in dedup_names(columns) {
            builder.column_index(name);
        }
        builder
    }

    /// Append a row whose values line up with the known columns.
    ///
    /// Extra trailing values get positional column names.
    pub fn push_row(&mut self, row: Vec<Value>) {
        while self.columns.len() < row.len() {
            let position = self.columns.len().to_string();
            let name = unused_name(&position, |candidate| self.index.contains_key(candidate));
            self.column_index(name);
        }
        self.rows.push(row);
    }

    /// Append a row of `(column name, value)` pairs.
    pub fn push_record<I>(&mut self, record: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut row = vec![Value::Null; self.columns.len()];
        for (name, value) in record {
            let idx = self.column_index(name);
            if idx >= row.len() {
                row.resize(idx + 1, Value::Null);
            }
            row[idx] = value;
        }
        self.rows.push(row);
    }

    /// Number of rows pushed so far.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Infer column types and build the [`Table`].
    pub fn finish(self) -> Table {
        let width = self.columns.len();
        let mut types: Vec<Option<DataType>> = vec![None; width];
        for row in &self.rows {
            for (slot, value) in types.iter_mut().zip(row.iter()) {
                if let Some(dt) = value.data_type() {
                    *slot = Some(match *slot {
                        Some(current) => current.unify(dt),
                        None => dt,
                    });
                }
            }
        }
        let types: Vec<DataType> = types
            .into_iter()
            .map(|t| t.unwrap_or(DataType::Utf8))
            .collect();

        let rows = self
            .rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Null);
                row.into_iter()
                    .zip(types.iter())
                    .map(|(value, &dt)| value.coerce(dt))
                    .collect()
            })
            .collect();

        let fields = self
            .columns
            .into_iter()
            .zip(types)
            .map(|(name, dt)| Field::new(name, dt))
            .collect();

        Table::new(Schema::new(fields), rows)
    }

    fn column_index(&mut self, name: String) -> usize {
        if let Some(&idx) = self.index.get(&name) {
            return idx;
        }
        let idx = self.columns.len();
        self.columns.push(name.clone());
        self.index.insert(name, idx);
        idx
    }
}
