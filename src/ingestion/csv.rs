//! CSV and delimited-text reading.

use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::types::{Table, TableBuilder, Value};

use super::text::read_text_file;

/// Read a delimited file into a [`Table`].
///
/// Rules:
///
/// - With `has_headers`, the first record names the columns (blank names become positional).
/// - Without headers, columns are named `"0"`, `"1"`, ...
/// - Every record must have the same number of fields; ragged input is a CSV error.
/// - Column types are inferred from the cell text (see [`Value::from_text`]).
pub fn read_csv_from_path(
    path: impl AsRef<Path>,
    delimiter: u8,
    has_headers: bool,
    encoding: Option<&str>,
) -> LoadResult<Table> {
    let text = read_text_file(path, encoding)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());
    read_csv_from_reader(&mut rdr)
}

/// Read CSV data from an existing CSV reader.
pub fn read_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> LoadResult<Table> {
    // Without headers this peeks at the first record, which `records()` still yields.
    let first = rdr.headers()?.clone();
    let columns: Vec<String> = if rdr.has_headers() {
        first
            .iter()
            .enumerate()
            .map(|(i, h)| if h.trim().is_empty() { i.to_string() } else { h.to_owned() })
            .collect()
    } else {
        crate::types::positional_names(first.len())
    };

    let mut builder = TableBuilder::with_columns(columns);
    for result in rdr.records() {
        let record = result?;
        builder.push_row(record.iter().map(Value::from_text).collect());
    }
    Ok(builder.finish())
}

/// Read a text file as a single column, one row per non-blank line.
///
/// This is the newline-separated form of the fallback reader: there is no field splitting.
pub fn read_lines_from_path(
    path: impl AsRef<Path>,
    has_headers: bool,
    encoding: Option<&str>,
) -> LoadResult<Table> {
    let text = read_text_file(path, encoding)?;
    Ok(read_lines_from_str(&text, has_headers))
}

/// Read newline-separated text from memory as a single column.
pub fn read_lines_from_str(input: &str, has_headers: bool) -> Table {
    let mut lines = input.lines().filter(|line| !line.trim().is_empty());
    let column = if has_headers {
        lines.next().map(str::to_owned)
    } else {
        None
    };

    let mut builder = TableBuilder::with_columns(vec![column.unwrap_or_else(|| "0".to_string())]);
    for line in lines {
        builder.push_row(vec![Value::from_text(line)]);
    }
    builder.finish()
}

/// Convert a separator option into the single byte the CSV reader needs.
pub fn delimiter_byte(sep: char) -> LoadResult<u8> {
    if sep.is_ascii() {
        Ok(sep as u8)
    } else {
        Err(LoadError::InvalidOption {
            message: format!("separator {sep:?} is not a single-byte ASCII character"),
        })
    }
}
