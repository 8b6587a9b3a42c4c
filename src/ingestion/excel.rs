#![cfg(feature = "excel")]

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::error::{LoadError, LoadResult};
use crate::types::{dedup_names, Table, TableBuilder, Value};

/// Read an Excel document (`.xlsx`, `.xls`, `.ods`, etc.) into an in-memory [`Table`].
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Reads remaining rows, keeping numbers, booleans and strings as typed [`Value`]s
pub fn read_excel_from_path(path: impl AsRef<Path>, sheet_name: Option<&str>) -> LoadResult<Table> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| LoadError::SchemaMismatch {
                message: "workbook has no sheets".to_string(),
            })?,
    };

    let mut builder = TableBuilder::new();
    let range = workbook.worksheet_range(&sheet)?;
    read_sheet_range(&sheet, &range, &mut builder)?;
    Ok(builder.finish())
}

/// Read multiple sheets from an Excel workbook and concatenate all rows into one [`Table`].
///
/// - If `sheet_names` is `None`, reads **all sheets** in workbook order.
/// - If `sheet_names` is `Some(&[...])`, reads only those sheets (in the provided order).
///
/// Columns are matched by header name across sheets; a column missing from a sheet is null for
/// that sheet's rows.
pub fn read_excel_workbook_from_path(
    path: impl AsRef<Path>,
    sheet_names: Option<&[&str]>,
) -> LoadResult<Table> {
    let mut workbook = open_workbook_auto(path)?;

    let sheets: Vec<String> = match sheet_names {
        Some(names) => names.iter().map(|s| s.to_string()).collect(),
        None => workbook.sheet_names().to_vec(),
    };
    if sheets.is_empty() {
        return Err(LoadError::SchemaMismatch {
            message: "workbook has no sheets".to_string(),
        });
    }

    let mut builder = TableBuilder::new();
    for sheet in sheets {
        let range = workbook.worksheet_range(&sheet)?;
        read_sheet_range(&sheet, &range, &mut builder)?;
    }
    Ok(builder.finish())
}

fn read_sheet_range(
    sheet: &str,
    range: &calamine::Range<Data>,
    builder: &mut TableBuilder,
) -> LoadResult<()> {
    let header_row_idx = range
        .rows()
        .position(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
        .ok_or_else(|| LoadError::SchemaMismatch {
            message: format!("sheet '{sheet}': sheet has no non-empty rows (no header row found)"),
        })?;

    let mut rows = range.rows().skip(header_row_idx);
    // Repeated headers within a sheet stay separate columns (`id`, `id.1`).
    let header = dedup_names(
        rows.next()
            .into_iter()
            .flatten()
            .enumerate()
            .map(|(i, c)| {
                let name = cell_to_header_string(c);
                if name.trim().is_empty() { i.to_string() } else { name.trim().to_string() }
            }),
    );

    for row in rows {
        builder.push_record(
            header
                .iter()
                .zip(row.iter())
                .map(|(name, cell)| (name.clone(), convert_cell(cell))),
        );
    }
    Ok(())
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(f) => f.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => "".to_string(),
    }
}

fn convert_cell(c: &Data) -> Value {
    match c {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) => Value::Float64(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) if s.trim().is_empty() => Value::Null,
        Data::String(s) => Value::Utf8(s.clone()),
        Data::DateTime(dt) => Value::Utf8(dt.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Utf8(s.clone()),
    }
}
