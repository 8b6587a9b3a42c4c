#![cfg(feature = "excel_test_writer")]

use std::path::Path;

use mwdata::ingestion::excel::{read_excel_from_path, read_excel_workbook_from_path};
use mwdata::ingestion::{load, ExcelSheetSelection, LoadOptions};
use mwdata::types::{DataType, Value};
use rust_xlsxwriter::Workbook;

fn write_people_xlsx(path: &Path) {
    let mut wb = Workbook::new();

    // Sheet1: 2 rows, header starts after a blank row
    let ws1 = wb.add_worksheet();
    ws1.set_name("Sheet1").unwrap();
    ws1.write_string(1, 0, "id").unwrap();
    ws1.write_string(1, 1, "name").unwrap();
    ws1.write_string(1, 2, "active").unwrap();
    ws1.write_number(2, 0, 1).unwrap();
    ws1.write_string(2, 1, "Ada").unwrap();
    ws1.write_boolean(2, 2, true).unwrap();
    ws1.write_number(3, 0, 2).unwrap();
    ws1.write_string(3, 1, "Grace").unwrap();
    ws1.write_boolean(3, 2, false).unwrap();

    // Second: 1 row, different column set
    let ws2 = wb.add_worksheet();
    ws2.set_name("Second").unwrap();
    ws2.write_string(0, 0, "id").unwrap();
    ws2.write_string(0, 1, "score").unwrap();
    ws2.write_number(1, 0, 3).unwrap();
    ws2.write_number(1, 1, 87.25).unwrap();

    wb.save(path).unwrap();
}

#[test]
fn xlsx_reads_first_sheet_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.xlsx");
    write_people_xlsx(&path);

    let table = load(path.to_str().unwrap(), false, &LoadOptions::default()).unwrap();

    assert_eq!(table.column_names(), vec!["id", "name", "active"]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.rows[1][1], Value::Utf8("Grace".to_string()));
    assert_eq!(table.rows[0][2], Value::Bool(true));
    assert_eq!(table.schema.fields[0].data_type, DataType::Float64);
}

#[test]
fn xlsx_named_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.xlsx");
    write_people_xlsx(&path);

    let table = read_excel_from_path(&path, Some("Second")).unwrap();
    assert_eq!(table.column_names(), vec!["id", "score"]);
    assert_eq!(table.rows[0][1], Value::Float64(87.25));
}

#[test]
fn xlsx_all_sheets_union_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.xlsx");
    write_people_xlsx(&path);

    let opts = LoadOptions {
        excel_sheet_selection: ExcelSheetSelection::AllSheets,
        ..Default::default()
    };
    let table = load(path.to_str().unwrap(), false, &opts).unwrap();

    assert_eq!(table.column_names(), vec!["id", "name", "active", "score"]);
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.rows[2][1], Value::Null);
    assert_eq!(table.rows[2][3], Value::Float64(87.25));
}

#[test]
fn xlsx_missing_sheet_is_an_excel_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.xlsx");
    write_people_xlsx(&path);

    let err = read_excel_workbook_from_path(&path, Some(&["Nope"])).unwrap_err();
    assert!(err.to_string().contains("excel error"));
}

#[test]
fn xlsx_listed_sheets_are_read_in_the_given_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.xlsx");
    write_people_xlsx(&path);

    let opts = LoadOptions {
        excel_sheet_selection: ExcelSheetSelection::Sheets(vec!["Second".to_string(), "Sheet1".to_string()]),
        ..Default::default()
    };
    let table = load(path.to_str().unwrap(), false, &opts).unwrap();

    assert_eq!(table.column_names(), vec!["id", "score", "name", "active"]);
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.rows[0][1], Value::Float64(87.25));
    assert_eq!(table.rows[0][2], Value::Null);
    assert_eq!(table.rows[2][2], Value::Utf8("Grace".to_string()));
    assert_eq!(table.rows[2][1], Value::Null);
}

#[test]
fn xlsx_repeated_headers_keep_every_cell() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dupes.xlsx");
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, 0, "id").unwrap();
    ws.write_string(0, 1, "name").unwrap();
    ws.write_string(0, 2, "id").unwrap();
    ws.write_number(1, 0, 1).unwrap();
    ws.write_string(1, 1, "Ada").unwrap();
    ws.write_number(1, 2, 7).unwrap();
    wb.save(&path).unwrap();

    let table = read_excel_from_path(&path, None).unwrap();

    assert_eq!(table.column_names(), vec!["id", "name", "id.1"]);
    assert_eq!(table.rows[0][0], Value::Float64(1.0));
    assert_eq!(table.rows[0][2], Value::Float64(7.0));
}
