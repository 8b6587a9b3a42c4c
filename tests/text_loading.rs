use std::collections::HashSet;
use std::fs;
use std::path::Path;

use mwdata::ingestion::{load, read_by_extension, LoadOptions, TEXT_COLUMN};
use mwdata::types::{DataType, Value};
use mwdata::LoadError;

fn write(path: &Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn texts(table: &mwdata::types::Table) -> Vec<String> {
    table
        .column(TEXT_COLUMN)
        .unwrap()
        .into_iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

#[test]
fn unknown_extension_reads_one_row_per_line() {
    let table = read_by_extension("tests/fixtures/notes.dat", &LoadOptions::default()).unwrap();

    assert_eq!(table.column_names(), vec!["0"]);
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.rows[0][0], Value::Utf8("first line of notes".to_string()));
    // The column mixes text and numbers, so every line stays text.
    assert_eq!(table.schema.fields[0].data_type, DataType::Utf8);
    assert_eq!(table.rows[2][0], Value::Utf8("42".to_string()));
}

#[test]
fn unknown_extension_honours_a_custom_separator() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pairs.tsv");
    write(&path, b"a\t1\nb\t2\n");

    let opts = LoadOptions {
        sep: Some('\t'),
        ..Default::default()
    };
    let table = load(path.to_str().unwrap(), false, &opts).unwrap();
    assert_eq!(table.column_names(), vec!["0", "1"]);
    assert_eq!(table.rows[1], vec![Value::Utf8("b".to_string()), Value::Int64(2)]);
}

#[test]
fn directory_reads_top_level_txt_files_in_listing_order() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"alpha");
    write(&dir.path().join("b.txt"), b"bravo\nsecond line");
    write(&dir.path().join("c.csv"), b"x,y\n1,2\n");
    write(&dir.path().join("nested/d.txt"), b"delta");

    let table = load(dir.path().to_str().unwrap(), false, &LoadOptions::default()).unwrap();

    let listing_order: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .filter(|name| name.ends_with(".txt"))
        .map(|name| fs::read_to_string(dir.path().join(name)).unwrap())
        .collect();

    assert_eq!(table.column_names(), vec![TEXT_COLUMN]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(texts(&table), listing_order);
}

#[test]
fn directory_recursion_includes_nested_txt_files() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"alpha");
    write(&dir.path().join("nested/d.txt"), b"delta");
    write(&dir.path().join("nested/deeper/e.txt"), b"echo");
    write(&dir.path().join("nested/deeper/skip.md"), b"not text");

    let table = load(dir.path().to_str().unwrap(), true, &LoadOptions::default()).unwrap();

    let found: HashSet<String> = texts(&table).into_iter().collect();
    let expected: HashSet<String> = ["alpha", "delta", "echo"].iter().map(|s| s.to_string()).collect();
    assert_eq!(found, expected);
}

#[test]
fn directory_text_is_decoded_with_the_requested_encoding() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("latin.txt"), &[0x63, 0x61, 0x66, 0xE9]);

    let utf8_err = load(dir.path().to_str().unwrap(), false, &LoadOptions::default()).unwrap_err();
    assert!(matches!(utf8_err, LoadError::Decode { .. }));

    let opts = LoadOptions {
        encoding: Some("latin1".to_string()),
        ..Default::default()
    };
    let table = load(dir.path().to_str().unwrap(), false, &opts).unwrap();
    assert_eq!(texts(&table), vec!["café".to_string()]);
}

#[test]
fn empty_directory_yields_an_empty_table() {
    let dir = tempfile::tempdir().unwrap();
    let table = load(dir.path().to_str().unwrap(), true, &LoadOptions::default()).unwrap();
    assert_eq!(table.row_count(), 0);
    assert_eq!(table.column_names(), vec![TEXT_COLUMN]);
}

#[test]
fn missing_path_is_path_not_found() {
    let path = "tests/fixtures/definitely/not/here";
    let err = load(path, false, &LoadOptions::default()).unwrap_err();
    match err {
        LoadError::PathNotFound { path: p } => assert_eq!(p, path),
        other => panic!("unexpected error: {other}"),
    }
}
