//! Tabular I/O: header normalisation, typed reads, atomic writes

use mood_common::table::{lenient, write_records};
use mood_common::{Error, RawTable};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Row {
    name: String,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    rank: Option<i64>,
}

const COLUMNS: &[&str] = &["name", "score", "rank"];

#[test]
fn test_write_then_read_typed_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("rows.csv");

    let rows = vec![
        Row { name: "a".into(), score: Some(0.25), rank: Some(1) },
        Row { name: "b".into(), score: None, rank: None },
    ];
    write_records(&path, COLUMNS, &rows).unwrap();

    let table = RawTable::from_path(&path).unwrap();
    assert_eq!(table.columns(), &["name", "score", "rank"]);
    assert_eq!(table.deserialize::<Row>().unwrap(), rows);
}

#[test]
fn test_write_leaves_no_temporary_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rows.csv");

    write_records(&path, COLUMNS, &[Row { name: "a".into(), score: None, rank: None }]).unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["rows.csv".to_string()]);
}

#[test]
fn test_empty_record_set_still_has_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rows.csv");

    write_records::<Row>(&path, COLUMNS, &[]).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.trim(), "name,score,rank");
}

#[test]
fn test_bad_numbers_coerce_to_missing() {
    let csv = " Name ,SCORE,Rank\nx,not-a-number,7.0\ny,,oops\n";
    let table = RawTable::from_reader(csv.as_bytes()).unwrap();

    let rows: Vec<Row> = table.deserialize().unwrap();
    assert_eq!(rows[0], Row { name: "x".into(), score: None, rank: Some(7) });
    assert_eq!(rows[1], Row { name: "y".into(), score: None, rank: None });
}

#[test]
fn test_missing_optional_column_defaults() {
    let table = RawTable::from_reader("name\nsolo\n".as_bytes()).unwrap();

    let rows: Vec<Row> = table.deserialize().unwrap();
    assert_eq!(rows, vec![Row { name: "solo".into(), score: None, rank: None }]);
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let err = RawTable::from_path(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}
