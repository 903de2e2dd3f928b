use std::fs;
use std::path::Path;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use normdoc_core::Card;
use normdoc_engine::{
    ensure_output_dir, Archiver, AtomicFileWriter, JsonRecordWriter, ManifestArchiver,
    ProgressBoard, RecordSink,
};

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_and_creates_subdirs() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write(Path::new("run-1/doc.json"), b"hello").unwrap();
    assert_eq!(fs::read(&first).unwrap(), b"hello");

    let second = writer.write(Path::new("run-1/doc.json"), b"world").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"world");
}

#[test]
fn record_writer_emits_one_json_per_card() {
    let temp = TempDir::new().unwrap();
    let sink = JsonRecordWriter::new(temp.path().to_path_buf());

    let card = Card {
        title: "Приказ № 123 от 02.12.2020".to_string(),
        link: "https://docs.test/docs/123".to_string(),
        category: "Приказ".to_string(),
        identifier: "123".to_string(),
        effective_date: "02.12.2020".to_string(),
        filename: "prikaz-123.pdf".to_string(),
        extension: ".pdf".to_string(),
        attachment_content: Some("UERGREFUQQ==".to_string()),
        attachment_size: 7,
        ..Card::default()
    };

    sink.emit("run-1", "card-00000", &card).unwrap();

    let raw = fs::read_to_string(temp.path().join("run-1/card-00000.json")).unwrap();
    let record: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(record["title"], "Приказ № 123 от 02.12.2020");
    assert_eq!(record["number"], "123");
    assert_eq!(record["date"], "02.12.2020");
    assert_eq!(record["attachment"]["filename"], "prikaz-123.pdf");
    assert_eq!(record["attachment"]["extension"], ".pdf");
    assert_eq!(record["attachment"]["size"], 7);
    assert_eq!(record["attachment"]["content"], "UERGREFUQQ==");
}

#[test]
fn record_without_attachment_has_no_attachment_block() {
    let temp = TempDir::new().unwrap();
    let sink = JsonRecordWriter::new(temp.path().to_path_buf());

    let card = Card {
        title: "Постановление № 5".to_string(),
        ..Card::default()
    };
    sink.emit("run-1", "card-00001", &card).unwrap();

    let raw = fs::read_to_string(temp.path().join("run-1/card-00001.json")).unwrap();
    let record: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(record.get("attachment").is_none());
}

#[test]
fn manifest_archiver_snapshots_run_counters() {
    let temp = TempDir::new().unwrap();
    let board = Arc::new(ProgressBoard::new());
    board.add("run-1", normdoc_engine::metrics::CARDS_SAVED, 9);
    board.bump("run-1", normdoc_engine::metrics::PAGES_LOADED);

    let archiver = ManifestArchiver::new(temp.path().to_path_buf(), board);
    archiver.finalize("run-1").unwrap();

    let raw = fs::read_to_string(temp.path().join("run-1/manifest.json")).unwrap();
    let manifest: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(manifest["run"], "run-1");
    assert_eq!(manifest["counters"]["cards_saved"], 9);
    assert_eq!(manifest["counters"]["pages_loaded"], 1);
    assert!(manifest["finished_utc"].is_string());
}

#[test]
fn zero_amount_does_not_materialize_a_counter() {
    let board = ProgressBoard::new();
    board.add("run-1", normdoc_engine::metrics::CARD_ERRORS, 0);
    assert!(board.snapshot("run-1").is_empty());

    board.add("run-1", normdoc_engine::metrics::CARDS_SAVED, 2);
    board.add("run-1", normdoc_engine::metrics::PAGE_ERRORS, 0);
    let snapshot = board.snapshot("run-1");
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.get("cards_saved"), Some(&2));
}

#[test]
fn progress_board_isolates_runs() {
    let board = ProgressBoard::new();
    board.add("run-1", normdoc_engine::metrics::CARDS_SAVED, 3);
    board.add("run-2", normdoc_engine::metrics::CARDS_SAVED, 7);

    assert_eq!(board.get("run-1", "cards_saved"), 3);
    assert_eq!(board.get("run-2", "cards_saved"), 7);

    board.clear_run("run-1");
    assert_eq!(board.get("run-1", "cards_saved"), 0);
    assert_eq!(board.get("run-2", "cards_saved"), 7);
}
