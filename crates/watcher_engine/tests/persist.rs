use std::fs;

use tempfile::TempDir;
use watcher_engine::{ensure_state_dir, AtomicFileWriter};

#[test]
fn creates_missing_state_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("state");
    assert!(!new_dir.exists());
    ensure_state_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("source.json", "hello").unwrap();
    assert_eq!(first.file_name().unwrap(), "source.json");
    assert_eq!(fs::read_to_string(&first).unwrap(), "hello");

    let second = writer.write("source.json", "world").unwrap();
    assert_eq!(first, second);
    assert_eq!(writer.read("source.json").unwrap().as_deref(), Some("world"));
}

#[test]
fn read_and_remove_tolerate_missing_files() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().join("never-created"));

    assert_eq!(writer.read("missing.json").unwrap(), None);
    assert!(!writer.remove("missing.json").unwrap());
    assert!(writer.list("json").unwrap().is_empty());
}

#[test]
fn list_filters_by_extension_and_skips_temp_files() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());
    writer.write("b.json", "{}").unwrap();
    writer.write("a.json", "{}").unwrap();
    writer.write("notes.txt", "x").unwrap();

    assert_eq!(writer.list("json").unwrap(), vec!["a.json", "b.json"]);
    assert!(writer.remove("a.json").unwrap());
    assert_eq!(writer.list("json").unwrap(), vec!["b.json"]);
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("source.json", "data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("source.json").exists());
}
