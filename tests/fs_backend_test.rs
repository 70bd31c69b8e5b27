use flatnotes::error::NoteError;
use flatnotes::model::{Key, NoteMetadata};
use flatnotes::store::fs_backend::FsBackend;
use flatnotes::store::StorageBackend;
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().join("notes"));
    (dir, backend)
}

fn sorted(mut keys: Vec<Key>) -> Vec<String> {
    keys.sort();
    keys.into_iter().map(Key::into_string).collect()
}

#[test]
fn write_then_read_creates_the_directory() {
    let (_dir, backend) = setup();
    let key = Key::from("Study_Java_Intro");
    assert!(!backend.notes_dir().exists());

    backend.write(&key, "# Intro\n").unwrap();
    assert!(backend.notes_dir().join("Study_Java_Intro.md").is_file());
    assert_eq!(backend.read(&key).unwrap(), "# Intro\n");
    assert!(backend.exists(&key).unwrap());
}

#[test]
fn listing_ignores_sidecars_temp_files_and_directories() {
    let (_dir, backend) = setup();
    backend.write(&Key::from("A"), "").unwrap();
    backend.write(&Key::from("B_C"), "").unwrap();
    backend
        .write_metadata(&Key::from("A"), &NoteMetadata::default())
        .unwrap();

    let notes_dir = backend.notes_dir();
    fs::write(notes_dir.join(".flatnotes-leftover.tmp"), "x").unwrap();
    fs::write(notes_dir.join("readme.txt"), "x").unwrap();
    fs::create_dir(notes_dir.join("Sub.md")).unwrap();

    assert_eq!(sorted(backend.list_keys().unwrap()), vec!["A", "B_C"]);
    assert_eq!(sorted(backend.list_metadata_keys().unwrap()), vec!["A"]);
}

#[test]
fn missing_directory_lists_nothing() {
    let (_dir, backend) = setup();
    assert!(backend.list_keys().unwrap().is_empty());
    assert!(matches!(
        backend.read(&Key::from("Nope")),
        Err(NoteError::NotFound(_))
    ));
}

#[test]
fn rename_carries_the_sidecar() {
    let (_dir, backend) = setup();
    let old = Key::from("Java_Intro");
    let new = Key::from("JavaLang_Intro");
    backend.write(&old, "# Intro").unwrap();
    let meta = NoteMetadata {
        last_mood: Some("curious".to_string()),
        ..Default::default()
    };
    backend.write_metadata(&old, &meta).unwrap();

    backend.rename(&old, &new).unwrap();

    assert!(!backend.exists(&old).unwrap());
    assert_eq!(backend.read(&new).unwrap(), "# Intro");
    assert_eq!(backend.read_metadata(&new).unwrap(), Some(meta));
    assert_eq!(backend.read_metadata(&old).unwrap(), None);
}

#[test]
fn rename_refuses_to_overwrite_and_reports_missing_sources() {
    let (_dir, backend) = setup();
    backend.write(&Key::from("A"), "a").unwrap();
    backend.write(&Key::from("B"), "b").unwrap();

    assert!(matches!(
        backend.rename(&Key::from("A"), &Key::from("B")),
        Err(NoteError::NameConflict(_))
    ));
    assert_eq!(backend.read(&Key::from("B")).unwrap(), "b");

    assert!(matches!(
        backend.rename(&Key::from("Gone"), &Key::from("C")),
        Err(NoteError::NotFound(_))
    ));
}

#[test]
fn rename_into_missing_directory_is_an_io_error() {
    let (_dir, backend) = setup();
    backend.write(&Key::from("A"), "a").unwrap();

    let err = backend
        .rename(&Key::from("A"), &Key::from("missing/B"))
        .unwrap_err();
    assert!(matches!(err, NoteError::Io(_)), "{:?}", err);
    assert_eq!(backend.read(&Key::from("A")).unwrap(), "a");
}

#[test]
fn delete_removes_note_and_sidecar() {
    let (_dir, backend) = setup();
    let key = Key::from("A");
    backend.write(&key, "").unwrap();
    backend
        .write_metadata(&key, &NoteMetadata::default())
        .unwrap();

    backend.delete(&key).unwrap();
    assert!(backend.list_keys().unwrap().is_empty());
    assert!(backend.list_metadata_keys().unwrap().is_empty());
    assert!(matches!(backend.delete(&key), Err(NoteError::NotFound(_))));
}

#[test]
fn delete_succeeds_when_sidecar_cannot_be_removed() {
    let (_dir, backend) = setup();
    let key = Key::from("A");
    backend.write(&key, "").unwrap();
    fs::create_dir(backend.notes_dir().join("A.json")).unwrap();

    backend.delete(&key).unwrap();
    assert!(!backend.exists(&key).unwrap());
    assert!(backend.list_keys().unwrap().is_empty());
}

#[test]
fn notes_path_that_is_a_file_is_a_store_error() {
    let dir = TempDir::new().unwrap();
    let notes = dir.path().join("notes");
    fs::write(&notes, "not a directory").unwrap();
    let backend = FsBackend::new(notes);

    assert!(matches!(
        backend.write(&Key::from("A"), ""),
        Err(NoteError::Store(_))
    ));
}

#[test]
fn custom_extensions_are_normalized() {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().to_path_buf())
        .with_note_ext("txt")
        .with_meta_ext(".meta");
    backend.write(&Key::from("A"), "").unwrap();
    backend
        .write_metadata(&Key::from("A"), &NoteMetadata::default())
        .unwrap();

    assert!(dir.path().join("A.txt").is_file());
    assert!(dir.path().join("A.meta").is_file());
    assert_eq!(backend.note_path(&Key::from("A")), dir.path().join("A.txt"));
}
