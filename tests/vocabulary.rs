use std::fs;
use std::path::Path;

use anyhow::Result;
use kotoba::vocabulary::VocabularyStore;
use tempfile::tempdir;

#[test]
fn loads_entries_from_json_file() -> Result<()> {
    let temp = tempdir()?;
    let path = temp.path().join("vocabulary.json");
    fs::write(
        &path,
        r#"[
            {"id": 1, "kanji": "食べる", "hiragana": "たべる", "romaji": "taberu",
             "meaning": "makan", "category": "verba", "level": "N5",
             "audio": "audio/taberu.mp3"},
            {"id": 2, "kanji": "水", "hiragana": "みず", "romaji": "mizu",
             "meaning": "air"}
        ]"#,
    )?;

    let store = VocabularyStore::load(&path)?;
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(1).unwrap().hiragana, "たべる");
    assert!(store.get(2).unwrap().audio.is_empty());
    Ok(())
}

#[test]
fn missing_file_reports_the_path() {
    let err = VocabularyStore::load(Path::new("/no/such/vocabulary.json")).unwrap_err();
    assert!(format!("{err:#}").contains("vocabulary.json"));
}

#[test]
fn malformed_json_is_rejected_with_context() -> Result<()> {
    let temp = tempdir()?;
    let path = temp.path().join("vocabulary.json");
    fs::write(&path, "{not json")?;
    let err = VocabularyStore::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("parse"));
    Ok(())
}

#[test]
fn entry_with_empty_reading_is_rejected() -> Result<()> {
    let temp = tempdir()?;
    let path = temp.path().join("vocabulary.json");
    fs::write(
        &path,
        r#"[{"id": 1, "kanji": "食べる", "hiragana": "", "romaji": "taberu", "meaning": "makan"}]"#,
    )?;
    assert!(VocabularyStore::load(&path).is_err());
    Ok(())
}

#[test]
fn bundled_data_file_is_valid() -> Result<()> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/vocabulary.json");
    let store = VocabularyStore::load(&path)?;
    assert!(!store.is_empty());
    for entry in store.entries() {
        assert!(
            entry.hiragana.chars().all(|ch| ('\u{3040}'..='\u{309F}').contains(&ch)),
            "entry {} reading should be pure hiragana",
            entry.id
        );
    }
    Ok(())
}
