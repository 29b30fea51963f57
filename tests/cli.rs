use std::fs;
use std::path::Path;

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

fn assets_with(entries: &str) -> Result<TempDir> {
    let temp = tempdir()?;
    fs::create_dir_all(temp.path().join("data"))?;
    fs::write(temp.path().join("data/vocabulary.json"), entries)?;
    Ok(temp)
}

const SAMPLE: &str = r#"[
    {"id": 1, "kanji": "食べる", "hiragana": "たべる", "romaji": "taberu",
     "meaning": "makan", "category": "verba", "level": "N5",
     "audio": "audio/taberu.mp3"},
    {"id": 2, "kanji": "水", "hiragana": "みず", "romaji": "mizu",
     "meaning": "air", "category": "nomina", "level": "N5",
     "audio": "audio/mizu.mp3"}
]"#;

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("kotoba")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("search"))
                .and(predicate::str::contains("practice")),
        );
}

#[test]
fn list_prints_cards() -> Result<()> {
    let assets = assets_with(SAMPLE)?;
    Command::cargo_bin("kotoba")?
        .args(["list", "--assets-path"])
        .arg(assets.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("食べる (たべる)")
                .and(predicate::str::contains("taberu"))
                .and(predicate::str::contains("2 entries.")),
        );
    Ok(())
}

#[test]
fn search_filters_by_meaning() -> Result<()> {
    let assets = assets_with(SAMPLE)?;
    Command::cargo_bin("kotoba")?
        .args(["search", "air", "--assets-path"])
        .arg(assets.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("水 (みず)").and(predicate::str::contains("食べる").not()),
        );
    Ok(())
}

#[test]
fn search_without_match_prints_empty_state() -> Result<()> {
    let assets = assets_with(SAMPLE)?;
    Command::cargo_bin("kotoba")?
        .args(["search", "kuruma", "--assets-path"])
        .arg(assets.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No vocabulary entries match"));
    Ok(())
}

#[test]
fn broken_data_file_reports_and_continues() -> Result<()> {
    let assets = assets_with("{broken")?;
    Command::cargo_bin("kotoba")?
        .args(["list", "--assets-path"])
        .arg(assets.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Could not load vocabulary data")
                .and(predicate::str::contains("No vocabulary entries found.")),
        );
    Ok(())
}

#[test]
fn practice_without_speech_engine_reports_unsupported() -> Result<()> {
    let assets = assets_with(SAMPLE)?;
    // Point the recognizer at a model file that cannot exist so the
    // capability probe fails deterministically.
    Command::cargo_bin("kotoba")?
        .args(["practice", "--id", "1", "--model-path"])
        .arg(Path::new("/no/such/model.bin"))
        .arg("--assets-path")
        .arg(assets.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("食べる (たべる)")
                .and(predicate::str::contains("Speech recognition is not available")),
        );
    Ok(())
}

#[test]
fn practice_with_unknown_id_fails() -> Result<()> {
    let assets = assets_with(SAMPLE)?;
    Command::cargo_bin("kotoba")?
        .args(["practice", "--id", "99", "--model-path"])
        .arg(Path::new("/no/such/model.bin"))
        .arg("--assets-path")
        .arg(assets.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no vocabulary entry with id 99"));
    Ok(())
}
