//! Core types for the kotoba vocabulary trainer

use anyhow::{ensure, Result};
use serde::Deserialize;

/// A single vocabulary entry loaded from the static data file.
///
/// `kanji` is the display form and may embed the reading as "漢字 (かな)";
/// `hiragana` is the pure phonetic form used as the pronunciation target.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VocabularyEntry {
    pub id: u32,
    pub kanji: String,
    pub hiragana: String,
    pub romaji: String,
    pub meaning: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub level: String,
    /// Relative path to the pre-recorded pronunciation clip.
    #[serde(default)]
    pub audio: String,
}

impl VocabularyEntry {
    /// Validate a deserialized entry; `index` is its position in the file.
    pub fn validate(&self, index: usize) -> Result<()> {
        ensure!(
            !self.hiragana.trim().is_empty(),
            "vocabulary entry {} (id {}) has an empty hiragana reading",
            index,
            self.id
        );
        ensure!(
            !self.romaji.trim().is_empty(),
            "vocabulary entry {} (id {}) has an empty romaji transliteration",
            index,
            self.id
        );
        Ok(())
    }

    /// The combined card heading, e.g. "食べる (たべる)".
    pub fn display_form(&self) -> String {
        format!("{} ({})", self.kanji, self.hiragana)
    }

    /// Case-insensitive substring match used by the search filter.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.kanji.to_lowercase().contains(needle)
            || self.hiragana.to_lowercase().contains(needle)
            || self.romaji.to_lowercase().contains(needle)
            || self.meaning.to_lowercase().contains(needle)
    }
}
