//! Vocabulary repository: a flat list loaded once from a static JSON file.

use std::collections::HashSet;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{ensure, Context, Result};
use tracing::info;

use crate::types::VocabularyEntry;

pub struct VocabularyStore {
    entries: Vec<VocabularyEntry>,
}

impl VocabularyStore {
    /// Read and validate the vocabulary file. I/O and parse failures carry
    /// file context; the caller decides how to surface them.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read vocabulary file {:?}", path))?;
        let entries: Vec<VocabularyEntry> = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse vocabulary JSON in {:?}", path))?;
        let store = Self::from_entries(entries)?;
        info!(count = store.len(), path = ?path, "vocabulary loaded");
        Ok(store)
    }

    pub fn from_entries(entries: Vec<VocabularyEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for (index, entry) in entries.iter().enumerate() {
            entry.validate(index)?;
            ensure!(
                seen.insert(entry.id),
                "duplicate vocabulary id {} at entry {}",
                entry.id,
                index
            );
        }
        Ok(Self { entries })
    }

    /// All entries in file order.
    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&VocabularyEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Case-insensitive substring filter over kanji, hiragana, romaji, and
    /// meaning. A blank term returns everything, preserving file order.
    pub fn search(&self, term: &str) -> Vec<&VocabularyEntry> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.entries.iter().collect();
        }
        self.entries
            .iter()
            .filter(|entry| entry.matches(&needle))
            .collect()
    }

    /// Pick an entry for random practice mode. None when the store is empty.
    pub fn pick_random(&self) -> Option<&VocabularyEntry> {
        if self.entries.is_empty() {
            return None;
        }
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.subsec_nanos())
            .unwrap_or(0);
        self.entries.get(nanos as usize % self.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::VocabularyStore;
    use crate::types::VocabularyEntry;

    fn entry(id: u32, kanji: &str, hiragana: &str, romaji: &str, meaning: &str) -> VocabularyEntry {
        VocabularyEntry {
            id,
            kanji: kanji.to_string(),
            hiragana: hiragana.to_string(),
            romaji: romaji.to_string(),
            meaning: meaning.to_string(),
            category: String::new(),
            level: String::new(),
            audio: String::new(),
        }
    }

    fn sample_store() -> VocabularyStore {
        VocabularyStore::from_entries(vec![
            entry(1, "食べる", "たべる", "taberu", "makan"),
            entry(2, "飲む", "のむ", "nomu", "minum"),
            entry(3, "水", "みず", "mizu", "air"),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = VocabularyStore::from_entries(vec![
            entry(1, "食べる", "たべる", "taberu", "makan"),
            entry(1, "飲む", "のむ", "nomu", "minum"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn search_matches_each_text_field() {
        let store = sample_store();
        assert_eq!(store.search("taberu").len(), 1);
        assert_eq!(store.search("のむ").len(), 1);
        assert_eq!(store.search("水").len(), 1);
        assert_eq!(store.search("Minum").len(), 1);
        assert!(store.search("kuruma").is_empty());
    }

    #[test]
    fn blank_search_returns_everything_in_order() {
        let store = sample_store();
        let all = store.search("   ");
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, 1);
        assert_eq!(all[2].id, 3);
    }

    #[test]
    fn lookup_by_id() {
        let store = sample_store();
        assert_eq!(store.get(2).map(|e| e.romaji.as_str()), Some("nomu"));
        assert!(store.get(99).is_none());
    }

    #[test]
    fn random_pick_comes_from_the_store() {
        let store = sample_store();
        let picked = store.pick_random().unwrap();
        assert!(store.entries().iter().any(|e| e.id == picked.id));
    }

    #[test]
    fn random_pick_on_empty_store_is_none() {
        let store = VocabularyStore::from_entries(Vec::new()).unwrap();
        assert!(store.pick_random().is_none());
    }
}
