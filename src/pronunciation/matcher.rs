//! Transcript matching.
//!
//! Recognized speech arrives with incidental whitespace and, depending on the
//! engine, composed or decomposed character sequences. The spoken side is
//! therefore whitespace-stripped and NFKC-normalized before comparison. The
//! expected reading comes from the vocabulary data and is compared as-is;
//! the data file is treated as the canonical form.

use unicode_normalization::UnicodeNormalization;

/// Strip all whitespace from a transcript and apply NFKC normalization.
pub fn normalize_spoken(spoken: &str) -> String {
    spoken.chars().filter(|ch| !ch.is_whitespace()).nfkc().collect()
}

/// Exact equality between the normalized transcript and the expected
/// reading. No partial credit.
pub fn matches_reading(spoken: &str, expected: &str) -> bool {
    normalize_spoken(spoken) == expected
}

#[cfg(test)]
mod tests {
    use super::{matches_reading, normalize_spoken};

    #[test]
    fn exact_match_passes() {
        assert!(matches_reading("たべる", "たべる"));
    }

    #[test]
    fn whitespace_in_transcript_is_ignored() {
        assert!(matches_reading("た べる", "たべる"));
        assert!(matches_reading(" たべる\u{3000}", "たべる"));
        assert!(matches_reading("た\nべ\tる", "たべる"));
    }

    #[test]
    fn decomposed_dakuten_is_normalized() {
        // た + へ + combining voiced sound mark + る
        assert_eq!(normalize_spoken("たへ\u{3099}る"), "たべる");
        assert!(matches_reading("たへ\u{3099}る", "たべる"));
    }

    #[test]
    fn different_reading_fails() {
        assert!(!matches_reading("たべない", "たべる"));
    }

    #[test]
    fn longer_transcript_fails() {
        assert!(!matches_reading("たべるよ", "たべる"));
    }

    #[test]
    fn empty_transcript_only_matches_empty_target() {
        assert!(!matches_reading("", "たべる"));
        assert!(matches_reading("  ", ""));
    }
}
