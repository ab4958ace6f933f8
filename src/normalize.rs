//! Normalization of artist/title fragments into comparison keys.
//!
//! Qualifiers that vary by platform without naming a different recording
//! (neutral mix tags, remaster years, country tags, featured-artist clauses)
//! are removed. Remix qualifiers are kept: a remix is a distinct release.
//!
//! CRITICAL: keys produced here are compared across both catalogs. Run tests
//! after changes.

use any_ascii::any_ascii;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Neutral/technical qualifier vocabulary, optionally year-prefixed:
/// "Original Mix", "12\" Version", "2019 Remaster", "(1999)".
const NEUTRAL_QUALIFIERS: &str = r#"(?:(?:19|20)\d{2}\s+)?(?:12["']?\s*version|original\s+(?:mix|version)|extended\s+club\s+mix|extended\s+(?:mix|rework)|club\s+mix|radio\s+edit|dub\s+mix|edit|version|rework|remaster(?:ed)?|mono|stereo|(?:19|20)\d{2})"#;

/// Matches bracket suffixes like [Clean], [1/3], [Explicit]
pub static BRACKET_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\[[^\]]+\]\s*$").unwrap());

/// Featured artists clause: "(feat. Artist)", "[ft. Someone]"
pub static FEAT_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*[\(\[](?:feat\.?|ft\.?|featuring)\s+[^\)\]]*[\)\]]").unwrap()
});

/// Neutral qualifier in parentheses at end: "(Original Mix)", "(2021 Remastered)"
pub static NEUTRAL_PAREN_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\s*\({}\)\s*$", NEUTRAL_QUALIFIERS)).unwrap()
});

/// Bare neutral qualifier after a dash at end: "Song - Radio Edit", "Song – 2011 Remaster."
/// Never reaches inside a parenthetical, so "(Acme Edit)" keeps its qualifier.
pub static NEUTRAL_BARE_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\s*[-\u{{2013}}\u{{2014}}]\s*{}\b[^\w)]*$", NEUTRAL_QUALIFIERS)).unwrap()
});

/// Country tags appended to artist names: "(UK)", "(ofc)", "(BE)"
pub static COUNTRY_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*\((?:ofc|be|uk|us|fr|it|ca|au|de)\)").unwrap()
});

/// Symbolic connectors between names: "&", "+"
pub static CONNECTOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*[&+]\s*").unwrap());

/// "Extended Remix" is still a remix
pub static EXTENDED_REMIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bextended\s+remix\b").unwrap());

/// Featuring tokens left over after clause removal: "A feat. B", "A ft B"
pub static FEAT_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:feat|ft|featuring)\b").unwrap());

/// Anything that is neither a word character nor whitespace
pub static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Regex to collapse runs of whitespace into a single space
pub static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Check if a character is a Unicode combining mark (diacritical mark).
pub fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0x20D0..=0x20FF | 0xFE20..=0xFE2F)
}

/// Transliterate to ASCII, keeping case.
/// e.g., "Beyoncé" → "Beyonce", "Motörhead" → "Motorhead"
pub fn transliterate(s: &str) -> String {
    // Strip diacritics via NFKD decomposition first so accented Latin letters
    // keep their base letter, then transliterate remaining scripts
    let stripped: String = s.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    any_ascii(&stripped)
}

/// Fold Unicode text to lowercase ASCII.
/// e.g., "Björk" → "bjork"
pub fn fold_to_ascii(s: &str) -> String {
    transliterate(s).to_lowercase()
}

/// Convert typographic quotes and dashes to their ASCII forms.
pub fn normalize_punctuation(s: &str) -> String {
    s.replace(['\u{2018}', '\u{2019}', '\u{00B4}', '\u{0060}'], "'")
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2013}', '\u{2014}'], "-")
}

/// Strip trailing neutral qualifiers until none is left.
/// "Song (Edit) (Original Mix)" → "Song"
fn strip_neutral_suffixes(text: &str) -> String {
    let mut result = text.to_string();
    loop {
        let stripped = NEUTRAL_PAREN_SUFFIX.replace(&result, "");
        let stripped = NEUTRAL_BARE_SUFFIX.replace(&stripped, "").to_string();
        if stripped == result {
            return result;
        }
        result = stripped;
    }
}

// ============================================================================
// NORMALIZATION FUNCTIONS
// ============================================================================

/// One pass of the key pipeline. Order matters.
fn normalize_pass(text: &str) -> String {
    let mut result = BRACKET_SUFFIX.replace(text, "").to_string();
    result = FEAT_CLAUSE.replace_all(&result, "").to_string();
    result = strip_neutral_suffixes(&result);
    result = COUNTRY_TAG.replace_all(&result, "").to_string();
    result = CONNECTOR.replace_all(&result, " and ").to_string();
    result = EXTENDED_REMIX.replace_all(&result, "remix").to_string();
    result = fold_to_ascii(&result);
    result = FEAT_TOKEN.replace_all(&result, "").to_string();
    result = NON_WORD.replace_all(&result, "").to_string();
    MULTI_SPACE.replace_all(&result, " ").trim().to_lowercase()
}

/// Normalize an artist, title, or "artist - title" fragment into a comparison key.
///
/// Total: never fails, empty input yields an empty key. The pass is repeated
/// until the key no longer changes, so every key is a fixed point: stripping
/// punctuation can expose a qualifier ("Song (Edit) (Original Mix)") that
/// only the next pass sees. Each pass over a key can only shorten it, so the
/// loop terminates.
pub fn normalize(text: &str) -> String {
    let mut key = normalize_pass(text);
    loop {
        let next = normalize_pass(&key);
        if next == key {
            return key;
        }
        key = next;
    }
}

/// Human-readable cleanup: ASCII quotes and dashes, transliterated letters,
/// single spaces. Casing and punctuation are preserved.
pub fn normalize_displayable(text: &str) -> String {
    let result = transliterate(&normalize_punctuation(text));
    MULTI_SPACE.replace_all(&result, " ").trim().to_string()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("Beyoncé & Jay-Z"), "beyonce and jayz");
        assert_eq!(normalize("  Daft   Punk + Friends "), "daft punk and friends");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_strips_bracket_feat_and_diacritics() {
        assert_eq!(normalize("Tïtle (feat. X) [Clean]"), "title");
    }

    #[test]
    fn test_normalize_neutral_qualifiers() {
        assert_eq!(normalize("Song (Original Mix)"), "song");
        assert_eq!(normalize("Song (Extended Club Mix)"), "song");
        assert_eq!(normalize("Song (2019 Remaster)"), "song");
        assert_eq!(normalize("Song (Remastered)"), "song");
        assert_eq!(normalize("Song (12\" Version)"), "song");
        assert_eq!(normalize("Song (1999)"), "song");
        assert_eq!(normalize("Song (Mono)"), "song");
        assert_eq!(normalize("Song - Radio Edit"), "song");
        assert_eq!(normalize("Song \u{2013} 2011 Remaster."), "song");
    }

    #[test]
    fn test_normalize_keeps_qualified_parentheticals() {
        assert_eq!(normalize("Song (Acme Edit)"), "song acme edit");
        assert_eq!(normalize("Song (Acme Dub Mix)"), "song acme dub mix");
        assert_eq!(normalize("Song (Live Version)"), "song live version");
        assert_eq!(normalize("Song - Acme Edit"), "song acme edit");
        // Bare words without a dash are part of the title
        assert_eq!(normalize("Song Extended Mix"), "song extended mix");
    }

    #[test]
    fn test_normalize_stacked_qualifiers() {
        assert_eq!(normalize("Song (Edit) (Original Mix)"), "song");
        assert_eq!(normalize("Song (Radio Edit) [Explicit]"), "song");
    }

    #[test]
    fn test_normalize_keeps_remix() {
        assert_eq!(normalize("Song (Acme Remix)"), "song acme remix");
        assert_eq!(normalize("Song (Acme Extended Remix)"), "song acme remix");
        assert_eq!(normalize("Song (Radio Edit) (Acme Remix)"), "song radio edit acme remix");
    }

    #[test]
    fn test_normalize_country_tags() {
        assert_eq!(normalize("Artist (UK) - Song"), "artist song");
        assert_eq!(normalize("Kabi (ofc)"), "kabi");
        // Not in the closed set
        assert_eq!(normalize("Kabi (AR)"), "kabi ar");
    }

    #[test]
    fn test_normalize_feat_tokens() {
        assert_eq!(normalize("A feat. B"), "a b");
        assert_eq!(normalize("A ft B"), "a b");
        assert_eq!(normalize("A Featuring B"), "a b");
        // Word boundary: "ft" inside a word survives
        assert_eq!(normalize("Left Behind"), "left behind");
    }

    #[test]
    fn test_normalize_idempotent() {
        let samples = [
            "Tïtle (feat. X) [Clean]",
            "DJ A, DJ B - Song (Original Mix)",
            "Song (Edit) (Original Mix)",
            "Artist - Track (Acme Extended Remix)",
            "Sigur Rós – Hoppípolla",
            "A & B + C feat. D - E (UK)",
            "Song - Edit.",
            "Song (Acme Edit)",
            "Song (Acme Dub Mix)",
            "Extended (Remix)",
            "f.t. Someone",
            "",
        ];
        for sample in samples {
            let key = normalize(sample);
            assert_eq!(normalize(&normalize_displayable(&key)), key, "sample: {}", sample);
            assert_eq!(normalize(&key), key, "sample: {}", sample);
        }
    }

    #[test]
    fn test_fold_to_ascii() {
        assert_eq!(fold_to_ascii("Björk"), "bjork");
        assert_eq!(fold_to_ascii("Motörhead"), "motorhead");
        assert_eq!(fold_to_ascii("Beyoncé"), "beyonce");
    }

    #[test]
    fn test_normalize_displayable() {
        assert_eq!(normalize_displayable("Beyoncé  \u{201C}Halo\u{201D}"), "Beyonce \"Halo\"");
        assert_eq!(normalize_displayable("Sigur Rós \u{2013} Hoppípolla"), "Sigur Ros - Hoppipolla");
        assert_eq!(normalize_displayable("Don\u{2019}t Stop "), "Don't Stop");
    }
}
