//! Parsing of "Artist1, Artist2 - Title (Qualifier)" track strings.
//!
//! The " - " separator is the only structural anchor. Everything else is
//! recovered heuristically: artist lists from commas and prose conjunctions,
//! featured artists from a "(feat. X)" clause, the mix qualifier from a
//! trailing parenthetical or dash clause.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::models::ParsedTrack;
use crate::normalize::{normalize, BRACKET_SUFFIX, MULTI_SPACE};

/// Separator between the artist segment and the title.
pub const TRACK_SEPARATOR: &str = " - ";

/// Suffixes wrapped in parentheses when formatting local file names.
/// Checked in order, first match wins.
pub const LOCAL_MIX_SUFFIXES: &[&str] = &[
    "Remix",
    "Extended Mix",
    "Original Mix",
    "Club Mix",
    "Radio Edit",
    "Edit",
    "Dub Mix",
    "Version",
];

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Multi-artist separator: commas, "&", "and", "ft", "feat", "featuring"
pub static ARTIST_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*,\s*|\s+(?:&|and|ft\.?|feat\.?|featuring)\s+").unwrap()
});

/// Featured artists in brackets: "(feat. B)", "[ft. B & C]"
static FEAT_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*[\(\[](?:feat\.?|ft\.?|featuring)\s+([^\)\]]+)[\)\]]").unwrap()
});

/// Featured artists trailing without brackets: "Song feat. B"
static FEAT_TRAILING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s+(?:feat\.?|ft\.?|featuring)\s+([^()\[\]]+)$").unwrap()
});

/// Remix/mix/edit/version vocabulary
pub static MIX_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)remix|mix|edit|version").unwrap());

/// Phrase ending in a mix word: "Acme Remix", "Radio Edit"
static MIX_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:remix|mix|edit|version)\s*$").unwrap());

/// Any parenthetical, capturing its contents
static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\(([^()]*)\)").unwrap());

/// Neutral tags dropped by playlist flattening
static SOURCE_NEUTRAL_PAREN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\((?:Original Mix|Extended Mix)\)").unwrap());

/// Remix clause naming the remixers: "(Kabi (AR) Remix)", "(A & B Remix Edit)"
static REMIX_CLAUSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\((.+? Remix.*?)\)").unwrap());

static REMIX_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s+remix\b").unwrap());

static PARENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[()]").unwrap());

static FILENAME_PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[_.]").unwrap());

static HAS_PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(.*\)").unwrap());

// ============================================================================
// ARTIST LISTS
// ============================================================================

/// Split an artist segment into names.
/// e.g., "A, B & C feat. D" → ["A", "B", "C", "D"]
pub fn split_artists(segment: &str) -> Vec<String> {
    ARTIST_SEPARATOR
        .split(segment)
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a comma-joined artist segment, keeping prose conjunctions intact.
/// e.g., "Above & Beyond, Someone" → ["Above & Beyond", "Someone"]
pub fn split_comma_list(segment: &str) -> Vec<String> {
    segment
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

/// Append names not already present (case-insensitive).
fn merge_artists(artists: &mut Vec<String>, extra: Vec<String>) {
    for name in extra {
        let lower = name.to_lowercase();
        if !artists.iter().any(|a| a.to_lowercase() == lower) {
            artists.push(name);
        }
    }
}

/// Remove a featured-artist clause from a title, returning the cleaned title
/// and the featured names.
fn extract_featured(title: &str) -> (String, Vec<String>) {
    let caps = FEAT_CLAUSE
        .captures(title)
        .or_else(|| FEAT_TRAILING.captures(title));
    match caps {
        Some(caps) => {
            let whole = caps.get(0).map_or(0..0, |m| m.range());
            let featured = split_artists(&caps[1]);
            let stripped = format!("{}{}", &title[..whole.start], &title[whole.end..]);
            (MULTI_SPACE.replace_all(&stripped, " ").trim().to_string(), featured)
        }
        None => (title.to_string(), Vec::new()),
    }
}

// ============================================================================
// MIX TYPE
// ============================================================================

/// Extract the lowercase mix/remix qualifier of a title, or "" if none.
///
/// A trailing parenthetical mentioning remix/mix/edit/version wins; otherwise
/// a trailing " - phrase" ending in one of those words. A trailing "[...]" tag
/// is ignored.
pub fn extract_mix_type(title: &str) -> String {
    let title = BRACKET_SUFFIX.replace(title, "");

    if let Some(inner) = trailing_parenthetical(&title) {
        if MIX_WORD.is_match(inner) {
            return canonical_qualifier(inner);
        }
    }

    match title.rsplit_once(TRACK_SEPARATOR) {
        Some((_, phrase)) if MIX_SUFFIX.is_match(phrase) => canonical_qualifier(phrase),
        _ => String::new(),
    }
}

/// Contents of the outermost balanced parenthetical ending `s`.
/// e.g., "Song (Kabi (AR) Remix)" → "Kabi (AR) Remix"
fn trailing_parenthetical(s: &str) -> Option<&str> {
    let s = s.trim_end();
    if !s.ends_with(')') {
        return None;
    }

    let mut depth = 0usize;
    for (i, c) in s.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&s[i + 1..s.len() - 1]);
                }
            }
            _ => {}
        }
    }
    None
}

fn canonical_qualifier(s: &str) -> String {
    MULTI_SPACE.replace_all(s, " ").trim().to_lowercase()
}

// ============================================================================
// PARSING
// ============================================================================

/// Parse a raw track string. Pure: the same input always yields the same parts.
///
/// Without a " - " separator the whole string is the title and `artists` is
/// empty.
pub fn parse_track(raw: &str) -> ParsedTrack {
    let raw = raw.trim();
    let Some((artist_part, title_part)) = raw.split_once(TRACK_SEPARATOR) else {
        return ParsedTrack {
            artists: Vec::new(),
            title: raw.to_string(),
            mix_type: extract_mix_type(raw),
        };
    };

    let mut artists = split_artists(artist_part);
    let (title, featured) = extract_featured(title_part.trim());
    merge_artists(&mut artists, featured);
    let mix_type = extract_mix_type(&title);

    ParsedTrack {
        artists,
        title,
        mix_type,
    }
}

/// Remove decorative subtitles: parentheticals and trailing " - " clauses
/// that do not mention remix/mix/edit/version.
/// e.g., "Song (Live at Wembley) (Acme Remix)" → "Song (Acme Remix)"
pub fn strip_nonmix_subtitles(title: &str) -> String {
    let mut result = PARENTHETICAL
        .replace_all(title, |caps: &Captures| {
            if MIX_WORD.is_match(&caps[1]) {
                caps[0].to_string()
            } else {
                String::new()
            }
        })
        .to_string();

    while let Some((head, tail)) = result.rsplit_once(TRACK_SEPARATOR) {
        if MIX_WORD.is_match(tail) {
            break;
        }
        result = head.to_string();
    }

    MULTI_SPACE.replace_all(&result, " ").trim().to_string()
}

// ============================================================================
// FLATTENING
// ============================================================================

/// Flatten structured playlist fields into "A, B - Title (Qualifier)".
///
/// Drops "(Original Mix)"/"(Extended Mix)", turns a dash subtitle into a
/// parenthetical, and removes credited artists who are only the remixers
/// named in a "(X Remix)" clause.
pub fn format_source_track(artists: &[String], title: &str) -> String {
    let mut title_clean = SOURCE_NEUTRAL_PAREN.replace_all(title, "").trim().to_string();

    if !title_clean.contains('(') {
        if let Some((head, tail)) = title_clean.split_once(TRACK_SEPARATOR) {
            title_clean = format!("{} ({})", head.trim(), tail.trim());
        }
    }

    let remixers: Vec<String> = REMIX_CLAUSE
        .captures(&title_clean)
        .map(|caps| {
            REMIX_WORD
                .replace_all(&caps[1], "")
                .split('&')
                .map(|name| normalize(&PARENS.replace_all(name.trim(), "")))
                .filter(|name| !name.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let credited: Vec<&str> = artists
        .iter()
        .map(String::as_str)
        .filter(|a| !remixers.contains(&normalize(&PARENS.replace_all(a, ""))))
        .collect();

    let title_clean = MULTI_SPACE.replace_all(&title_clean, " ");
    format!("{}{}{}", credited.join(", "), TRACK_SEPARATOR, title_clean.trim())
}

/// Replace underscores and dots with spaces.
/// e.g., "DJ_A - Song.Extended_Mix" → "DJ A - Song Extended Mix"
pub fn clean_filename(name: &str) -> String {
    FILENAME_PUNCTUATION.replace_all(name, " ").trim().to_string()
}

/// Format a local file stem for display: when the title carries no
/// parenthetical, wrap a known mix suffix in parentheses.
/// e.g., "DJ_A - Song_Radio_Edit" → "DJ A - Song (Radio Edit)"
pub fn format_local_track_name(raw_name: &str) -> String {
    let name = clean_filename(raw_name);
    let Some((artists, title)) = name.split_once(TRACK_SEPARATOR) else {
        return name;
    };
    let artists = artists.trim();
    let mut title = title.trim().to_string();

    if !HAS_PARENTHETICAL.is_match(&title) {
        for suffix in LOCAL_MIX_SUFFIXES {
            let Some(cut) = title.len().checked_sub(suffix.len()) else {
                continue;
            };
            if title.is_char_boundary(cut) && title[cut..].eq_ignore_ascii_case(suffix) {
                title = format!("{}({})", &title[..cut], suffix);
                break;
            }
        }
    }

    format!("{}{}{}", artists, TRACK_SEPARATOR, title)
}

// ============================================================================
// TESTS
// ============================================================================
