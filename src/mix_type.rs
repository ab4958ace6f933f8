//! Mix-type conflict resolution.
//!
//! Decides whether two mix/remix qualifiers can denote the same release.
//! A plain edit or "original mix" still matches the untagged release; a remix
//! never matches an untagged or neutral one.

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

use crate::normalize::MULTI_SPACE;

/// Qualifiers that do not denote a musically distinct version.
pub static NEUTRAL_MIX_TYPES: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "original mix",
        "extended mix",
        "club mix",
        "club mix edit",
        "radio edit",
        "radio mix",
        "edit",
        "version",
        "mix",
        "extended",
        "original",
        "extended club mix",
    ]
    .into_iter()
    .collect()
});

/// Words that mark a reworked version unless the qualifier is neutral.
const REMIX_MARKERS: &[&str] = &["edit", "mix", "version"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixCategory {
    /// No qualifier
    Empty,
    /// Listed in `NEUTRAL_MIX_TYPES`
    Neutral,
    /// Contains "remix", or edit/mix/version outside the neutral list
    Remix,
    /// Anything else
    Unknown,
}

impl MixCategory {
    /// Classify a qualifier (case and spacing insensitive).
    pub fn classify(mix_type: &str) -> Self {
        Self::classify_canonical(&canonical(mix_type))
    }

    fn classify_canonical(mix: &str) -> Self {
        if mix.is_empty() {
            MixCategory::Empty
        } else if NEUTRAL_MIX_TYPES.contains(mix) {
            MixCategory::Neutral
        } else if mix.contains("remix") || REMIX_MARKERS.iter().any(|m| mix.contains(m)) {
            MixCategory::Remix
        } else {
            MixCategory::Unknown
        }
    }
}

fn canonical(mix_type: &str) -> String {
    MULTI_SPACE.replace_all(mix_type, " ").trim().to_lowercase()
}

/// True when the two qualifiers denote different releases.
///
/// | a / b            | result                     |
/// |------------------|----------------------------|
/// | empty / empty    | no conflict                |
/// | neutral / neutral| no conflict                |
/// | neutral / empty  | no conflict                |
/// | remix / neutral or empty | conflict           |
/// | remix / remix    | no conflict                |
/// | anything else    | conflict unless identical  |
///
/// Two different remixes are not told apart here; the title
/// score still sees the remixer names.
pub fn conflicts(mix_a: &str, mix_b: &str) -> bool {
    use MixCategory::*;

    let a = canonical(mix_a);
    let b = canonical(mix_b);
    match (MixCategory::classify_canonical(&a), MixCategory::classify_canonical(&b)) {
        (Empty, Empty) | (Neutral, Neutral) | (Neutral, Empty) | (Empty, Neutral) => false,
        (Remix, Neutral | Empty) | (Neutral | Empty, Remix) => true,
        (Remix, Remix) => false,
        _ => a != b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(MixCategory::classify(""), MixCategory::Empty);
        assert_eq!(MixCategory::classify("  "), MixCategory::Empty);
        assert_eq!(MixCategory::classify("Original  Mix"), MixCategory::Neutral);
        assert_eq!(MixCategory::classify("radio edit"), MixCategory::Neutral);
        assert_eq!(MixCategory::classify("acme remix"), MixCategory::Remix);
        assert_eq!(MixCategory::classify("dub mix"), MixCategory::Remix);
        assert_eq!(MixCategory::classify("acme edit"), MixCategory::Remix);
        assert_eq!(MixCategory::classify("live"), MixCategory::Unknown);
    }

    #[test]
    fn test_neutral_never_conflicts() {
        assert!(!conflicts("original mix", ""));
        assert!(!conflicts("radio edit", "extended mix"));
        assert!(!conflicts("", ""));
        assert!(!conflicts("Club Mix Edit", "edit"));
    }

    #[test]
    fn test_remix_vs_blank_or_neutral_conflicts() {
        assert!(conflicts("acme remix", ""));
        assert!(conflicts("acme remix", "original mix"));
        assert!(conflicts("dub mix", "radio edit"));
    }

    #[test]
    fn test_remixes_are_compatible() {
        assert!(!conflicts("acme remix", "other remix"));
        assert!(!conflicts("acme remix", "acme dub mix"));
        assert!(!conflicts("acme edit", "acme remix"));
    }

    #[test]
    fn test_unknown_qualifiers() {
        assert!(!conflicts("live", "Live"));
        assert!(conflicts("live", "acoustic"));
        assert!(conflicts("live", ""));
        assert!(conflicts("live", "original mix"));
    }

    #[test]
    fn test_conflicts_symmetric() {
        let samples = [
            "",
            "original mix",
            "radio edit",
            "extended",
            "acme remix",
            "dub mix",
            "acme edit",
            "live",
            "acoustic",
            "Original Mix",
        ];
        for a in samples {
            for b in samples {
                assert_eq!(conflicts(a, b), conflicts(b, a), "{:?} vs {:?}", a, b);
            }
        }
    }
}
