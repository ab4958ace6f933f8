//! String similarity scoring for normalized keys.
//!
//! All metrics are case-insensitive, symmetric, bounded to [0, 1] and score
//! identical strings 1.0:
//! - `ratio`: longest-matching-blocks ratio (2·M / (|a| + |b|))
//! - `partial_ratio`: best `ratio` of the shorter string against equally long
//!   windows of the longer one
//! - normalized Levenshtein distance via `strsim`

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

// ============================================================================
// Metric Selection
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SimilarityMetric {
    /// Longest-matching-blocks ratio
    #[default]
    Ratio,
    /// Best-aligned substring window
    PartialRatio,
    /// Normalized edit distance
    Levenshtein,
}

impl SimilarityMetric {
    pub fn score(self, a: &str, b: &str) -> f64 {
        match self {
            SimilarityMetric::Ratio => ratio(a, b),
            SimilarityMetric::PartialRatio => partial_ratio(a, b),
            SimilarityMetric::Levenshtein => {
                strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase())
            }
        }
    }
}

/// Default similarity between two normalized keys.
pub fn score(a: &str, b: &str) -> f64 {
    SimilarityMetric::default().score(a, b)
}

// ============================================================================
// Matching Blocks
// ============================================================================

/// Longest common run inside a[alo..ahi] and b[blo..bhi] as (i, j, len).
/// Ties go to the earliest run.
fn longest_match(a: &[char], alo: usize, ahi: usize, b: &[char], blo: usize, bhi: usize) -> (usize, usize, usize) {
    let width = bhi - blo + 1;
    let mut best = (alo, blo, 0);
    let mut prev = vec![0usize; width];
    let mut cur = vec![0usize; width];

    for i in alo..ahi {
        for j in blo..bhi {
            let col = j - blo + 1;
            cur[col] = if a[i] == b[j] { prev[col - 1] + 1 } else { 0 };
            if cur[col] > best.2 {
                let k = cur[col];
                best = (i + 1 - k, j + 1 - k, k);
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    best
}

/// Total length of the matching blocks found by recursively taking the
/// longest common run and recursing on both sides of it.
fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        if alo >= ahi || blo >= bhi {
            continue;
        }
        let (i, j, k) = longest_match(a, alo, ahi, b, blo, bhi);
        if k == 0 {
            continue;
        }
        total += k;
        pending.push((alo, i, blo, j));
        pending.push((i + k, ahi, j + k, bhi));
    }
    total
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let len = a.len() + b.len();
    if len == 0 {
        return 1.0;
    }
    // Block selection depends on argument order; take the better alignment
    // so the score is symmetric.
    let matches = matching_characters(a, b).max(matching_characters(b, a));
    2.0 * matches as f64 / len as f64
}

fn lowercase_chars(s: &str) -> Vec<char> {
    s.to_lowercase().chars().collect()
}

// ============================================================================
// Public Metrics
// ============================================================================

/// Longest-matching-blocks similarity (0.0 to 1.0).
pub fn ratio(a: &str, b: &str) -> f64 {
    ratio_chars(&lowercase_chars(a), &lowercase_chars(b))
}

/// Best `ratio` of the shorter string against any window of the longer one
/// with the same length (0.0 to 1.0).
/// e.g., "song" vs "song acme" → 1.0
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a = lowercase_chars(a);
    let b = lowercase_chars(b);
    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };

    if short.is_empty() {
        return if long.is_empty() { 1.0 } else { 0.0 };
    }
    if short.len() == long.len() {
        return ratio_chars(short, long);
    }

    let mut best: f64 = 0.0;
    for window in long.windows(short.len()) {
        best = best.max(ratio_chars(short, window));
        if best >= 1.0 {
            break;
        }
    }
    best
}
