//! Core data models for playlist reconciliation.
//!
//! This module contains the struct definitions shared by the parser, the
//! reconciliation engine and the CLI.

use serde::{Deserialize, Serialize};

// ============================================================================
// Track Models
// ============================================================================

/// A raw "Artist1, Artist2 - Title (Qualifier)" string split into its parts.
///
/// Derived on demand by `parse::parse_track`; never stored long-term.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParsedTrack {
    /// Artists in the order they were encountered, featured artists last.
    /// Empty when the input had no " - " separator.
    pub artists: Vec<String>,
    /// Remainder after the first " - ", featured-artist clause removed.
    pub title: String,
    /// Lowercase mix/remix qualifier, empty when absent.
    pub mix_type: String,
}

/// Structured track as delivered by a playlist API, before flattening.
#[derive(Clone, Debug, Deserialize)]
pub struct SourceTrack {
    pub artists: Vec<String>,
    pub title: String,
}

// ============================================================================
// Match Results
// ============================================================================

/// Outcome of a best-of-K selection for a single query.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchResult {
    pub query: String,
    /// Best-scoring candidate, if any candidate was scored.
    pub candidate: Option<String>,
    /// Position of `candidate` in the caller's list.
    pub candidate_index: Option<usize>,
    pub score: f64,
    pub accepted: bool,
}

impl MatchResult {
    /// Index of the winning candidate, only when it cleared the threshold.
    pub fn accepted_index(&self) -> Option<usize> {
        if self.accepted {
            self.candidate_index
        } else {
            None
        }
    }
}

/// Partition of two catalogs after greedy one-to-one reconciliation.
#[derive(Clone, Debug, Default)]
pub struct CatalogReconciliation {
    /// (source entry, target entry) pairs, in source order.
    pub matched: Vec<(String, String)>,
    /// Source entries with no acceptable target.
    pub missing: Vec<String>,
    /// Target entries never claimed, in target order.
    pub unmatched: Vec<String>,
    pub stats: ReconcileStats,
}

impl CatalogReconciliation {
    /// Source side of every matched pair.
    pub fn matched_sources(&self) -> Vec<String> {
        self.matched.iter().map(|(source, _)| source.clone()).collect()
    }
}

// ============================================================================
// Statistics (Instrumentation)
// ============================================================================

/// Counters collected during one catalog reconciliation run.
#[derive(Default, Debug, Clone, PartialEq, Serialize)]
pub struct ReconcileStats {
    pub sources: usize,
    pub targets: usize,
    pub matched: usize,
    pub missing: usize,
    pub unmatched: usize,

    // Per (source, target) pair rejections
    pub mix_type_conflicts: usize,
    pub artist_rejections: usize,
    pub title_rejections: usize,

    pub elapsed_seconds: f64,
}

impl ReconcileStats {
    /// Percentage of source entries that found a target.
    pub fn match_rate(&self) -> f64 {
        if self.sources == 0 {
            0.0
        } else {
            100.0 * self.matched as f64 / self.sources as f64
        }
    }

    /// Log stats in JSON format
    pub fn log_phase(&self, phase: &str) {
        if let Ok(json) = serde_json::to_string_pretty(self) {
            log::info!("[STATS:{}]\n{}", phase, json);
        }
    }

    /// Write stats to a JSON file
    pub fn write_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_index_requires_acceptance() {
        let mut result = MatchResult {
            query: "A - Song".to_string(),
            candidate: Some("A - Song".to_string()),
            candidate_index: Some(2),
            score: 0.5,
            accepted: false,
        };
        assert_eq!(result.accepted_index(), None);
        result.accepted = true;
        assert_eq!(result.accepted_index(), Some(2));
    }

    #[test]
    fn test_match_rate() {
        let stats = ReconcileStats {
            sources: 4,
            matched: 3,
            ..Default::default()
        };
        assert_eq!(stats.match_rate(), 75.0);
        assert_eq!(ReconcileStats::default().match_rate(), 0.0);
    }

    #[test]
    fn test_stats_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        let stats = ReconcileStats {
            sources: 2,
            matched: 1,
            missing: 1,
            ..Default::default()
        };
        stats.write_to_file(&path).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["matched"], 1);
        assert_eq!(json["missing"], 1);
    }

    #[test]
    fn test_source_track_deserialize() {
        let track: SourceTrack =
            serde_json::from_str(r#"{"artists": ["A", "B"], "title": "Song"}"#).unwrap();
        assert_eq!(track.artists, vec!["A", "B"]);
        assert_eq!(track.title, "Song");
    }
}
