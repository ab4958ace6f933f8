//! Reconciliation engine.
//!
//! Two modes share the same primitives:
//! - `select_best`: best-of-K selection of one query against a short,
//!   relevance-ordered candidate list
//! - `reconcile_catalogs`: greedy first-fit one-to-one matching of a source
//!   catalog against a target catalog

use std::time::Instant;

use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::MatchConfig;
use crate::mix_type::{conflicts, MixCategory};
use crate::models::{CatalogReconciliation, MatchResult, ReconcileStats};
use crate::normalize::normalize;
use crate::parse::{parse_track, split_comma_list, strip_nonmix_subtitles, TRACK_SEPARATOR};
use crate::permute::expand_artists;

// ============================================================================
// Prepared Tracks
// ============================================================================

/// Comparison keys for one catalog entry, computed once per run.
struct PreparedTrack<'a> {
    raw: &'a str,
    mix_type: String,
    /// Normalized key of every artist ordering (deduplicated).
    artist_keys: Vec<String>,
    /// Normalized title with decorative subtitles removed.
    title_key: String,
}

impl<'a> PreparedTrack<'a> {
    fn new(raw: &'a str) -> Self {
        let parsed = parse_track(raw);
        let mut seen = FxHashSet::default();
        let artist_keys = expand_artists(&parsed.artists)
            .iter()
            .map(|ordering| normalize(ordering))
            .filter(|key| seen.insert(key.clone()))
            .collect();

        Self {
            raw,
            title_key: normalize(&strip_nonmix_subtitles(&parsed.title)),
            mix_type: parsed.mix_type,
            artist_keys,
        }
    }

    /// Best score over every pairing of artist orderings.
    fn artist_score(&self, other: &PreparedTrack, config: &MatchConfig) -> f64 {
        let mut best: f64 = 0.0;
        for a in &self.artist_keys {
            for b in &other.artist_keys {
                best = best.max(config.metric.score(a, b));
                if best >= 1.0 {
                    return best;
                }
            }
        }
        best
    }

    fn title_score(&self, other: &PreparedTrack, config: &MatchConfig) -> f64 {
        config.metric.score(&self.title_key, &other.title_key)
    }
}

// ============================================================================
// Mode A: Best-of-K Selection
// ============================================================================

/// Normalized "artists - title" keys for every comma-separated artist
/// ordering of `query`. A query without " - " yields a single key.
/// e.g., "A, B - Song" → ["a b song", "b a song"]
pub fn query_variants(query: &str) -> Vec<String> {
    let Some((artist_part, title)) = query.split_once(TRACK_SEPARATOR) else {
        return vec![normalize(query)];
    };

    let mut seen = FxHashSet::default();
    expand_artists(&split_comma_list(artist_part))
        .into_iter()
        .map(|ordering| normalize(&format!("{}{}{}", ordering, TRACK_SEPARATOR, title)))
        .filter(|key| seen.insert(key.clone()))
        .collect()
}

/// Pick the best of the first `config.candidate_window` candidates.
///
/// Each candidate scores the maximum over all query variants. A candidate
/// only becomes the best with a strictly higher score than the current one,
/// starting from 0.0: ties go to the earlier candidate, and a candidate
/// scoring 0.0 is never picked. Callers must pre-order candidates by their
/// own relevance signal.
pub fn select_best<S: AsRef<str>>(query: &str, candidates: &[S], config: &MatchConfig) -> MatchResult {
    let variants = query_variants(query);
    let mut best: Option<(usize, f64)> = None;
    let mut best_score = 0.0;

    for (index, candidate) in candidates.iter().take(config.candidate_window).enumerate() {
        let key = normalize(candidate.as_ref());
        let score = variants
            .iter()
            .map(|variant| config.metric.score(variant, &key))
            .fold(0.0, f64::max);
        debug!("  [{}] {:.3} {}", index, score, candidate.as_ref());

        if score > best_score {
            best_score = score;
            best = Some((index, score));
        }
    }

    let (candidate_index, score) = match best {
        Some((index, score)) => (Some(index), score),
        None => (None, 0.0),
    };
    let accepted = candidate_index.is_some() && score >= config.threshold;

    MatchResult {
        query: query.to_string(),
        candidate: candidate_index.map(|i| candidates[i].as_ref().to_string()),
        candidate_index,
        score,
        accepted,
    }
}

/// Run `select_best` for every query against its own candidate list.
///
/// Queries without an entry in `candidates` get an empty list and are not
/// accepted. Results keep the order of `queries`.
pub fn select_all<Q, F>(
    queries: &[Q],
    candidates: &FxHashMap<String, Vec<String>>,
    config: &MatchConfig,
    mut on_query: F,
) -> Vec<MatchResult>
where
    Q: AsRef<str>,
    F: FnMut(&MatchResult),
{
    let no_candidates: Vec<String> = Vec::new();
    queries
        .iter()
        .map(|query| {
            let query = query.as_ref();
            let list = candidates.get(query).unwrap_or_else(|| {
                debug!("No candidates for {:?}", query);
                &no_candidates
            });
            let result = select_best(query, list, config);
            on_query(&result);
            result
        })
        .collect()
}

// ============================================================================
// Mode B: Greedy Catalog Reconciliation
// ============================================================================

/// Target positions already taken by an earlier source entry.
/// Lives for exactly one reconciliation run.
#[derive(Default)]
struct ClaimedTargets(FxHashSet<usize>);

impl ClaimedTargets {
    fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    fn claim(&mut self, index: usize) {
        self.0.insert(index);
    }
}

/// Match every source entry to at most one target entry.
pub fn reconcile_catalogs<S: AsRef<str>, T: AsRef<str>>(
    sources: &[S],
    targets: &[T],
    config: &MatchConfig,
) -> CatalogReconciliation {
    reconcile_catalogs_with_progress(sources, targets, config, || {})
}

/// `reconcile_catalogs`, calling `on_source` after each source entry.
///
/// Sources are processed in order. Each scans the targets in order, skipping
/// claimed ones and mix-type conflicts, and takes the first target whose
/// artist score and title score both reach the threshold. First fit, not
/// best fit: a later, higher-scoring target is never considered.
pub fn reconcile_catalogs_with_progress<S, T, F>(
    sources: &[S],
    targets: &[T],
    config: &MatchConfig,
    mut on_source: F,
) -> CatalogReconciliation
where
    S: AsRef<str>,
    T: AsRef<str>,
    F: FnMut(),
{
    let start = Instant::now();
    let mut stats = ReconcileStats {
        sources: sources.len(),
        targets: targets.len(),
        ..Default::default()
    };

    let prepared_targets: Vec<PreparedTrack> =
        targets.iter().map(|t| PreparedTrack::new(t.as_ref())).collect();
    let mut claimed = ClaimedTargets::default();
    let mut matched = Vec::new();
    let mut missing = Vec::new();

    for source in sources {
        let source = PreparedTrack::new(source.as_ref());
        let mut found = None;

        for (index, target) in prepared_targets.iter().enumerate() {
            if claimed.contains(index) {
                continue;
            }
            if conflicts(&source.mix_type, &target.mix_type) {
                debug!(
                    "  skip {:?}: mix {:?} ({:?}) vs {:?} ({:?})",
                    target.raw,
                    source.mix_type,
                    MixCategory::classify(&source.mix_type),
                    target.mix_type,
                    MixCategory::classify(&target.mix_type)
                );
                stats.mix_type_conflicts += 1;
                continue;
            }
            let artist_score = source.artist_score(target, config);
            if artist_score < config.threshold {
                debug!("  skip {:?}: artist {:.3}", target.raw, artist_score);
                stats.artist_rejections += 1;
                continue;
            }
            let title_score = source.title_score(target, config);
            if title_score < config.threshold {
                debug!("  skip {:?}: title {:.3}", target.raw, title_score);
                stats.title_rejections += 1;
                continue;
            }
            debug!(
                "Matched {:?} -> {:?} (artist {:.3}, title {:.3})",
                source.raw, target.raw, artist_score, title_score
            );
            found = Some(index);
            break;
        }

        match found {
            Some(index) => {
                claimed.claim(index);
                matched.push((source.raw.to_string(), prepared_targets[index].raw.to_string()));
            }
            None => {
                debug!("No match for {:?}", source.raw);
                missing.push(source.raw.to_string());
            }
        }
        on_source();
    }

    let unmatched: Vec<String> = prepared_targets
        .iter()
        .enumerate()
        .filter(|(index, _)| !claimed.contains(*index))
        .map(|(_, target)| target.raw.to_string())
        .collect();

    stats.matched = matched.len();
    stats.missing = missing.len();
    stats.unmatched = unmatched.len();
    stats.elapsed_seconds = start.elapsed().as_secs_f64();

    CatalogReconciliation {
        matched,
        missing,
        unmatched,
        stats,
    }
}
