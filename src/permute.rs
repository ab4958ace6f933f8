//! Artist-order permutation expansion.
//!
//! Sources disagree on which artist is credited first, so comparisons run
//! over every ordering of an artist list and keep the best-aligned pairing.
//! Realistic artist counts are small (four or fewer).

use rustc_hash::FxHashSet;

/// Separator used to join an ordering back into one string.
pub const ARTIST_JOINER: &str = ", ";

/// Every distinct ordering of `artists`, comma-joined.
///
/// The input order comes first. Duplicate names yield each distinct ordering
/// once. Zero or one artist yields the single joined string.
pub fn expand_artists<S: AsRef<str>>(artists: &[S]) -> Vec<String> {
    let mut items: Vec<&str> = artists.iter().map(AsRef::as_ref).collect();
    if items.len() <= 1 {
        return vec![items.join(ARTIST_JOINER)];
    }

    let mut seen = FxHashSet::default();
    let mut orderings = Vec::new();
    visit_orderings(&mut items, 0, &mut |ordering: &[&str]| {
        let joined = ordering.join(ARTIST_JOINER);
        if seen.insert(joined.clone()) {
            orderings.push(joined);
        }
    });
    orderings
}

fn visit_orderings<F: FnMut(&[&str])>(items: &mut [&str], k: usize, visit: &mut F) {
    if k == items.len() {
        visit(items);
        return;
    }
    for i in k..items.len() {
        items.swap(k, i);
        visit_orderings(items, k + 1, visit);
        items.swap(k, i);
    }
}
