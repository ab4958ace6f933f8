//! Line-oriented result lists.
//!
//! One entry per line, case-insensitively sorted, UTF-8, each line
//! newline-terminated.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::{CatalogReconciliation, MatchResult};
use crate::parse::format_local_track_name;

pub const MATCHED_FILE: &str = "matched_tracks.txt";
pub const MISSING_FILE: &str = "missing_tracks.txt";
pub const UNMATCHED_FILE: &str = "unmatched_local.txt";
pub const ADDED_FILE: &str = "added_tracks.txt";
pub const NOT_FOUND_FILE: &str = "not_found_tracks.txt";

/// Sort by lowercase form; equal keys keep their relative order.
pub fn sort_case_insensitive(items: &mut [String]) {
    items.sort_by_cached_key(|item| item.to_lowercase());
}

/// Write `items` to `path`, sorted, one trimmed entry per line.
pub fn write_track_list(path: &Path, items: &[String]) -> Result<()> {
    let mut sorted = items.to_vec();
    sort_case_insensitive(&mut sorted);

    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for item in &sorted {
        writeln!(writer, "{}", item.trim())?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a list written by `write_track_list`, skipping blank lines.
pub fn read_track_list(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Paths of the three result lists under `dir`.
pub fn report_paths(dir: &Path) -> [PathBuf; 3] {
    [
        dir.join(MATCHED_FILE),
        dir.join(MISSING_FILE),
        dir.join(UNMATCHED_FILE),
    ]
}

/// Write matched sources, missing sources and unclaimed local tracks under
/// `dir`, creating it if needed. Unclaimed local tracks are written in their
/// display form.
pub fn write_reconciliation(dir: &Path, result: &CatalogReconciliation) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let [matched_path, missing_path, unmatched_path] = report_paths(dir);

    let unmatched: Vec<String> = result
        .unmatched
        .iter()
        .map(|name| format_local_track_name(name))
        .collect();

    write_track_list(&matched_path, &result.matched_sources())?;
    write_track_list(&missing_path, &result.missing)?;
    write_track_list(&unmatched_path, &unmatched)?;

    log::info!(
        "Wrote {} matched, {} missing, {} unmatched to {}",
        result.matched.len(),
        result.missing.len(),
        unmatched.len(),
        dir.display()
    );
    Ok(())
}

/// Paths of the batch selection lists under `dir`.
pub fn pick_report_paths(dir: &Path) -> [PathBuf; 2] {
    [dir.join(ADDED_FILE), dir.join(NOT_FOUND_FILE)]
}

/// Write accepted queries to `added_tracks.txt` and the rest to
/// `not_found_tracks.txt` under `dir`. Returns (added, not found) counts.
pub fn write_pick_report(dir: &Path, results: &[MatchResult]) -> Result<(usize, usize)> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let [added_path, not_found_path] = pick_report_paths(dir);

    let mut added = Vec::new();
    let mut not_found = Vec::new();
    for result in results {
        match result.accepted_index() {
            Some(_) => added.push(result.query.clone()),
            None => not_found.push(result.query.clone()),
        }
    }

    write_track_list(&added_path, &added)?;
    write_track_list(&not_found_path, &not_found)?;
    log::info!(
        "Wrote {} added, {} not found to {}",
        added.len(),
        not_found.len(),
        dir.display()
    );
    Ok((added.len(), not_found.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sort_case_insensitive_is_stable() {
        let mut items = strings(&["b", "B", "a", "C"]);
        sort_case_insensitive(&mut items);
        assert_eq!(items, strings(&["a", "b", "B", "C"]));
    }

    #[test]
    fn test_write_track_list_exact_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.txt");
        write_track_list(&path, &strings(&["b - Song ", "A - Song", "Ä - Song"])).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes, "A - Song\nb - Song\nÄ - Song\n".as_bytes());
    }

    #[test]
    fn test_empty_list_writes_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        write_track_list(&path, &[]).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"");
    }

    #[test]
    fn test_read_track_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.txt");
        std::fs::write(&path, "A - Song\n\n  B - Song \n").unwrap();
        assert_eq!(read_track_list(&path).unwrap(), strings(&["A - Song", "B - Song"]));
    }

    #[test]
    fn test_write_reconciliation() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("logs");
        let result = CatalogReconciliation {
            matched: vec![("B - Song".to_string(), "B - Song".to_string())],
            missing: strings(&["Z - Gone", "a - Gone"]),
            unmatched: strings(&["DJ_A - Track_Radio_Edit"]),
            ..Default::default()
        };
        write_reconciliation(&out, &result).unwrap();

        let [matched, missing, unmatched] = report_paths(&out);
        assert_eq!(read_track_list(&matched).unwrap(), strings(&["B - Song"]));
        assert_eq!(read_track_list(&missing).unwrap(), strings(&["a - Gone", "Z - Gone"]));
        assert_eq!(
            read_track_list(&unmatched).unwrap(),
            strings(&["DJ A - Track (Radio Edit)"])
        );
    }

    fn result(query: &str, accepted: bool) -> MatchResult {
        MatchResult {
            query: query.to_string(),
            candidate: Some(query.to_string()),
            candidate_index: Some(0),
            score: if accepted { 1.0 } else { 0.4 },
            accepted,
        }
    }

    #[test]
    fn test_write_pick_report() {
        let dir = tempfile::tempdir().unwrap();
        let results = [
            result("b - Song", true),
            result("C - Gone", false),
            result("A - Song", true),
        ];
        assert_eq!(write_pick_report(dir.path(), &results).unwrap(), (2, 1));

        let [added, not_found] = pick_report_paths(dir.path());
        assert_eq!(std::fs::read(&added).unwrap(), b"A - Song\nb - Song\n");
        assert_eq!(read_track_list(&not_found).unwrap(), strings(&["C - Gone"]));
    }
}
