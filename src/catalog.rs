//! Catalog loading: local audio folders and exported source playlists.

use std::path::Path;

use anyhow::{bail, Context, Result};
use rustc_hash::FxHashMap;
use walkdir::WalkDir;

use crate::models::SourceTrack;
use crate::output::sort_case_insensitive;
use crate::parse::{format_local_track_name, format_source_track};

/// File extensions (lowercase, without dot) treated as local tracks.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "m4a", "aiff"];

/// Walk `root` recursively and return one track name per audio file: the
/// cleaned file stem with a bare mix suffix wrapped in parentheses
/// ("DJ_A - Song_Radio_Edit.mp3" → "DJ A - Song (Radio Edit)").
///
/// Entries are visited in file-name order so repeated scans of the same
/// folder agree. Unreadable entries are logged and skipped.
pub fn scan_local_catalog(root: &Path, extensions: &[String]) -> Result<Vec<String>> {
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }

    let mut tracks = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let is_audio = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(e)))
            .unwrap_or(false);
        if !is_audio {
            continue;
        }

        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            tracks.push(format_local_track_name(stem));
        } else {
            log::warn!("Skipping non-UTF-8 file name: {}", path.display());
        }
    }

    log::info!("Found {} local tracks under {}", tracks.len(), root.display());
    Ok(tracks)
}

/// Load a source catalog as raw track strings, case-insensitively sorted.
///
/// `.json` files hold an array of `{"artists": [...], "title": "..."}`
/// records, flattened with `format_source_track`. Anything else is read as
/// one "Artist - Title" entry per non-empty line.
pub fn load_source_catalog(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let mut tracks: Vec<String> = if is_json {
        let records: Vec<SourceTrack> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        records
            .iter()
            .map(|track| format_source_track(&track.artists, &track.title))
            .collect()
    } else {
        contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    };

    sort_case_insensitive(&mut tracks);
    log::info!("Loaded {} source tracks from {}", tracks.len(), path.display());
    Ok(tracks)
}

/// Load search results for batch selection: a JSON object mapping each
/// query to its candidates, most relevant first.
pub fn load_candidate_map(path: &Path) -> Result<FxHashMap<String, Vec<String>>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let candidates: FxHashMap<String, Vec<String>> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    log::info!("Loaded candidates for {} queries from {}", candidates.len(), path.display());
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn default_extensions() -> Vec<String> {
        AUDIO_EXTENSIONS.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_scan_local_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("House");
        fs::create_dir(&nested).unwrap();
        fs::write(dir.path().join("DJ_A - Song.mp3"), b"").unwrap();
        fs::write(nested.join("B - Other.Track.FLAC"), b"").unwrap();
        fs::write(nested.join("C - Song_Radio_Edit.wav"), b"").unwrap();
        fs::write(dir.path().join("cover.jpg"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let tracks = scan_local_catalog(dir.path(), &default_extensions()).unwrap();
        assert_eq!(tracks, vec!["DJ A - Song", "B - Other Track", "C - Song (Radio Edit)"]);
    }

    #[test]
    fn test_scan_respects_extension_list() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A - Song.mp3"), b"").unwrap();
        fs::write(dir.path().join("B - Song.ogg"), b"").unwrap();

        let tracks = scan_local_catalog(dir.path(), &["ogg".to_string()]).unwrap();
        assert_eq!(tracks, vec!["B - Song"]);
    }

    #[test]
    fn test_scan_rejects_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_local_catalog(&dir.path().join("missing"), &default_extensions()).is_err());
    }

    #[test]
    fn test_load_line_list_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("playlist.txt");
        fs::write(&path, "b - Song\n\n  A - Song  \nC - Song\n").unwrap();

        let tracks = load_source_catalog(&path).unwrap();
        assert_eq!(tracks, vec!["A - Song", "b - Song", "C - Song"]);
    }

    #[test]
    fn test_load_json_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("playlist.json");
        fs::write(
            &path,
            r#"[
                {"artists": ["X", "Acme"], "title": "Track - Acme Remix"},
                {"artists": ["A"], "title": "Song (Original Mix)"}
            ]"#,
        )
        .unwrap();

        let tracks = load_source_catalog(&path).unwrap();
        assert_eq!(tracks, vec!["A - Song", "X - Track (Acme Remix)"]);
    }

    #[test]
    fn test_load_candidate_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        fs::write(&path, r#"{"A - Song": ["A - Song (Edit)", "A - Song"], "B - Gone": []}"#).unwrap();

        let candidates = load_candidate_map(&path).unwrap();
        assert_eq!(candidates["A - Song"], vec!["A - Song (Edit)", "A - Song"]);
        assert!(candidates["B - Gone"].is_empty());

        fs::write(&path, r#"["A - Song"]"#).unwrap();
        assert!(load_candidate_map(&path).is_err());
    }

    #[test]
    fn test_load_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("playlist.json");
        fs::write(&path, "not json").unwrap();
        assert!(load_source_catalog(&path).is_err());
        assert!(load_source_catalog(&dir.path().join("missing.txt")).is_err());
    }
}
