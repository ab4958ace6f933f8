//! Safety checks to prevent overwriting input catalogs.
//!
//! Result lists are rewritten on every run, so their paths are validated
//! against the source playlist before anything is written.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::output::report_paths;

/// Extension every result list must carry.
const REPORT_EXTENSION: &str = "txt";

fn resolved(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Validates that an output path is safe to overwrite.
///
/// Checks:
/// - Output must be a `.txt` file
/// - Output cannot be the same as any of the provided source paths
///   (compared after resolving symlinks and relative components when the
///   paths exist)
pub fn validate_output_path(output: &Path, source_paths: &[&Path]) -> Result<()> {
    let is_report = output
        .extension()
        .map(|e| e.eq_ignore_ascii_case(REPORT_EXTENSION))
        .unwrap_or(false);
    if !is_report {
        bail!(
            "Safety check failed: output file '{}' must have a .{} extension",
            output.display(),
            REPORT_EXTENSION
        );
    }

    let output_resolved = resolved(output);
    for source in source_paths {
        if output == *source || output_resolved == resolved(source) {
            bail!(
                "Safety check failed: output '{}' cannot be the same as source '{}'",
                output.display(),
                source.display()
            );
        }
    }

    Ok(())
}

/// Validate every path in `outputs`.
pub fn validate_output_paths(outputs: &[PathBuf], source_paths: &[&Path]) -> Result<()> {
    for path in outputs {
        validate_output_path(path, source_paths)?;
    }
    Ok(())
}

/// Validate every reconciliation list that would be written under `dir`.
pub fn validate_report_dir(dir: &Path, source_paths: &[&Path]) -> Result<()> {
    validate_output_paths(&report_paths(dir), source_paths)
}
