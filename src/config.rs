use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::AUDIO_EXTENSIONS;
use crate::scoring::SimilarityMetric;

/// Default directory for the matched/missing/unmatched lists.
pub const DEFAULT_OUTPUT_DIR: &str = "logs";

/// Matching parameters for one engine mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchConfig {
    /// Minimum score (0.0 to 1.0) a match must reach.
    pub threshold: f64,
    pub metric: SimilarityMetric,
    /// How many leading candidates best-of-K selection looks at.
    pub candidate_window: usize,
}

impl MatchConfig {
    /// Live single-query threshold
    pub const LIVE_THRESHOLD: f64 = 0.85;
    /// Batch catalog threshold
    pub const BATCH_THRESHOLD: f64 = 0.90;
    pub const DEFAULT_CANDIDATE_WINDOW: usize = 5;

    /// Preset for best-of-K selection against search results.
    pub fn live() -> Self {
        Self {
            threshold: Self::LIVE_THRESHOLD,
            metric: SimilarityMetric::Ratio,
            candidate_window: Self::DEFAULT_CANDIDATE_WINDOW,
        }
    }

    /// Preset for whole-catalog reconciliation.
    pub fn batch() -> Self {
        Self {
            threshold: Self::BATCH_THRESHOLD,
            ..Self::live()
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_metric(mut self, metric: SimilarityMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Reject values the engine would silently misbehave on.
    /// The engine itself never clamps.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            bail!(
                "threshold {} is outside [0, 1] (use 0.9, not 90)",
                self.threshold
            );
        }
        if self.candidate_window == 0 {
            bail!("candidate_window must be at least 1");
        }
        Ok(())
    }
}

/// Optional per-mode overrides read from the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModeOverrides {
    pub threshold: Option<f64>,
    pub metric: Option<SimilarityMetric>,
    pub candidate_window: Option<usize>,
}

impl ModeOverrides {
    pub fn apply(&self, base: MatchConfig) -> MatchConfig {
        MatchConfig {
            threshold: self.threshold.unwrap_or(base.threshold),
            metric: self.metric.unwrap_or(base.metric),
            candidate_window: self.candidate_window.unwrap_or(base.candidate_window),
        }
    }
}

/// Application configuration loaded from a TOML file.
/// All fields have defaults; the file is optional.
///
/// ```toml
/// output_dir = "logs"
/// audio_extensions = ["mp3", "flac"]
///
/// [live]
/// threshold = 0.85
///
/// [batch]
/// threshold = 0.9
/// metric = "partial-ratio"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Overrides for best-of-K selection.
    pub live: ModeOverrides,
    /// Overrides for catalog reconciliation.
    pub batch: ModeOverrides,
    /// Where the result lists are written.
    pub output_dir: Option<PathBuf>,
    /// Extensions (without dot) counted as local tracks.
    pub audio_extensions: Option<Vec<String>>,
}

impl AppConfig {
    /// Load config from `path`. Returns defaults if no path was given or the
    /// file doesn't exist. A file that exists but can't be parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let config = Self::from_toml_str(&contents)
                    .with_context(|| format!("Failed to parse {}", path.display()))?;
                log::info!("Loaded config from {}", path.display());
                Ok(config)
            }
            Some(path) => {
                log::warn!("Config file {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            None => {
                log::debug!("No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn live_config(&self) -> MatchConfig {
        self.live.apply(MatchConfig::live())
    }

    pub fn batch_config(&self) -> MatchConfig {
        self.batch.apply(MatchConfig::batch())
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    pub fn audio_extensions(&self) -> Vec<String> {
        match &self.audio_extensions {
            Some(extensions) => extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            None => AUDIO_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}
