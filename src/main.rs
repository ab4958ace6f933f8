use std::io::BufRead;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use playlist_reconcile::catalog::{load_candidate_map, load_source_catalog, scan_local_catalog};
use playlist_reconcile::config::{AppConfig, MatchConfig};
use playlist_reconcile::normalize::{normalize, normalize_displayable};
use playlist_reconcile::output::{
    pick_report_paths, read_track_list, write_pick_report, write_reconciliation, MISSING_FILE,
};
use playlist_reconcile::parse::parse_track;
use playlist_reconcile::progress::{
    create_progress_bar, create_spinner, format_duration, log_progress, set_log_only,
};
use playlist_reconcile::reconcile::{reconcile_catalogs_with_progress, select_all, select_best};
use playlist_reconcile::safety::{validate_output_paths, validate_report_dir};
use playlist_reconcile::scoring::SimilarityMetric;

/// Log-only progress interval (source tracks)
const PROGRESS_INTERVAL: u64 = 50;

#[derive(Parser)]
#[command(name = "playlist-reconcile", version, about = "Reconcile a playlist against a local music folder")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log progress lines instead of drawing progress bars
    #[arg(long, global = true)]
    log_only: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match a source playlist against a local folder and write result lists
    Reconcile {
        /// Source playlist: one "Artist - Title" per line, or a .json array of {artists, title}
        source: PathBuf,

        /// Local music folder (without it, the source tracks are just listed)
        folder: Option<PathBuf>,

        /// Directory for matched/missing/unmatched lists (default from config, then "logs")
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Acceptance threshold (0.0 to 1.0)
        #[arg(long)]
        threshold: Option<f64>,

        #[arg(long, value_enum)]
        metric: Option<SimilarityMetric>,

        /// Write run statistics as JSON to this file
        #[arg(long)]
        stats: Option<PathBuf>,
    },

    /// Pick the best candidate for one query (candidates from stdin if none given)
    Pick {
        /// "Artist1, Artist2 - Title" query
        query: String,

        /// Candidates, most relevant first
        candidates: Vec<String>,

        /// Acceptance threshold (0.0 to 1.0)
        #[arg(long)]
        threshold: Option<f64>,

        #[arg(long, value_enum)]
        metric: Option<SimilarityMetric>,
    },

    /// Pick the best search result for every query in a list and write
    /// added/not-found lists
    PickBatch {
        /// JSON object mapping each query to its search results, most relevant first
        candidates: PathBuf,

        /// Query list, one per line (default: missing_tracks.txt in the output directory)
        #[arg(short, long)]
        queries: Option<PathBuf>,

        /// Directory for added/not-found lists (default from config, then "logs")
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Acceptance threshold (0.0 to 1.0)
        #[arg(long)]
        threshold: Option<f64>,

        #[arg(long, value_enum)]
        metric: Option<SimilarityMetric>,
    },

    /// Print the display form and comparison key of a string
    Normalize { text: String },

    /// Parse track strings and print them as JSON
    Parse {
        tracks: Vec<String>,
    },
}

fn apply_overrides(
    base: MatchConfig,
    threshold: Option<f64>,
    metric: Option<SimilarityMetric>,
) -> Result<MatchConfig> {
    let mut config = base;
    if let Some(threshold) = threshold {
        config = config.with_threshold(threshold);
    }
    if let Some(metric) = metric {
        config = config.with_metric(metric);
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();
    set_log_only(cli.log_only);

    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Reconcile {
            source,
            folder,
            output_dir,
            threshold,
            metric,
            stats,
        } => {
            let match_config = apply_overrides(config.batch_config(), threshold, metric)?;
            let sources = load_source_catalog(&source)?;

            let Some(folder) = folder else {
                println!("Found {} tracks in {}:", sources.len(), source.display());
                for track in &sources {
                    println!("{}", track);
                }
                return Ok(());
            };

            let output_dir = output_dir.unwrap_or_else(|| config.output_dir());
            validate_report_dir(&output_dir, &[source.as_path()])?;

            let start = Instant::now();
            let spinner = create_spinner("Scanning local folder");
            let local = scan_local_catalog(&folder, &config.audio_extensions());
            spinner.finish_and_clear();
            let local = local?;

            log::info!(
                "Reconciling {} source tracks against {} local tracks (threshold {}, metric {:?})",
                sources.len(),
                local.len(),
                match_config.threshold,
                match_config.metric
            );

            let total = sources.len() as u64;
            let pb = create_progress_bar(total, "Matching");
            let mut done = 0u64;
            let result = reconcile_catalogs_with_progress(&sources, &local, &match_config, || {
                done += 1;
                pb.inc(1);
                log_progress("reconcile", done, total, PROGRESS_INTERVAL);
            });
            pb.finish_and_clear();

            write_reconciliation(&output_dir, &result)?;
            result.stats.log_phase("reconcile");
            if let Some(path) = stats {
                result
                    .stats
                    .write_to_file(&path)
                    .with_context(|| format!("Failed to write stats to {}", path.display()))?;
            }

            println!(
                "Matched {}/{} ({:.1}%), missing {}, unmatched local {} in {}",
                result.stats.matched,
                result.stats.sources,
                result.stats.match_rate(),
                result.stats.missing,
                result.stats.unmatched,
                format_duration(start.elapsed())
            );
            if result.matched.len() != local.len() {
                log::warn!(
                    "{} matched tracks but {} local files; see {}",
                    result.matched.len(),
                    local.len(),
                    output_dir.display()
                );
            }
        }

        Commands::Pick {
            query,
            candidates,
            threshold,
            metric,
        } => {
            let match_config = apply_overrides(config.live_config(), threshold, metric)?;
            let candidates = if candidates.is_empty() {
                std::io::stdin()
                    .lock()
                    .lines()
                    .collect::<std::io::Result<Vec<String>>>()
                    .context("Failed to read candidates from stdin")?
                    .into_iter()
                    .map(|line| line.trim().to_string())
                    .filter(|line| !line.is_empty())
                    .collect()
            } else {
                candidates
            };

            let result = select_best(&query, &candidates, &match_config);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Commands::PickBatch {
            candidates,
            queries,
            output_dir,
            threshold,
            metric,
        } => {
            let match_config = apply_overrides(config.live_config(), threshold, metric)?;
            let output_dir = output_dir.unwrap_or_else(|| config.output_dir());
            let queries_path = queries.unwrap_or_else(|| output_dir.join(MISSING_FILE));
            validate_output_paths(
                &pick_report_paths(&output_dir),
                &[queries_path.as_path(), candidates.as_path()],
            )?;

            let queries = read_track_list(&queries_path)?;
            let candidate_map = load_candidate_map(&candidates)?;

            let start = Instant::now();
            let total = queries.len() as u64;
            let pb = create_progress_bar(total, "Selecting");
            let mut done = 0u64;
            let results = select_all(&queries, &candidate_map, &match_config, |result| {
                done += 1;
                pb.inc(1);
                match result.accepted_index() {
                    Some(index) => log::debug!(
                        "{:?} -> #{} ({:.2})",
                        result.query,
                        index + 1,
                        result.score
                    ),
                    None => log::debug!("{:?}: no match (best {:.2})", result.query, result.score),
                }
                log_progress("pick", done, total, PROGRESS_INTERVAL);
            });
            pb.finish_and_clear();

            let (added, not_found) = write_pick_report(&output_dir, &results)?;
            println!(
                "Added {}, not found {} in {}",
                added,
                not_found,
                format_duration(start.elapsed())
            );
        }

        Commands::Normalize { text } => {
            println!("display: {}", normalize_displayable(&text));
            println!("key:     {}", normalize(&text));
        }

        Commands::Parse { tracks } => {
            for track in &tracks {
                println!("{}", serde_json::to_string(&parse_track(track))?);
            }
        }
    }

    Ok(())
}
