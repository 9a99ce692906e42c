//! # Habesha Ingest CLI (`habi`)
//!
//! The `habi` binary drives the place-discovery pipeline: destination
//! initialization, configuration health checks, the ingest run itself, and
//! store statistics.
//!
//! ## Usage
//!
//! ```bash
//! habi --config ./config/habi.toml <command>
//! ```
//!
//! | Command | Description |
//! |---------|-------------|
//! | `habi init` | Create the destination store schemas (idempotent) |
//! | `habi sources` | Show configured inputs and their health |
//! | `habi ingest` | Search, score, and merge places for every city |
//! | `habi stats` | Per-destination record counts and review backlog |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use habesha_ingest::config;
use habesha_ingest::ingest::{self, IngestOptions};
use habesha_ingest::sources;
use habesha_ingest::stats;
use habesha_ingest::store;

/// Habesha Ingest: batch discovery and scoring of Habesha points of
/// interest via the Google Places API.
#[derive(Parser)]
#[command(
    name = "habi",
    about = "Batch discovery and scoring of Habesha points of interest",
    version,
    long_about = "Habesha Ingest queries the Google Places API across a curated list of cities \
    and category query terms, scores each result for cultural relevance, and merges the results \
    into persistent keyed stores so that repeated runs accumulate evidence."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/habi.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize every configured destination store.
    ///
    /// Creates the SQLite files and the keyed places table. Idempotent.
    Init,

    /// Show configured cities, categories, API key, and destinations.
    Sources,

    /// Run the ingestion pipeline.
    ///
    /// For each selected city: resolve coordinates (skipped when the city
    /// file pre-knows them), run every category query term through the
    /// paginated search, score and merge the candidates, and batch-write
    /// the reconciled records to every selected destination.
    Ingest {
        /// Search radius in meters around each city's coordinates.
        #[arg(long)]
        radius_m: Option<u32>,

        /// Maximum result pages to fetch per query.
        #[arg(long)]
        max_pages: Option<u32>,

        /// Fetch place details (phone, website, hours) for each candidate.
        #[arg(long)]
        details: bool,

        /// Only process the first N cities from the cities file.
        #[arg(long)]
        limit_cities: Option<usize>,

        /// Restrict to one or more category ids (repeatable).
        #[arg(long = "only-category")]
        only_categories: Vec<String>,

        /// Write to a subset of configured destinations (repeatable).
        #[arg(long = "destination")]
        destinations: Vec<String>,

        /// Report per-city counts without writing anything.
        #[arg(long)]
        dry_run: bool,

        /// Places API key; falls back to the configured environment variable.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Per-destination record counts and score summary.
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            store::run_init(&cfg).await?;
        }
        Commands::Sources => {
            sources::list_sources(&cfg)?;
        }
        Commands::Ingest {
            radius_m,
            max_pages,
            details,
            limit_cities,
            only_categories,
            destinations,
            dry_run,
            api_key,
        } => {
            ingest::run_ingest(
                &cfg,
                IngestOptions {
                    radius_m,
                    max_pages,
                    details,
                    limit_cities,
                    only_categories,
                    destinations,
                    dry_run,
                    api_key,
                },
            )
            .await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
    }

    Ok(())
}
