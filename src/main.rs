//! # Aniboard CLI
//!
//! Thin command-line front for the pipeline, standing in for the graphical
//! dashboard. Loads the configured datasets, then either prints one of the
//! five chart tables or a batch of recommendations as pretty JSON.
//!
//! ## Usage
//!
//! ```bash
//! aniboard --config aniboard.toml query mean-score-by-source
//! aniboard recommend --user 42 --count 5 --seed 7
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use aniboard::{Config, Dashboard, Visualization};

#[derive(Parser)]
#[command(name = "aniboard", about = "Anime analytics pipeline", version)]
struct Cli {
    /// Path to a TOML configuration file (defaults to aniboard.toml + env)
    #[arg(long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print placeholder recommendations for a user
    Recommend {
        /// User id to recommend for
        #[arg(long)]
        user: i64,

        /// Number of titles to return (clamped to the configured maximum)
        #[arg(long)]
        count: Option<usize>,

        /// Fix the sampling seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run one of the five visualization queries
    Query {
        /// Which chart table to compute
        #[arg(value_enum)]
        visualization: VisualizationArg,
    },

    /// List the user ids available to the selector
    Users,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum VisualizationArg {
    ScoreDistribution,
    TopRatedByGroup,
    MeanScoreBySource,
    TitlePopularity,
    UserScoreDispersion,
}

impl From<VisualizationArg> for Visualization {
    fn from(arg: VisualizationArg) -> Self {
        match arg {
            VisualizationArg::ScoreDistribution => Visualization::ScoreDistribution,
            VisualizationArg::TopRatedByGroup => Visualization::TopRatedByGroup,
            VisualizationArg::MeanScoreBySource => Visualization::MeanScoreBySource,
            VisualizationArg::TitlePopularity => Visualization::TitlePopularity,
            VisualizationArg::UserScoreDispersion => Visualization::UserScoreDispersion,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    init_logging(&config);

    let dashboard = Dashboard::load(config).context("failed to build dashboard")?;

    match cli.command {
        Command::Recommend { user, count, seed } => {
            let count = count.unwrap_or(dashboard.config().recommend.default_count);
            let recs = match seed {
                Some(seed) => dashboard.recommend_seeded(user, count, seed),
                None => dashboard.recommend(user, count),
            };
            if recs.is_empty() {
                println!("no unseen titles for user {user}");
            } else {
                println!("{}", serde_json::to_string_pretty(&recs)?);
            }
        }
        Command::Query { visualization } => {
            let result = dashboard.run_query(visualization.into());
            if result.is_empty() {
                println!("no data");
            } else {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
        }
        Command::Users => {
            println!("{}", serde_json::to_string_pretty(&dashboard.user_ids())?);
        }
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    if config.logging.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
