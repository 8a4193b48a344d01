mod compare;
mod matching;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use shopmatch_core::Threshold;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shopmatch-cli")]
#[command(about = "Find shops reported by more than one data source")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Group shops that several companies report
    Match {
        /// Grouped results file (`.json`, `.yaml` or `.yml`)
        #[arg(long, conflicts_with = "remote", required_unless_present = "remote")]
        input: Option<PathBuf>,
        /// Fetch grouped results from `SHOPMATCH_SOURCE_URL` instead of a file
        #[arg(long)]
        remote: bool,
        /// Name similarity threshold in 0.0..=1.0 (overrides the environment)
        #[arg(long)]
        threshold: Option<Threshold>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Score a single pair of shops and explain the verdict
    Compare {
        #[arg(long)]
        name_a: String,
        #[arg(long)]
        postcode_a: String,
        #[arg(long)]
        name_b: String,
        #[arg(long)]
        postcode_b: String,
        #[arg(long)]
        threshold: Option<Threshold>,
    },
}

impl Commands {
    /// The `--threshold` flag, which replaces `SHOPMATCH_SIMILARITY_THRESHOLD`.
    fn threshold(&self) -> Option<Threshold> {
        match self {
            Commands::Match { threshold, .. } | Commands::Compare { threshold, .. } => *threshold,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config =
        shopmatch_core::load_app_config(cli.command.threshold()).context("loading configuration")?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Match { input, format, .. } => {
            matching::run_match(&config, input.as_deref(), config.similarity_threshold, format)
                .await?;
        }
        Commands::Compare {
            name_a,
            postcode_a,
            name_b,
            postcode_b,
            ..
        } => {
            let comparison = compare::compare_pair(
                &name_a,
                &postcode_a,
                &name_b,
                &postcode_b,
                config.similarity_threshold,
            );
            println!("{}", comparison.render());
        }
    }

    Ok(())
}
