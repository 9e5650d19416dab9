//! reward-rank CLI - Preference-score ranking for generation batches

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

mod commands;

/// Preference-score ranking tool for generated image batches.
#[derive(Parser)]
#[command(name = "reward-rank")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Policy for unscored images reaching the low-score filter.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum UnscoredArg {
    /// Fail the run (reference behavior)
    Reject,
    /// Remove the image
    Drop,
    /// Keep the image, ranked last
    Retain,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank a batch manifest by preference score
    Rank {
        /// Input batch manifest (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output report file (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write a CSV summary
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Filter out images with low scores
        #[arg(long)]
        filter: bool,

        /// Lower score limit (empty disables the limit)
        #[arg(long, default_value = "0")]
        limit: String,

        /// What to do with unscored images when filtering
        #[arg(long, value_enum, default_value_t = UnscoredArg::Reject)]
        unscored: UnscoredArg,

        /// Run name for the report
        #[arg(long)]
        name: Option<String>,
    },

    /// Summarize a previously written report
    Inspect {
        /// Report file (JSON)
        input: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank {
            input,
            output,
            csv,
            filter,
            limit,
            unscored,
            name,
        } => {
            let policy = match unscored {
                UnscoredArg::Reject => reward_rank::UnscoredPolicy::Reject,
                UnscoredArg::Drop => reward_rank::UnscoredPolicy::Drop,
                UnscoredArg::Retain => reward_rank::UnscoredPolicy::Retain,
            };
            commands::rank::run(input, output, csv, filter, &limit, policy, name, cli.verbose)
        }
        Commands::Inspect { input } => commands::inspect::run(input, cli.verbose),
    }
}
