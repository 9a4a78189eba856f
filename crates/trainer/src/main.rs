use std::path::PathBuf;

use clap::{Parser, Subcommand};

use trainer::pipeline::{self, CorpusArgs, TrainArgs};
use trainer::{init_logging, TrainOverrides};

/// nest-fork: train a token-to-action network to rebuild nested lists by fork search.
#[derive(Parser)]
#[command(name = "nest-fork", version, about)]
struct Cli {
    /// Also write DEBUG logs to a timestamped file in this directory.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

/// CLI subcommands for training and corpus generation.
#[derive(Subcommand)]
enum Command {
    /// Train the action network and report corpus scores before and after.
    Train {
        /// Path to training config TOML file. Built-in defaults when omitted.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the number of training epochs.
        #[arg(long)]
        epochs: Option<u32>,
        /// Override the RNG seed.
        #[arg(long)]
        seed: Option<u64>,
        /// Override the evaluation corpus size.
        #[arg(long)]
        corpus_size: Option<usize>,
        /// Override the fork attempt budget per epoch.
        #[arg(long)]
        max_fork_attempts: Option<u32>,
        /// Override the SGD learning rate.
        #[arg(long)]
        learning_rate: Option<f64>,
        /// Path to write the JSON training report.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Generate a corpus of distinct random instances.
    Corpus {
        /// Path to training config TOML file (uses `[generator]` and `[corpus]`).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the number of instances.
        #[arg(long)]
        size: Option<usize>,
        /// Override the RNG seed.
        #[arg(long)]
        seed: Option<u64>,
        /// Write a JSON array of trees instead of printing one per line.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Some(path) = init_logging(cli.log_dir.as_deref())? {
        tracing::info!(path = %path.display(), "Writing debug log");
    }

    match cli.command {
        Command::Train {
            config,
            epochs,
            seed,
            corpus_size,
            max_fork_attempts,
            learning_rate,
            output,
        } => pipeline::run_train(TrainArgs {
            config,
            overrides: TrainOverrides {
                epochs,
                seed,
                corpus_size,
                max_fork_attempts,
                learning_rate,
            },
            output,
        })
        .map(|_| ()),
        Command::Corpus {
            config,
            size,
            seed,
            output,
        } => pipeline::run_corpus(CorpusArgs {
            config,
            size,
            seed,
            output,
        })
        .map(|_| ()),
    }
}
