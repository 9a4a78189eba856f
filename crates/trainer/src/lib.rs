//! Training harness for the fork-search action network.
//!
//! Each epoch runs the network over a fresh random input, searches for a
//! better fork of that run, and fits the network on the forced step of the
//! first improving fork. The mean score over a fixed corpus is reported
//! before and after training.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod results;

pub use config::{build_train_config, load_train_toml, TrainOverrides, TrainToml};
pub use logging::{create_log_file, init_logging};
pub use pipeline::{
    evaluate_mean_score, run_corpus, run_epoch, run_train, train_epochs, CorpusArgs, TrainArgs,
};
pub use results::{median, EpochOutcome, EpochResult, TrainingReport};
