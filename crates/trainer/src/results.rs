//! Result types for training runs.

use nested::Action;
use serde::{Deserialize, Serialize};

/// How one training epoch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpochOutcome {
    /// The network already rebuilt the input perfectly.
    Perfect,
    /// A better fork was found and the network was fitted on it.
    Improved,
    /// The fork budget ran out.
    Exhausted,
    /// The run, search or update returned an error; the epoch was skipped.
    Failed,
}

/// Result for a single epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochResult {
    pub epoch: u32,
    /// Input tree in bracket notation.
    pub input: String,
    /// Score of the unforked run.
    pub score: f64,
    pub outcome: EpochOutcome,
    pub fork_attempts: u32,
    pub aborted_forks: u32,
    pub best_fork_score: Option<f64>,
    /// Token of the step the network was fitted on.
    #[serde(default)]
    pub trained_token: Option<String>,
    #[serde(default)]
    pub trained_action: Option<Action>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Summary of a full training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Seed of the run's RNG, whether configured or drawn.
    pub seed: u64,
    pub epochs: u32,
    pub corpus_size: usize,
    /// Mean corpus score before training.
    pub initial_mean_score: f64,
    /// Mean corpus score after training.
    pub final_mean_score: f64,
    pub improved: u32,
    pub exhausted: u32,
    pub perfect: u32,
    pub failed: u32,
    /// Median score of the per-epoch training inputs.
    pub median_epoch_score: f64,
    pub wall_time_secs: f64,
    pub per_epoch: Vec<EpochResult>,
}

impl TrainingReport {
    /// Count outcomes and compute the median epoch score.
    pub fn summarize(
        seed: u64,
        corpus_size: usize,
        initial_mean_score: f64,
        final_mean_score: f64,
        wall_time_secs: f64,
        per_epoch: Vec<EpochResult>,
    ) -> Self {
        let count = |o: EpochOutcome| per_epoch.iter().filter(|e| e.outcome == o).count() as u32;
        let mut scores: Vec<f64> = per_epoch
            .iter()
            .filter(|e| e.outcome != EpochOutcome::Failed)
            .map(|e| e.score)
            .collect();
        Self {
            seed,
            epochs: per_epoch.len() as u32,
            corpus_size,
            initial_mean_score,
            final_mean_score,
            improved: count(EpochOutcome::Improved),
            exhausted: count(EpochOutcome::Exhausted),
            perfect: count(EpochOutcome::Perfect),
            failed: count(EpochOutcome::Failed),
            median_epoch_score: median(&mut scores),
            wall_time_secs,
            per_epoch,
        }
    }
}

/// Compute the median of a slice of f64 values.
///
/// Returns 0.0 for empty slices.
pub fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
