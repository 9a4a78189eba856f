//! Predictor seam, search errors, and the budgeted fork search driver.

use rand::Rng;
use serde::Serialize;

use nested::{Action, Token};

use crate::config::SearchConfig;
use crate::fork::Fork;
use crate::process::Process;

/// Errors that can occur while running or forking a process.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Fork requested on a process that has recorded no steps.
    #[error("cannot fork a process with an empty execution history")]
    EmptyHistory,
    /// Every step in the history has zero entropy, so no branch point can be sampled.
    #[error("total entropy of the execution history is zero; branch selection is undefined")]
    ZeroEntropy,
    /// The taken action held all of the probability mass at the chosen step.
    #[error("step {step}: action {action} holds all probability mass, no alternative exists")]
    SaturatedDistribution { step: usize, action: Action },
    /// Predictor output with the wrong arity or non-finite / negative entries.
    #[error("invalid predictor distribution of length {len}")]
    InvalidDistribution { len: usize },
    /// Fork requested at a step the history does not contain.
    #[error("branch index {index} out of range for history of length {len}")]
    BranchOutOfRange { index: usize, len: usize },
    /// Fork requested on a process that still has tokens left.
    #[error("process is still running; run it to completion before forking")]
    ProcessIncomplete,
    /// Error from the concrete predictor.
    #[error("Predictor error: {0}")]
    Predictor(#[source] anyhow::Error),
}

// ---------------------------------------------------------------------------
// Predictor
// ---------------------------------------------------------------------------

/// Output of one predictor query.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// One probability per action, summing to 1.
    pub distribution: Vec<f64>,
    /// The action the predictor commits to.
    pub action: Action,
}

/// Decision model mapping a token to an action distribution.
///
/// Processes hold the predictor by shared reference. `update` takes
/// `&mut self`, so it can only be called once every process borrowing the
/// predictor has been dropped.
pub trait Predictor {
    /// Distribution over actions for `token`, and the chosen action.
    fn predict(&self, token: Token) -> Result<Prediction, SearchError>;

    /// One-hot distribution for `action`, recorded on forced fork steps.
    fn encode(&self, action: Action) -> Vec<f64>;

    /// Apply one training update toward `(token, action)`.
    fn update(&mut self, token: Token, action: Action) -> Result<(), SearchError>;
}

// ---------------------------------------------------------------------------
// ForkSearch
// ---------------------------------------------------------------------------

/// Counters for one fork search.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForkStats {
    /// Score of the process the search started from.
    pub original_score: f64,
    /// Forks attempted, including aborted ones.
    pub attempts: u32,
    /// Attempts abandoned because the chosen step had no alternative action.
    pub aborted: u32,
    /// Best score among completed forks, if any completed.
    pub best_fork_score: Option<f64>,
}

/// How a fork search ended.
#[derive(Debug)]
pub enum SearchOutcome<'p> {
    /// The original already scores 1.0; nothing to search.
    AlreadyOptimal,
    /// A fork beat the original.
    Improved {
        fork: Fork<'p>,
        fork_score: f64,
        /// Token of the forced step.
        token: Token,
        /// Action forced at that step.
        action: Action,
    },
    /// The attempt budget ran out without an improving fork.
    Exhausted,
}

impl SearchOutcome<'_> {
    /// Training example `(token, action)` when the search found an improvement.
    pub fn training_example(&self) -> Option<(Token, Action)> {
        match self {
            SearchOutcome::Improved { token, action, .. } => Some((*token, *action)),
            _ => None,
        }
    }

    pub fn is_improved(&self) -> bool {
        matches!(self, SearchOutcome::Improved { .. })
    }
}

/// Repeats random forks of a completed process until one scores better.
#[derive(Debug, Clone)]
pub struct ForkSearch {
    config: SearchConfig,
}

impl ForkSearch {
    /// Create a new fork search with the given configuration.
    pub fn new(config: SearchConfig) -> Self {
        config.validate();
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search for a fork of `original` that scores above it.
    ///
    /// Attempts whose branch step has a saturated distribution are counted
    /// and skipped. A history with zero total entropy fails the whole
    /// search, since every further attempt would fail the same way.
    pub fn run<'p, R: Rng + ?Sized>(
        &self,
        original: &Process<'p>,
        rng: &mut R,
    ) -> Result<(SearchOutcome<'p>, ForkStats), SearchError> {
        if !original.is_done() {
            return Err(SearchError::ProcessIncomplete);
        }

        let original_score = original.score();
        let mut stats = ForkStats {
            original_score,
            ..ForkStats::default()
        };

        if original_score >= 1.0 {
            tracing::debug!("Original already optimal, skipping fork search");
            return Ok((SearchOutcome::AlreadyOptimal, stats));
        }

        let threshold = original_score + self.config.min_improvement;

        while stats.attempts < self.config.max_fork_attempts {
            stats.attempts += 1;

            let fork = match original.random_fork(rng) {
                Ok(fork) => fork,
                Err(SearchError::SaturatedDistribution { step, action }) => {
                    stats.aborted += 1;
                    tracing::debug!(
                        attempt = stats.attempts,
                        step,
                        %action,
                        "No alternative action at branch point, attempt aborted"
                    );
                    continue;
                }
                Err(e) => return Err(e),
            };

            let fork_score = fork.process.score();
            stats.best_fork_score = Some(
                stats
                    .best_fork_score
                    .map_or(fork_score, |best| best.max(fork_score)),
            );
            tracing::debug!(
                attempt = stats.attempts,
                branch = fork.branch_index,
                fork_score,
                original_score,
                output = %fork.process.output(),
                "Fork candidate"
            );

            if fork_score > threshold {
                let forced = fork.forced_step();
                let (token, action) = (forced.token, forced.action);
                tracing::debug!(
                    attempts = stats.attempts,
                    branch = fork.branch_index,
                    %token,
                    %action,
                    fork_score,
                    "Better variation found"
                );
                return Ok((
                    SearchOutcome::Improved {
                        fork,
                        fork_score,
                        token,
                        action,
                    },
                    stats,
                ));
            }
        }

        tracing::debug!(
            attempts = stats.attempts,
            aborted = stats.aborted,
            "No better variation found"
        );
        Ok((SearchOutcome::Exhausted, stats))
    }
}
