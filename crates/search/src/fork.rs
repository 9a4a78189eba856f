//! Entropy-weighted branch selection and fork materialisation.

use rand::distributions::{WeightedError, WeightedIndex};
use rand::prelude::Distribution;
use rand::Rng;

use nested::Action;

use crate::engine::SearchError;
use crate::process::Process;
use crate::step::ExecutionStep;

/// A re-simulated branch of a completed process.
#[derive(Debug)]
pub struct Fork<'p> {
    pub process: Process<'p>,
    /// Index of the step whose action was replaced.
    pub branch_index: usize,
}

impl Fork<'_> {
    /// The step carrying the forced action.
    pub fn forced_step(&self) -> &ExecutionStep {
        &self.process.history()[self.branch_index]
    }
}

/// Sample a step index with probability proportional to its entropy.
pub fn select_branch_point<R: Rng + ?Sized>(
    history: &[ExecutionStep],
    rng: &mut R,
) -> Result<usize, SearchError> {
    if history.is_empty() {
        return Err(SearchError::EmptyHistory);
    }
    let weights = history.iter().map(|step| step.entropy);
    match WeightedIndex::new(weights) {
        Ok(dist) => Ok(dist.sample(rng)),
        Err(WeightedError::AllWeightsZero) => Err(SearchError::ZeroEntropy),
        Err(_) => Err(SearchError::InvalidDistribution { len: history.len() }),
    }
}

/// Sample an action other than the one taken at `step`.
///
/// The taken action's mass is removed and the rest renormalised. `index` is
/// the step's position in its history and only labels the error.
pub fn select_alternative_action<R: Rng + ?Sized>(
    step: &ExecutionStep,
    index: usize,
    rng: &mut R,
) -> Result<Action, SearchError> {
    let len = step.distribution.len();
    if len != Action::COUNT {
        return Err(SearchError::InvalidDistribution { len });
    }
    let taken = step.action.index();
    let weights = step
        .distribution
        .iter()
        .enumerate()
        .map(|(i, &p)| if i == taken { 0.0 } else { p });
    let dist = match WeightedIndex::new(weights) {
        Ok(dist) => dist,
        Err(WeightedError::AllWeightsZero) => {
            return Err(SearchError::SaturatedDistribution {
                step: index,
                action: step.action,
            })
        }
        Err(_) => return Err(SearchError::InvalidDistribution { len }),
    };
    let sampled = dist.sample(rng);
    Action::from_index(sampled).ok_or(SearchError::InvalidDistribution { len })
}

impl<'p> Process<'p> {
    /// Rewind to step `index` and take `action` there instead.
    ///
    /// The returned process has `index + 1` steps: the prefix of this history
    /// plus one forced step whose recorded distribution is the predictor's
    /// encoding of `action`. It is not resumed.
    pub fn fork_at(&self, index: usize, action: Action) -> Result<Process<'p>, SearchError> {
        let history = self.history();
        let Some(branch) = history.get(index) else {
            return Err(SearchError::BranchOutOfRange {
                index,
                len: history.len(),
            });
        };

        let mut output = branch.snapshot.clone();
        let forced = ExecutionStep::new(
            branch.token,
            branch.snapshot.clone(),
            self.predictor().encode(action),
            action,
        );
        output.apply(action, branch.token);

        let mut forked_history = history[..index].to_vec();
        forked_history.push(forced);

        Ok(Process::from_parts(
            self.predictor(),
            self.input().clone(),
            self.gold().clone(),
            self.tokens().to_vec(),
            output,
            forked_history,
        ))
    }

    /// Pick a branch point and an alternative action at random, fork there,
    /// and run the fork to completion.
    pub fn random_fork<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Fork<'p>, SearchError> {
        if !self.is_done() {
            return Err(SearchError::ProcessIncomplete);
        }
        let branch_index = select_branch_point(self.history(), rng)?;
        let step = &self.history()[branch_index];
        let action = select_alternative_action(step, branch_index, rng)?;

        tracing::trace!(
            branch = branch_index,
            token = %step.token,
            from = %step.action,
            p_from = step.taken_probability(),
            to = %action,
            "Forking"
        );

        let mut process = self.fork_at(branch_index, action)?;
        process.run_to_completion()?;
        Ok(Fork {
            process,
            branch_index,
        })
    }
}
