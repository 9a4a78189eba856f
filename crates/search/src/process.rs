//! One run of the predictor over the tokens of an input tree.

use std::fmt;

use rand::Rng;

use nested::{
    generate_random_instance, score, score_breakdown, Action, GeneratorConfig, NestedList,
    ScoreBreakdown, Token, TreeBuilder,
};

use crate::engine::{Predictor, SearchError};
use crate::step::ExecutionStep;

/// Whether a process has tokens left to consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Running,
    Done,
}

/// Couples an input tree with the output tree being built from it.
///
/// Owns its input, output and history outright; the predictor is borrowed
/// and shared with every fork.
pub struct Process<'p> {
    predictor: &'p dyn Predictor,
    input: NestedList,
    /// Scoring target: `input` wrapped in the builder's own root.
    gold: NestedList,
    tokens: Vec<Token>,
    output: TreeBuilder,
    history: Vec<ExecutionStep>,
}

impl fmt::Debug for Process<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("input", &self.input.to_string())
            .field("output", &self.output.tree().to_string())
            .field("position", &self.position())
            .field("len", &self.tokens.len())
            .finish_non_exhaustive()
    }
}

impl<'p> Process<'p> {
    /// A fresh process over the tokens of `input`.
    pub fn new(predictor: &'p dyn Predictor, input: NestedList) -> Self {
        let tokens = input.tokens().collect();
        let gold = input.wrapped();
        Self {
            predictor,
            input,
            gold,
            tokens,
            output: TreeBuilder::new(),
            history: Vec::new(),
        }
    }

    /// A fresh process over a newly generated random input.
    pub fn with_random_input<R: Rng + ?Sized>(
        predictor: &'p dyn Predictor,
        config: &GeneratorConfig,
        rng: &mut R,
    ) -> Self {
        Self::new(predictor, generate_random_instance(config, rng))
    }

    /// Rebuild a process at some point of its run. Used by forking.
    pub(crate) fn from_parts(
        predictor: &'p dyn Predictor,
        input: NestedList,
        gold: NestedList,
        tokens: Vec<Token>,
        output: TreeBuilder,
        history: Vec<ExecutionStep>,
    ) -> Self {
        Self {
            predictor,
            input,
            gold,
            tokens,
            output,
            history,
        }
    }

    pub fn state(&self) -> ProcessState {
        if self.history.len() < self.tokens.len() {
            ProcessState::Running
        } else {
            ProcessState::Done
        }
    }

    pub fn is_done(&self) -> bool {
        self.state() == ProcessState::Done
    }

    /// Consume the next token.
    ///
    /// Queries the predictor, records a step holding a snapshot of the output
    /// taken before the action, then applies the action. A no-op on a
    /// finished process.
    pub fn advance(&mut self) -> Result<ProcessState, SearchError> {
        let Some(&token) = self.tokens.get(self.history.len()) else {
            return Ok(ProcessState::Done);
        };

        let prediction = self.predictor.predict(token)?;
        if prediction.distribution.len() != Action::COUNT {
            return Err(SearchError::InvalidDistribution {
                len: prediction.distribution.len(),
            });
        }

        let step = ExecutionStep::new(
            token,
            self.output.clone(),
            prediction.distribution,
            prediction.action,
        );
        tracing::trace!(
            position = self.history.len(),
            %token,
            action = %step.action,
            entropy = step.entropy,
            "Step"
        );
        self.history.push(step);
        self.output.apply(prediction.action, token);
        Ok(self.state())
    }

    /// Advance until every token has been consumed.
    pub fn run_to_completion(&mut self) -> Result<(), SearchError> {
        while self.advance()? == ProcessState::Running {}
        Ok(())
    }

    /// Similarity of the output to the wrapped input, in `[0, 1]`.
    pub fn score(&self) -> f64 {
        score(self.output.tree(), &self.gold)
    }

    pub fn score_breakdown(&self) -> ScoreBreakdown {
        score_breakdown(self.output.tree(), &self.gold)
    }

    pub fn predictor(&self) -> &'p dyn Predictor {
        self.predictor
    }

    pub fn input(&self) -> &NestedList {
        &self.input
    }

    pub fn gold(&self) -> &NestedList {
        &self.gold
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The output tree built so far.
    pub fn output(&self) -> &NestedList {
        self.output.tree()
    }

    pub fn builder(&self) -> &TreeBuilder {
        &self.output
    }

    pub fn history(&self) -> &[ExecutionStep] {
        &self.history
    }

    /// Number of tokens consumed.
    pub fn position(&self) -> usize {
        self.history.len()
    }
}
