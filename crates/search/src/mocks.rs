//! Mock predictor for exercising processes and forks without a network.

use std::cell::Cell;
use std::collections::HashMap;

use nested::{Action, Token};
use network::{decode_action, encode_action};

use crate::engine::{Prediction, Predictor, SearchError};

// ---------------------------------------------------------------------------
// MockPredictor
// ---------------------------------------------------------------------------

/// Mock predictor that returns canned distributions based on the token.
///
/// Lookup order: exact token match, then oracle mode (if enabled), then the
/// default distribution. The chosen action is the first maximum of the
/// returned distribution, except in oracle mode where it is the gold action.
pub struct MockPredictor {
    responses: HashMap<Token, Vec<f64>>,
    default_response: Vec<f64>,
    oracle_confidence: Option<f64>,
    predictions: Cell<usize>,
    updates: Vec<(Token, Action)>,
}

impl Default for MockPredictor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPredictor {
    /// Create a mock predictor that is uniform over actions for any token.
    pub fn new() -> Self {
        Self::with_default(vec![1.0 / Action::COUNT as f64; Action::COUNT])
    }

    /// Alias for [`MockPredictor::new`].
    pub fn uniform() -> Self {
        Self::new()
    }

    /// Create a mock predictor returning `distribution` for any token.
    pub fn with_default(distribution: Vec<f64>) -> Self {
        Self {
            responses: HashMap::new(),
            default_response: distribution,
            oracle_confidence: None,
            predictions: Cell::new(0),
            updates: Vec::new(),
        }
    }

    /// Create a mock predictor that always picks the gold action.
    ///
    /// The gold action gets probability `confidence`; the rest is split
    /// evenly, so every step keeps some entropy when `confidence < 1`.
    pub fn oracle(confidence: f64) -> Self {
        let mut mock = Self::new();
        mock.oracle_confidence = Some(confidence);
        mock
    }

    /// Add a canned distribution for an exact token.
    pub fn add_response(&mut self, token: Token, distribution: Vec<f64>) {
        self.responses.insert(token, distribution);
    }

    /// Training examples received through `update`, in order.
    pub fn updates(&self) -> &[(Token, Action)] {
        &self.updates
    }

    /// Number of `predict` calls so far.
    pub fn num_predictions(&self) -> usize {
        self.predictions.get()
    }

    fn oracle_distribution(confidence: f64, gold: Action) -> Vec<f64> {
        let rest = (1.0 - confidence) / (Action::COUNT - 1) as f64;
        Action::ALL
            .iter()
            .map(|&a| if a == gold { confidence } else { rest })
            .collect()
    }
}

impl Predictor for MockPredictor {
    fn predict(&self, token: Token) -> Result<Prediction, SearchError> {
        self.predictions.set(self.predictions.get() + 1);

        // 1. Exact match
        if let Some(distribution) = self.responses.get(&token) {
            let action =
                decode_action(distribution).map_err(|e| SearchError::Predictor(e.into()))?;
            return Ok(Prediction {
                distribution: distribution.clone(),
                action,
            });
        }
        // 2. Oracle
        if let Some(confidence) = self.oracle_confidence {
            let action = Action::gold_for(token);
            return Ok(Prediction {
                distribution: Self::oracle_distribution(confidence, action),
                action,
            });
        }
        // 3. Default fallback
        let action =
            decode_action(&self.default_response).map_err(|e| SearchError::Predictor(e.into()))?;
        Ok(Prediction {
            distribution: self.default_response.clone(),
            action,
        })
    }

    fn encode(&self, action: Action) -> Vec<f64> {
        encode_action(action)
    }

    fn update(&mut self, token: Token, action: Action) -> Result<(), SearchError> {
        self.updates.push((token, action));
        Ok(())
    }
}
