//! Bridges between the search traits and the burn action network.

use burn::optim::Optimizer;
use burn::tensor::backend::AutodiffBackend;

use nested::{Action, Token};
use network::{encode_action, ActionNetwork, ActionPredictor};

use crate::engine::{Prediction, Predictor, SearchError};

// ---------------------------------------------------------------------------
// NetworkPredictor: Predictor for ActionPredictor
// ---------------------------------------------------------------------------

/// [`Predictor`] backed by a trainable [`ActionPredictor`].
///
/// `update` runs one SGD step and keeps the loss of the latest update for
/// reporting.
pub struct NetworkPredictor<B: AutodiffBackend, O> {
    inner: ActionPredictor<B, O>,
    last_loss: Option<f64>,
}

impl<B, O> NetworkPredictor<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<ActionNetwork<B>, B>,
{
    pub fn new(inner: ActionPredictor<B, O>) -> Self {
        Self {
            inner,
            last_loss: None,
        }
    }

    /// Loss before the most recent update, if any update has run.
    pub fn last_loss(&self) -> Option<f64> {
        self.last_loss
    }
}

impl<B, O> Predictor for NetworkPredictor<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<ActionNetwork<B>, B>,
{
    fn predict(&self, token: Token) -> Result<Prediction, SearchError> {
        let (distribution, action) = self
            .inner
            .predict(token)
            .map_err(|e| SearchError::Predictor(e.into()))?;
        Ok(Prediction {
            distribution,
            action,
        })
    }

    fn encode(&self, action: Action) -> Vec<f64> {
        encode_action(action)
    }

    fn update(&mut self, token: Token, action: Action) -> Result<(), SearchError> {
        let loss = self
            .inner
            .fit(token, action)
            .map_err(|e| SearchError::Predictor(e.into()))?;
        tracing::debug!(%token, %action, loss, "Updated network");
        self.last_loss = Some(loss);
        Ok(())
    }
}
