//! Inference and single-example SGD updates for the action network.

use burn::module::AutodiffModule;
use burn::nn::loss::{MseLoss, Reduction};
use burn::optim::{GradientsParams, Optimizer, SgdConfig};
use burn::prelude::*;
use burn::tensor::backend::AutodiffBackend;

use nested::{Action, Token};

use crate::config::NetworkConfig;
use crate::encoding::{decode_action, encode_action, NetworkError, TokenEncoder};
use crate::model::{ActionNetwork, ActionNetworkConfig};

/// Action network paired with its optimizer.
///
/// `predict` is read-only and runs on a `valid()` copy of the model, so no
/// gradient tape is recorded; `fit` consumes the current module, replaces it
/// with the updated one and refreshes that copy.
pub struct ActionPredictor<B: AutodiffBackend, O> {
    model: ActionNetwork<B>,
    inference_model: ActionNetwork<B::InnerBackend>,
    optimizer: O,
    encoder: TokenEncoder,
    learning_rate: f64,
    device: B::Device,
}

/// Build a fresh network with a plain SGD optimizer from `config`.
pub fn build_sgd_predictor<B: AutodiffBackend>(
    config: &NetworkConfig,
    device: B::Device,
) -> ActionPredictor<B, impl Optimizer<ActionNetwork<B>, B>> {
    config.validate();
    let model = ActionNetworkConfig::new(config.input_size(), config.hidden_size())
        .with_num_actions(Action::COUNT)
        .with_init_scale(config.init_scale)
        .init::<B>(&device);
    tracing::debug!(
        d_input = config.input_size(),
        d_hidden = config.hidden_size(),
        lr = config.learning_rate,
        "Initialised action network"
    );
    ActionPredictor::new(
        model,
        SgdConfig::new().init::<B, ActionNetwork<B>>(),
        TokenEncoder::new(config.max_numerical_items),
        config.learning_rate,
        device,
    )
}

impl<B, O> ActionPredictor<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<ActionNetwork<B>, B>,
{
    pub fn new(
        model: ActionNetwork<B>,
        optimizer: O,
        encoder: TokenEncoder,
        learning_rate: f64,
        device: B::Device,
    ) -> Self {
        let inference_model = model.valid();
        Self {
            model,
            inference_model,
            optimizer,
            encoder,
            learning_rate,
            device,
        }
    }

    /// The token encoder feeding the input layer.
    pub fn encoder(&self) -> &TokenEncoder {
        &self.encoder
    }

    /// Output distribution for `token` and its arg-max action.
    pub fn predict(&self, token: Token) -> Result<(Vec<f64>, Action), NetworkError> {
        let input = Tensor::<B::InnerBackend, 2>::from_data(self.input_data(token)?, &self.device);
        let output = self.inference_model.forward(input);
        let distribution: Vec<f64> = output
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| NetworkError::TensorData(format!("{e:?}")))?
            .into_iter()
            .map(f64::from)
            .collect();
        let action = decode_action(&distribution)?;
        Ok((distribution, action))
    }

    /// One SGD step on mean-squared error toward `encode_action(action)`.
    ///
    /// Returns the loss before the update.
    pub fn fit(&mut self, token: Token, action: Action) -> Result<f64, NetworkError> {
        let input = Tensor::<B, 2>::from_data(self.input_data(token)?, &self.device);
        let target: Vec<f32> = encode_action(action).into_iter().map(|v| v as f32).collect();
        let target =
            Tensor::<B, 2>::from_data(TensorData::new(target, [1, Action::COUNT]), &self.device);

        let output = self.model.forward(input);
        let loss = MseLoss::new().forward(output, target, Reduction::Mean);
        let loss_value: f32 = loss.clone().into_scalar().elem();

        let grads = GradientsParams::from_grads(loss.backward(), &self.model);
        self.model = self
            .optimizer
            .step(self.learning_rate, self.model.clone(), grads);
        self.inference_model = self.model.valid();

        tracing::trace!(%token, %action, loss = loss_value, "Fitted action network");
        Ok(f64::from(loss_value))
    }

    fn input_data(&self, token: Token) -> Result<TensorData, NetworkError> {
        let encoded = self.encoder.encode(token)?;
        let width = encoded.len();
        Ok(TensorData::new(encoded, [1, width]))
    }
}
