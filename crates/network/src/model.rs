use burn::nn::{Initializer, Linear, LinearConfig};
use burn::prelude::*;
use burn::tensor::activation::{sigmoid, softmax};

/// Configuration for the [`ActionNetwork`] MLP.
#[derive(Config, Debug)]
pub struct ActionNetworkConfig {
    /// One-hot input width (`max_numerical_items + 2`).
    pub d_input: usize,
    /// Hidden layer width.
    pub d_hidden: usize,
    /// Output width, one per action.
    #[config(default = 3)]
    pub num_actions: usize,
    /// Weights are drawn uniformly from `[-init_scale, init_scale]`.
    #[config(default = 0.05)]
    pub init_scale: f64,
}

/// Sigmoid hidden layer followed by a softmax over actions.
#[derive(Module, Debug)]
pub struct ActionNetwork<B: Backend> {
    /// Input → hidden.
    hidden: Linear<B>,
    /// Hidden → action logits.
    output: Linear<B>,
}

impl ActionNetworkConfig {
    /// Initialize an ActionNetwork with the given configuration.
    pub fn init<B: Backend>(&self, device: &B::Device) -> ActionNetwork<B> {
        let initializer = Initializer::Uniform {
            min: -self.init_scale,
            max: self.init_scale,
        };
        ActionNetwork {
            hidden: LinearConfig::new(self.d_input, self.d_hidden)
                .with_initializer(initializer.clone())
                .init(device),
            output: LinearConfig::new(self.d_hidden, self.num_actions)
                .with_initializer(initializer)
                .init(device),
        }
    }
}

impl<B: Backend> ActionNetwork<B> {
    /// Forward pass.
    ///
    /// Input shape: `(batch, d_input)`
    /// Output shape: `(batch, num_actions)`, each row summing to 1.
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.hidden.forward(x);
        let x = sigmoid(x);
        let x = self.output.forward(x);
        softmax(x, 1)
    }
}
