//! Trainable action predictor for the fork-search experiment.
//!
//! A one-hidden-layer feed-forward network maps a one-hot encoded token to a
//! softmax distribution over the three tree-building actions. It is trained
//! one example at a time with plain SGD on mean-squared error toward the
//! one-hot encoding of the target action.
//!
//! ```text
//! one_hot(token): (1, max_numerical_items + 2)
//!   → Linear(d_input→d_hidden) → sigmoid
//!   → Linear(d_hidden→3) → softmax
//!   → (1, 3)
//! ```

pub mod config;
pub mod encoding;
pub mod model;
pub mod predictor;

pub use config::NetworkConfig;
pub use encoding::{decode_action, encode_action, NetworkError, TokenEncoder};
pub use model::{ActionNetwork, ActionNetworkConfig};
pub use predictor::{build_sgd_predictor, ActionPredictor};
