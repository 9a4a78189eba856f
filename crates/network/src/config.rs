/// Network hyperparameters loaded from TOML.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NetworkConfig {
    /// Largest integer token + 1 the input layer can encode.
    #[serde(default = "default_max_numerical_items")]
    pub max_numerical_items: u32,

    /// Hidden layer width. Defaults to the input layer width.
    #[serde(default)]
    pub hidden_size: Option<usize>,

    /// SGD learning rate.
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,

    /// Weights are initialised uniformly in `[-init_scale, init_scale]`.
    #[serde(default = "default_init_scale")]
    pub init_scale: f64,
}

fn default_max_numerical_items() -> u32 {
    10
}
fn default_learning_rate() -> f64 {
    5.0
}
fn default_init_scale() -> f64 {
    0.05
}

impl NetworkConfig {
    /// Input layer width: one slot per integer plus the two delimiters.
    pub fn input_size(&self) -> usize {
        self.max_numerical_items as usize + 2
    }

    /// Hidden layer width after applying the default.
    pub fn hidden_size(&self) -> usize {
        self.hidden_size.unwrap_or_else(|| self.input_size())
    }

    /// Log a warning for values that will not train.
    pub fn validate(&self) {
        if self.learning_rate <= 0.0 {
            tracing::warn!(
                learning_rate = self.learning_rate,
                "learning_rate is not positive; fit() will not move the network"
            );
        }
        if self.hidden_size == Some(0) {
            tracing::warn!("hidden_size = 0; the network output will be constant");
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            max_numerical_items: default_max_numerical_items(),
            hidden_size: None,
            learning_rate: default_learning_rate(),
            init_scale: default_init_scale(),
        }
    }
}
