//! TOML config loading for the training CLI.
//!
//! Deserializes `configs/train.toml` which has `[corpus]`, `[generator]`,
//! `[network]`, `[search]` and `[training]` sections, then merges with CLI
//! overrides.

use std::path::Path;

use nested::GeneratorConfig;
use network::NetworkConfig;
use search::SearchConfig;
use serde::Deserialize;

/// Top-level structure matching `configs/train.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrainToml {
    #[serde(default)]
    pub corpus: CorpusSection,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub training: TrainingSection,
}

/// Evaluation corpus parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct CorpusSection {
    /// Number of distinct gold trees to evaluate on.
    #[serde(default = "default_corpus_size")]
    pub size: usize,
}

/// Training loop parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingSection {
    /// Number of random inputs to train on.
    #[serde(default = "default_epochs")]
    pub epochs: u32,
    /// RNG seed. A fresh one is drawn (and reported) when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_corpus_size() -> usize {
    100
}
fn default_epochs() -> u32 {
    1000
}

impl Default for CorpusSection {
    fn default() -> Self {
        Self {
            size: default_corpus_size(),
        }
    }
}

impl Default for TrainingSection {
    fn default() -> Self {
        Self {
            epochs: default_epochs(),
            seed: None,
        }
    }
}

/// CLI flags that take priority over TOML values.
#[derive(Debug, Clone, Default)]
pub struct TrainOverrides {
    pub epochs: Option<u32>,
    pub seed: Option<u64>,
    pub corpus_size: Option<usize>,
    pub max_fork_attempts: Option<u32>,
    pub learning_rate: Option<f64>,
}

/// Load and deserialize a `TrainToml` from a TOML file.
pub fn load_train_toml(path: &Path) -> anyhow::Result<TrainToml> {
    let contents = std::fs::read_to_string(path)?;
    let config: TrainToml = toml::from_str(&contents)?;
    tracing::info!(path = %path.display(), "Loaded training config");
    Ok(config)
}

/// Build the effective configuration.
///
/// Priority chain: built-in defaults < TOML values < CLI flags.
pub fn build_train_config(
    path: Option<&Path>,
    overrides: &TrainOverrides,
) -> anyhow::Result<TrainToml> {
    let mut config = match path {
        Some(path) => load_train_toml(path)?,
        None => TrainToml::default(),
    };

    if let Some(n) = overrides.epochs {
        config.training.epochs = n;
    }
    if let Some(seed) = overrides.seed {
        config.training.seed = Some(seed);
    }
    if let Some(n) = overrides.corpus_size {
        config.corpus.size = n;
    }
    if let Some(n) = overrides.max_fork_attempts {
        config.search.max_fork_attempts = n;
    }
    if let Some(lr) = overrides.learning_rate {
        config.network.learning_rate = lr;
    }

    config.validate()?;
    Ok(config)
}

impl TrainToml {
    /// Reject combinations that cannot run.
    ///
    /// Every generated leaf must be encodable by the network input layer.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.generator.validate()?;
        if self.generator.max_items > self.network.max_numerical_items {
            anyhow::bail!(
                "generator.max_items ({}) exceeds network.max_numerical_items ({}); \
                 generated leaves could not be encoded",
                self.generator.max_items,
                self.network.max_numerical_items
            );
        }
        Ok(())
    }
}
