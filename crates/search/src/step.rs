use nested::{Action, Token, TreeBuilder};

/// One consumed token and the decision taken for it.
///
/// `snapshot` is the output builder as it stood *before* `action` was
/// applied, so a fork can rewind to this point without replaying the prefix.
#[derive(Debug, Clone)]
pub struct ExecutionStep {
    pub token: Token,
    pub snapshot: TreeBuilder,
    /// Predictor output, one probability per action.
    pub distribution: Vec<f64>,
    pub action: Action,
    /// Shannon entropy of `distribution` in nats.
    pub entropy: f64,
}

impl ExecutionStep {
    pub fn new(token: Token, snapshot: TreeBuilder, distribution: Vec<f64>, action: Action) -> Self {
        let entropy = entropy(&distribution);
        Self {
            token,
            snapshot,
            distribution,
            action,
            entropy,
        }
    }

    /// Probability the predictor assigned to the action that was taken.
    pub fn taken_probability(&self) -> f64 {
        self.distribution
            .get(self.action.index())
            .copied()
            .unwrap_or(0.0)
    }
}

/// Shannon entropy (natural log) of a distribution.
///
/// The input is normalised to sum to 1 first. Zero entries contribute
/// nothing; an all-zero or empty input has entropy 0.
pub fn entropy(distribution: &[f64]) -> f64 {
    let total: f64 = distribution.iter().filter(|p| **p > 0.0).sum();
    if total <= 0.0 {
        return 0.0;
    }
    distribution
        .iter()
        .filter(|p| **p > 0.0)
        .map(|p| {
            let q = p / total;
            -q * q.ln()
        })
        .sum()
}
