/// Fork search configuration loaded from TOML.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SearchConfig {
    /// Maximum number of forks tried per search before giving up.
    #[serde(default = "default_max_fork_attempts")]
    pub max_fork_attempts: u32,

    /// A fork is accepted only if it beats the original by more than this.
    #[serde(default)]
    pub min_improvement: f64,
}

fn default_max_fork_attempts() -> u32 {
    20
}

impl SearchConfig {
    /// Log a warning for values that make the search a no-op or unsatisfiable.
    pub fn validate(&self) {
        if self.max_fork_attempts == 0 {
            tracing::warn!("max_fork_attempts = 0; every search will be exhausted immediately");
        }
        if self.min_improvement < 0.0 {
            tracing::warn!(
                min_improvement = self.min_improvement,
                "negative min_improvement accepts forks that score worse than the original"
            );
        }
        if self.min_improvement >= 1.0 {
            tracing::warn!(
                min_improvement = self.min_improvement,
                "min_improvement >= 1.0; no fork can ever be accepted"
            );
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_fork_attempts: default_max_fork_attempts(),
            min_improvement: 0.0,
        }
    }
}
