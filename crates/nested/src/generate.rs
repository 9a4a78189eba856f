//! Random gold-standard instances.

use std::collections::HashSet;

use rand::Rng;
use serde::Deserialize;

use crate::tree::{NestedList, NodeId};
use crate::types::NestedError;

/// Draws allowed per requested corpus instance before giving up.
const DRAWS_PER_INSTANCE: usize = 1000;

/// Parameters for [`generate_random_instance`].
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Keep adding items until at least this many leaves exist.
    #[serde(default = "default_min_items")]
    pub min_items: u32,

    /// Never add items once this many leaves exist.
    #[serde(default = "default_max_items")]
    pub max_items: u32,

    /// Probability of adding another item once `min_items` is reached.
    #[serde(default = "default_p_continue")]
    pub p_continue: f64,

    /// Probability that an added item is a nested list rather than a leaf.
    #[serde(default = "default_p_new_list")]
    pub p_new_list: f64,
}

fn default_min_items() -> u32 {
    3
}
fn default_max_items() -> u32 {
    10
}
fn default_p_continue() -> f64 {
    0.6
}
fn default_p_new_list() -> f64 {
    0.3
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_items: default_min_items(),
            max_items: default_max_items(),
            p_continue: default_p_continue(),
            p_new_list: default_p_new_list(),
        }
    }
}

impl GeneratorConfig {
    /// Reject parameter combinations that cannot produce an instance.
    pub fn validate(&self) -> Result<(), NestedError> {
        if self.max_items == 0 {
            return Err(NestedError::InvalidConfig(
                "max_items must be at least 1".to_string(),
            ));
        }
        if self.min_items > self.max_items {
            return Err(NestedError::InvalidConfig(format!(
                "min_items ({}) exceeds max_items ({})",
                self.min_items, self.max_items
            )));
        }
        for (name, p) in [("p_continue", self.p_continue), ("p_new_list", self.p_new_list)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(NestedError::InvalidConfig(format!(
                    "{name} must be a probability, got {p}"
                )));
            }
        }
        Ok(())
    }
}

/// Build a random tree top-down.
///
/// Leaves are numbered `0, 1, 2, ...` in document order. Every list starts
/// with a leaf, so no list is ever empty, and the total leaf count lies in
/// `[min_items, max_items]` (at least one leaf is always produced).
pub fn generate_random_instance<R: Rng + ?Sized>(config: &GeneratorConfig, rng: &mut R) -> NestedList {
    let mut tree = NestedList::new();
    let mut next_item = 0;
    fill_list(&mut tree, NodeId::ROOT, config, &mut next_item, rng);
    tree
}

fn fill_list<R: Rng + ?Sized>(
    tree: &mut NestedList,
    list: NodeId,
    config: &GeneratorConfig,
    next_item: &mut u32,
    rng: &mut R,
) {
    tree.push_leaf(list, *next_item);
    *next_item += 1;

    while *next_item < config.min_items
        || (rng.gen::<f64>() <= config.p_continue && *next_item < config.max_items)
    {
        if rng.gen::<f64>() <= config.p_new_list {
            let child = tree.push_list(list);
            fill_list(tree, child, config, next_item, rng);
        } else {
            tree.push_leaf(list, *next_item);
            *next_item += 1;
        }
    }
}

/// Draw `size` distinct instances, in the order they were first generated.
pub fn generate_corpus<R: Rng + ?Sized>(
    size: usize,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<Vec<NestedList>, NestedError> {
    config.validate()?;

    let mut seen = HashSet::with_capacity(size);
    let mut corpus = Vec::with_capacity(size);
    let max_draws = size.saturating_mul(DRAWS_PER_INSTANCE);
    let mut draws = 0;

    while corpus.len() < size {
        if draws >= max_draws {
            return Err(NestedError::CorpusExhausted {
                requested: size,
                generated: corpus.len(),
            });
        }
        draws += 1;

        let instance = generate_random_instance(config, rng);
        if seen.insert(instance.clone()) {
            corpus.push(instance);
        }
    }

    tracing::debug!(size, draws, "Generated corpus");
    Ok(corpus)
}
