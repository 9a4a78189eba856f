//! Nested bracket structures for the fork-search experiment.
//!
//! A [`NestedList`] is an ordered tree of integer leaves. It flattens into a
//! token stream (`[`, integers, `]`) that a predictor consumes one token at a
//! time, and it is rebuilt from a stream of [`Action`]s by a [`TreeBuilder`].
//! The [`score`] function compares a candidate tree against a gold tree using
//! set-based F1 over bracket spans and leaf values.
//!
//! # Key types
//!
//! - [`NestedList`]: arena-backed tree with parent links by index
//! - [`Token`] / [`Action`]: the input alphabet and the decision alphabet
//! - [`TreeBuilder`]: cursor-based action interpreter
//! - [`GeneratorConfig`]: parameters for random gold-standard instances

pub mod builder;
pub mod generate;
pub mod score;
pub mod tree;
pub mod types;

pub use builder::TreeBuilder;
pub use generate::{generate_corpus, generate_random_instance, GeneratorConfig};
pub use score::{f1_score, score, score_breakdown, ScoreBreakdown, F1};
pub use tree::{Bracket, Item, NestedList, NodeId, ParseNestedListError, Tokens, DEGENERATE_BRACKET};
pub use types::{Action, NestedError, Token};
