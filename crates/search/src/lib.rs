//! Stepwise execution and fork search over nested-list construction.
//!
//! A [`Process`] feeds the tokens of an input tree one at a time through a
//! [`Predictor`], applies each predicted action to an output tree, and records
//! a replayable [`ExecutionStep`] per token. Once complete, a process can be
//! forked: a prior step is chosen with probability proportional to its
//! entropy, a different action is forced there, and the fork is re-run to the
//! end. [`ForkSearch`] repeats this under an attempt budget until a fork
//! scores better than the original.
//!
//! The predictor is only borrowed by processes. Training updates are applied
//! by the caller between searches, never during one.
//!
//! # Key types
//!
//! - [`Predictor`]: trait for the decision model (`predict`, `encode`, `update`)
//! - [`Process`] / [`ExecutionStep`]: one run and its history
//! - [`Fork`]: a re-simulated branch and the index it was forced at
//! - [`ForkSearch`] / [`SearchOutcome`] / [`ForkStats`]: budgeted search driver
//! - [`SearchConfig`]: configuration loaded from TOML
//! - [`NetworkPredictor`]: adapter for the burn action network

pub mod adapters;
pub mod config;
pub mod engine;
pub mod fork;
pub mod mocks;
pub mod process;
pub mod step;

pub use adapters::NetworkPredictor;
pub use config::SearchConfig;
pub use engine::{ForkSearch, ForkStats, Prediction, Predictor, SearchError, SearchOutcome};
pub use fork::{select_alternative_action, select_branch_point, Fork};
pub use process::{Process, ProcessState};
pub use step::{entropy, ExecutionStep};
