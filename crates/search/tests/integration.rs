//! Integration tests for processes and forks using `MockPredictor`.
//!
//! These exercise the full run → fork → resume → compare cycle over randomly
//! generated inputs. No network is needed.

use rand::rngs::StdRng;
use rand::SeedableRng;

use nested::{generate_corpus, Action, GeneratorConfig, NestedList, Token};
use search::mocks::MockPredictor;
use search::{ForkSearch, Predictor, Process, SearchConfig, SearchError, SearchOutcome};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn corpus(seed: u64, size: usize) -> Vec<NestedList> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_corpus(size, &GeneratorConfig::default(), &mut rng).unwrap()
}

fn completed<'p>(predictor: &'p dyn Predictor, input: NestedList) -> Process<'p> {
    let mut process = Process::new(predictor, input);
    process.run_to_completion().unwrap();
    process
}

// ---------------------------------------------------------------------------
// Fork shape
// ---------------------------------------------------------------------------

#[test]
fn test_fork_length_invariants() {
    let predictor = MockPredictor::uniform();
    for input in corpus(1, 20) {
        let original = completed(&predictor, input);
        let n = original.history().len();
        for k in 0..n {
            let mut fork = original.fork_at(k, Action::OpenChild).unwrap();
            assert_eq!(fork.history().len(), k + 1);
            fork.run_to_completion().unwrap();
            assert_eq!(fork.history().len(), n);
            assert_eq!(fork.tokens(), original.tokens());
        }
    }
}

#[test]
fn test_fork_shares_prefix_with_original() {
    let predictor = MockPredictor::oracle(0.7);
    let input: NestedList = "[0, [1, [2, 3]], 4]".parse().unwrap();
    let original = completed(&predictor, input);
    let mut rng = StdRng::seed_from_u64(21);
    let fork = original.random_fork(&mut rng).unwrap();

    let k = fork.branch_index;
    for (a, b) in original.history()[..k].iter().zip(&fork.process.history()[..k]) {
        assert_eq!(a.token, b.token);
        assert_eq!(a.action, b.action);
        assert_eq!(a.snapshot, b.snapshot);
    }
    assert_eq!(fork.forced_step().snapshot, original.history()[k].snapshot);
    assert_ne!(fork.forced_step().action, original.history()[k].action);
}

#[test]
fn test_forks_of_perfect_run_diverge() {
    let predictor = MockPredictor::oracle(0.5);
    let original = completed(&predictor, "[0, [1, 2], 3]".parse().unwrap());
    assert_eq!(original.score(), 1.0);
    let mut rng = StdRng::seed_from_u64(8);
    for _ in 0..30 {
        let fork = original.random_fork(&mut rng).unwrap();
        // Leaves and lists are never removed, so a diverted step stays visible
        // in the final builder state.
        assert_ne!(fork.process.builder(), original.builder());
        match fork.forced_step().token {
            Token::Num(_) => {
                assert_eq!(
                    fork.process.output().leaf_count(),
                    original.output().leaf_count() - 1
                );
                assert!(fork.process.score() < 1.0);
            }
            Token::Open => assert_eq!(
                fork.process.output().num_lists(),
                original.output().num_lists() - 1
            ),
            Token::Close => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn test_same_seed_same_fork() {
    let predictor = MockPredictor::uniform();
    for input in corpus(2, 10) {
        let original = completed(&predictor, input);
        let mut rng_a = StdRng::seed_from_u64(1234);
        let mut rng_b = StdRng::seed_from_u64(1234);
        for _ in 0..5 {
            let a = original.random_fork(&mut rng_a).unwrap();
            let b = original.random_fork(&mut rng_b).unwrap();
            assert_eq!(a.branch_index, b.branch_index);
            assert_eq!(a.forced_step().action, b.forced_step().action);
            assert_eq!(a.process.output(), b.process.output());
            assert_eq!(a.process.score(), b.process.score());
        }
    }
}

#[test]
fn test_same_seed_same_search_outcome() {
    let predictor = MockPredictor::uniform();
    let original = completed(&predictor, "[0, [1, 2], [3, [4]]]".parse().unwrap());
    let search = ForkSearch::new(SearchConfig::default());

    let mut rng_a = StdRng::seed_from_u64(77);
    let mut rng_b = StdRng::seed_from_u64(77);
    let (outcome_a, stats_a) = search.run(&original, &mut rng_a).unwrap();
    let (outcome_b, stats_b) = search.run(&original, &mut rng_b).unwrap();
    assert_eq!(stats_a, stats_b);
    assert_eq!(outcome_a.training_example(), outcome_b.training_example());
}

// ---------------------------------------------------------------------------
// Failure modes
// ---------------------------------------------------------------------------

#[test]
fn test_zero_entropy_history_is_an_error() {
    let predictor = MockPredictor::with_default(vec![0.0, 0.0, 1.0]);
    let original = completed(&predictor, "[0, 1]".parse().unwrap());
    let mut rng = StdRng::seed_from_u64(0);
    assert!(matches!(
        original.random_fork(&mut rng),
        Err(SearchError::ZeroEntropy)
    ));
}

#[test]
fn test_saturated_step_is_an_error() {
    let predictor = MockPredictor::with_default(vec![1.0, 0.0, 0.0]);
    let original = completed(&predictor, "[0, 1]".parse().unwrap());
    let mut rng = StdRng::seed_from_u64(0);
    let err = search::select_alternative_action(&original.history()[1], 1, &mut rng).unwrap_err();
    assert!(matches!(
        err,
        SearchError::SaturatedDistribution {
            step: 1,
            action: Action::AppendLeaf
        }
    ));
    assert!(err.to_string().contains("step 1"));
}

// ---------------------------------------------------------------------------
// Training loop shape
// ---------------------------------------------------------------------------

#[test]
fn test_oracle_run_scores_one_on_corpus() {
    let predictor = MockPredictor::oracle(0.8);
    for input in corpus(3, 30) {
        let process = completed(&predictor, input);
        assert_eq!(process.score(), 1.0, "{}", process.input());
    }
}

#[test]
fn test_improvement_feeds_update_after_borrow_ends() {
    // Never closes a list, so most nested inputs score below 1.
    let mut predictor = MockPredictor::with_default(vec![1.0, 0.0, 0.0]);
    predictor.add_response(Token::Open, vec![0.2, 0.6, 0.2]);
    predictor.add_response(Token::Close, vec![0.5, 0.2, 0.3]);

    let search = ForkSearch::new(SearchConfig {
        max_fork_attempts: 100,
        min_improvement: 0.0,
    });
    let mut rng = StdRng::seed_from_u64(5);

    let example = {
        let original = completed(&predictor, "[0, [1, 2], 3]".parse().unwrap());
        let (outcome, _) = search.run(&original, &mut rng).unwrap();
        assert!(matches!(outcome, SearchOutcome::Improved { .. }));
        outcome.training_example()
    };

    let (token, action) = example.unwrap();
    predictor.update(token, action).unwrap();
    assert_eq!(predictor.updates(), &[(token, action)]);
}
