//! Integration tests for the training pipeline.
//!
//! Mock tests drive the epoch loop with `MockPredictor`; the end-to-end tests
//! train a small burn network for a few epochs.

use rand::rngs::StdRng;
use rand::SeedableRng;

use nested::{generate_corpus, GeneratorConfig, NestedList, Token};
use search::mocks::MockPredictor;
use search::{ForkSearch, SearchConfig};
use trainer::{
    evaluate_mean_score, run_corpus, run_epoch, run_train, train_epochs, CorpusArgs, EpochOutcome,
    TrainArgs, TrainOverrides, TrainingReport,
};

fn corpus(seed: u64, size: usize) -> Vec<NestedList> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_corpus(size, &GeneratorConfig::default(), &mut rng).unwrap()
}

/// Opens and appends correctly but never closes a list.
fn never_closes() -> MockPredictor {
    let mut predictor = MockPredictor::with_default(vec![1.0, 0.0, 0.0]);
    predictor.add_response(Token::Open, vec![0.2, 0.6, 0.2]);
    predictor.add_response(Token::Close, vec![0.5, 0.2, 0.3]);
    predictor
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

#[test]
fn test_oracle_mean_score_is_one() {
    let predictor = MockPredictor::oracle(0.9);
    let score = evaluate_mean_score(&predictor, &corpus(1, 25)).unwrap();
    assert!((score - 1.0).abs() < 1e-12);
}

#[test]
fn test_mean_score_bounds_and_empty_corpus() {
    let predictor = MockPredictor::uniform();
    let score = evaluate_mean_score(&predictor, &corpus(2, 25)).unwrap();
    assert!((0.0..1.0).contains(&score));
    assert_eq!(evaluate_mean_score(&predictor, &[]).unwrap(), 0.0);
}

// ---------------------------------------------------------------------------
// Epoch loop
// ---------------------------------------------------------------------------

#[test]
fn test_perfect_epoch_does_not_update() {
    let mut predictor = MockPredictor::oracle(0.9);
    let search = ForkSearch::new(SearchConfig::default());
    let mut rng = StdRng::seed_from_u64(3);
    let result = run_epoch(&mut predictor, &search, &GeneratorConfig::default(), 0, &mut rng);
    assert_eq!(result.outcome, EpochOutcome::Perfect);
    assert_eq!(result.score, 1.0);
    assert!(predictor.updates().is_empty());
}

#[test]
fn test_improved_epochs_update_predictor() {
    let mut predictor = never_closes();
    let search = ForkSearch::new(SearchConfig {
        max_fork_attempts: 50,
        min_improvement: 0.0,
    });
    let mut rng = StdRng::seed_from_u64(4);
    let results = train_epochs(
        &mut predictor,
        &search,
        &GeneratorConfig::default(),
        30,
        &mut rng,
    )
    .unwrap();

    assert_eq!(results.len(), 30);
    let improved: Vec<_> = results
        .iter()
        .filter(|r| r.outcome == EpochOutcome::Improved)
        .collect();
    assert_eq!(improved.len(), predictor.updates().len());
    for (r, (token, action)) in improved.iter().zip(predictor.updates()) {
        assert_eq!(r.trained_token.as_deref(), Some(token.to_string().as_str()));
        assert_eq!(r.trained_action, Some(*action));
        assert!(r.best_fork_score.unwrap() > r.score);
    }
}

#[test]
fn test_zero_entropy_epoch_is_failed_not_fatal() {
    let mut predictor = MockPredictor::with_default(vec![1.0, 0.0, 0.0]);
    let search = ForkSearch::new(SearchConfig::default());
    let config = GeneratorConfig {
        p_new_list: 1.0,
        min_items: 3,
        max_items: 3,
        ..GeneratorConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(5);
    let result = run_epoch(&mut predictor, &search, &config, 0, &mut rng);
    assert_eq!(result.outcome, EpochOutcome::Failed);
    assert!(result.error.unwrap().contains("entropy"));
    assert!(predictor.updates().is_empty());
}

// ---------------------------------------------------------------------------
// End to end
// ---------------------------------------------------------------------------

#[test]
fn test_run_train_writes_report() {
    let tmp = tempfile::TempDir::new().unwrap();
    let output = tmp.path().join("report.json");

    let report = run_train(TrainArgs {
        config: None,
        overrides: TrainOverrides {
            epochs: Some(5),
            seed: Some(42),
            corpus_size: Some(5),
            max_fork_attempts: Some(5),
            learning_rate: None,
        },
        output: Some(output.clone()),
    })
    .unwrap();

    assert_eq!(report.seed, 42);
    assert_eq!(report.epochs, 5);
    assert_eq!(report.corpus_size, 5);
    assert_eq!(
        report.improved + report.exhausted + report.perfect + report.failed,
        5
    );
    assert!((0.0..=1.0).contains(&report.initial_mean_score));
    assert!((0.0..=1.0).contains(&report.final_mean_score));

    let loaded: TrainingReport =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(loaded.per_epoch.len(), 5);
}

#[test]
fn test_run_corpus_writes_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    let output = tmp.path().join("corpus.json");

    let corpus = run_corpus(CorpusArgs {
        config: None,
        size: Some(12),
        seed: Some(9),
        output: Some(output.clone()),
    })
    .unwrap();
    assert_eq!(corpus.len(), 12);

    let lines: Vec<String> =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let parsed: Vec<NestedList> = lines.iter().map(|l| l.parse().unwrap()).collect();
    assert_eq!(parsed, corpus);
}
