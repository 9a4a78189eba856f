//! Training loop, corpus evaluation and the `corpus` subcommand.

use std::path::PathBuf;
use std::time::Instant;

use burn::backend::ndarray::NdArray;
use burn::backend::Autodiff;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use nested::{generate_corpus, GeneratorConfig, NestedList};
use network::build_sgd_predictor;
use search::{ForkSearch, NetworkPredictor, Predictor, Process, SearchError, SearchOutcome};

use crate::config::{build_train_config, TrainOverrides};
use crate::results::{EpochOutcome, EpochResult, TrainingReport};

/// Backend the action network trains on.
pub type TrainBackend = Autodiff<NdArray<f32>>;

/// Arguments for the `train` subcommand.
#[derive(Debug)]
pub struct TrainArgs {
    /// Path to the training config TOML file.
    pub config: Option<PathBuf>,
    /// CLI overrides for TOML values.
    pub overrides: TrainOverrides,
    /// Path to write the JSON training report.
    pub output: Option<PathBuf>,
}

/// Arguments for the `corpus` subcommand.
#[derive(Debug)]
pub struct CorpusArgs {
    /// Path to the training config TOML file (generator section).
    pub config: Option<PathBuf>,
    pub size: Option<usize>,
    pub seed: Option<u64>,
    /// Write a JSON array here instead of printing one tree per line.
    pub output: Option<PathBuf>,
}

/// Mean score of `predictor` over `corpus`, one full run per instance.
///
/// Returns 0.0 for an empty corpus.
pub fn evaluate_mean_score(
    predictor: &dyn Predictor,
    corpus: &[NestedList],
) -> Result<f64, SearchError> {
    if corpus.is_empty() {
        tracing::warn!("Evaluating on an empty corpus");
        return Ok(0.0);
    }
    let mut total = 0.0;
    for instance in corpus {
        let mut process = Process::new(predictor, instance.clone());
        process.run_to_completion()?;
        total += process.score();
    }
    Ok(total / corpus.len() as f64)
}

/// Run one epoch: a fresh random input, a full run, a fork search when the
/// run is imperfect, and one update on the forced step of an improving fork.
///
/// Errors are logged and reported as [`EpochOutcome::Failed`]; they never
/// abort training.
pub fn run_epoch<P: Predictor, R: Rng + ?Sized>(
    predictor: &mut P,
    search: &ForkSearch,
    generator: &GeneratorConfig,
    epoch: u32,
    rng: &mut R,
) -> EpochResult {
    let (mut result, example) = {
        let mut process = Process::with_random_input(&*predictor, generator, rng);
        let mut result = EpochResult {
            epoch,
            input: process.input().to_string(),
            score: 0.0,
            outcome: EpochOutcome::Failed,
            fork_attempts: 0,
            aborted_forks: 0,
            best_fork_score: None,
            trained_token: None,
            trained_action: None,
            error: None,
        };
        tracing::debug!(epoch, input = %process.input(), "Initial input");

        if let Err(e) = process.run_to_completion() {
            tracing::warn!(epoch, error = %e, "Run failed, skipping epoch");
            result.error = Some(e.to_string());
            return result;
        }
        let mut example = None;
        result.score = process.score();
        tracing::debug!(epoch, output = %process.output(), score = result.score, "Initial output");

        match search.run(&process, rng) {
            Ok((outcome, stats)) => {
                result.fork_attempts = stats.attempts;
                result.aborted_forks = stats.aborted;
                result.best_fork_score = stats.best_fork_score;
                result.outcome = match &outcome {
                    SearchOutcome::AlreadyOptimal => EpochOutcome::Perfect,
                    SearchOutcome::Improved { .. } => EpochOutcome::Improved,
                    SearchOutcome::Exhausted => EpochOutcome::Exhausted,
                };
                example = outcome.training_example();
            }
            Err(e) => {
                tracing::warn!(epoch, error = %e, "Fork search failed, skipping epoch");
                result.error = Some(e.to_string());
            }
        }
        (result, example)
    };

    // The process and any fork borrowed the predictor; both are gone now.
    if let Some((token, action)) = example {
        result.trained_token = Some(token.to_string());
        result.trained_action = Some(action);
        tracing::debug!(epoch, %token, %action, "Better variation found, fitting network");
        if let Err(e) = predictor.update(token, action) {
            tracing::warn!(epoch, error = %e, "Update failed");
            result.outcome = EpochOutcome::Failed;
            result.error = Some(e.to_string());
        }
    }
    result
}

/// Train for `epochs` epochs, reporting progress on a bar.
pub fn train_epochs<P: Predictor, R: Rng + ?Sized>(
    predictor: &mut P,
    search: &ForkSearch,
    generator: &GeneratorConfig,
    epochs: u32,
    rng: &mut R,
) -> anyhow::Result<Vec<EpochResult>> {
    let pb = ProgressBar::new(u64::from(epochs));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("=> "),
    );

    let mut results = Vec::with_capacity(epochs as usize);
    let mut improved = 0u32;
    for epoch in 0..epochs {
        let result = run_epoch(predictor, search, generator, epoch, rng);
        if result.outcome == EpochOutcome::Improved {
            improved += 1;
        }
        results.push(result);
        pb.set_message(format!("improved {improved}"));
        pb.inc(1);
    }
    pb.finish_with_message(format!("improved {improved}/{epochs}"));
    Ok(results)
}

/// Create the network, evaluate it, train it with fork search, evaluate again.
pub fn run_train(args: TrainArgs) -> anyhow::Result<TrainingReport> {
    let start = Instant::now();

    // 1. Load config
    let config = build_train_config(args.config.as_deref(), &args.overrides)?;
    let seed = config.training.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    tracing::info!(seed, epochs = config.training.epochs, "Starting training run");

    // 2. Create network
    tracing::info!("Creating network");
    let mut predictor = NetworkPredictor::new(build_sgd_predictor::<TrainBackend>(
        &config.network,
        Default::default(),
    ));

    // 3. Generate evaluation corpus
    tracing::info!(size = config.corpus.size, "Generating corpus");
    let corpus = generate_corpus(config.corpus.size, &config.generator, &mut rng)?;

    // 4. Evaluate untrained network
    let initial_mean_score = evaluate_mean_score(&predictor, &corpus)?;
    tracing::info!(mean_score = initial_mean_score, "Evaluated untrained network");

    // 5. Train
    let search = ForkSearch::new(config.search.clone());
    let per_epoch = train_epochs(
        &mut predictor,
        &search,
        &config.generator,
        config.training.epochs,
        &mut rng,
    )?;

    // 6. Evaluate trained network
    let final_mean_score = evaluate_mean_score(&predictor, &corpus)?;
    tracing::info!(
        mean_score = final_mean_score,
        last_loss = ?predictor.last_loss(),
        "Training complete"
    );

    let report = TrainingReport::summarize(
        seed,
        corpus.len(),
        initial_mean_score,
        final_mean_score,
        start.elapsed().as_secs_f64(),
        per_epoch,
    );

    // 7. Write report
    if let Some(ref path) = args.output {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)?;
        tracing::info!(path = %path.display(), "Wrote training report");
    }

    println!("\n--- Training Summary ---");
    println!("Seed: {seed}");
    println!("Epochs: {}", report.epochs);
    println!(
        "Improved: {}  Exhausted: {}  Perfect: {}  Failed: {}",
        report.improved, report.exhausted, report.perfect, report.failed
    );
    println!("Mean score: {initial_mean_score:.4} -> {final_mean_score:.4}");
    println!("Elapsed: {:.1}s", report.wall_time_secs);

    Ok(report)
}

/// Generate a corpus and print it, or write it as a JSON array of strings.
pub fn run_corpus(args: CorpusArgs) -> anyhow::Result<Vec<NestedList>> {
    let overrides = TrainOverrides {
        seed: args.seed,
        corpus_size: args.size,
        ..TrainOverrides::default()
    };
    let config = build_train_config(args.config.as_deref(), &overrides)?;
    let seed = config.training.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    let corpus = generate_corpus(config.corpus.size, &config.generator, &mut rng)?;
    tracing::info!(size = corpus.len(), seed, "Generated corpus");

    match args.output {
        Some(path) => {
            let lines: Vec<String> = corpus.iter().map(ToString::to_string).collect();
            std::fs::write(&path, serde_json::to_string_pretty(&lines)?)?;
            tracing::info!(path = %path.display(), "Wrote corpus");
        }
        None => {
            for tree in &corpus {
                println!("{tree}");
            }
        }
    }
    Ok(corpus)
}
