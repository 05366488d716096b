use clap::Parser;
use indexmap::IndexMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use strum::IntoEnumIterator;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use etterna_elo::{
    args::{Cli, Command, EvaluateArgs, RateArgs, TuneArgs},
    error::ProcessorError,
    model::{
        constants::{WIFE_MAX, WIFE_MIN},
        elo_model::{EloConfig, EloModel, RatingState},
        leaderboard::Leaderboard,
        match_builder::build_matches,
        metrics::CalibrationSamples,
        structures::{history_record::HistoryRecord, match_pair::MatchPair, skillset::Skillset}
    },
    store::{history::write_history, score_store::load_scores},
    utils::progress_utils::progress_bar
};

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cli.log_level))
        .init();

    let result = match cli.command {
        Command::Rate(args) => rate(args),
        Command::Evaluate(args) => evaluate(args),
        Command::Tune(args) => tune(args)
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}

/// Full apply-mode run: simulate every skillset, then write the rating,
/// peak and per-score history tables.
fn rate(args: RateArgs) -> Result<(), ProcessorError> {
    let scores = load_scores(&args.scores, (WIFE_MIN, WIFE_MAX))?;
    let config = args.sim.elo_config();

    std::fs::create_dir_all(&args.out_dir)?;

    let bar = progress_bar(Skillset::iter().count() as u64, "Simulating skillsets".to_string());
    let results: Vec<(Skillset, RatingState, Vec<HistoryRecord>)> = Skillset::iter()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|skillset| {
            let matches = build_matches(&scores, skillset);
            info!(%skillset, matches = matches.len(), "built matches");

            let mut model = EloModel::new(config.clone());
            let history = model.process_with_history(&matches, skillset);
            bar.inc(1);
            (skillset, model.into_state(), history)
        })
        .collect();
    bar.finish();

    let mut states = IndexMap::new();
    let mut history = Vec::new();
    for (skillset, state, records) in results {
        states.insert(skillset, state);
        history.extend(records);
    }

    let ratings = Leaderboard::final_ratings(&states);
    let peaks = Leaderboard::peak_ratings(&states);

    ratings.write_csv(&args.out_dir.join("elo_skillsets.csv"))?;
    ratings.write_markdown(&args.out_dir.join("elo_skillsets.md"))?;
    peaks.write_csv(&args.out_dir.join("elo_peaks.csv"))?;
    peaks.write_markdown(&args.out_dir.join("elo_peaks.md"))?;
    write_history(&args.out_dir.join("elo_by_score.csv"), &history)?;

    info!(
        players = ratings.rows.len(),
        history_rows = history.len(),
        out_dir = %args.out_dir.display(),
        "wrote rating tables"
    );
    Ok(())
}

/// Single-setting holdout evaluation, printed per skillset plus a
/// test-count-weighted overall row.
fn evaluate(args: EvaluateArgs) -> Result<(), ProcessorError> {
    let scores = load_scores(&args.scores, (WIFE_MIN, WIFE_MAX))?;
    let config = args.sim.elo_config();
    let holdout = args.holdout();

    let mut per_skillset: Vec<(Skillset, CalibrationSamples)> = Vec::new();
    for skillset in Skillset::iter() {
        let matches = build_matches(&scores, skillset);
        if matches.is_empty() {
            continue;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
        let mut model = EloModel::new(config.clone());
        let samples = model.evaluate(&matches, &holdout, &mut rng);
        if samples.is_empty() {
            info!(%skillset, "no test rows selected");
            continue;
        }
        per_skillset.push((skillset, samples));
    }

    if per_skillset.is_empty() {
        return Err(ProcessorError::NoTestRows);
    }

    println!(
        "{:<12} {:>8} {:>10} {:>10} {:>10}",
        "skillset", "n_test", "log_loss", "brier", "accuracy"
    );
    for (skillset, samples) in &per_skillset {
        println!(
            "{:<12} {:>8} {:>10} {:>10} {:>10}",
            skillset.to_string(),
            samples.len(),
            format_metric(samples.log_loss()),
            format_metric(samples.brier_score()),
            format_metric(samples.accuracy())
        );
    }

    let n_total: usize = per_skillset.iter().map(|(_, s)| s.len()).sum();
    println!(
        "{:<12} {:>8} {:>10} {:>10} {:>10}",
        "overall",
        n_total,
        format_metric(weighted_mean(
            per_skillset.iter().map(|(_, s)| (s.log_loss(), s.len()))
        )),
        format_metric(weighted_mean(
            per_skillset.iter().map(|(_, s)| (s.brier_score(), s.len()))
        )),
        format_metric(weighted_mean(
            per_skillset.iter().map(|(_, s)| (s.accuracy(), s.len()))
        ))
    );

    Ok(())
}

struct TuneResult {
    k: f64,
    tau: Option<f64>,
    log_loss: Option<f64>,
    brier: Option<f64>,
    n_test: usize
}

/// Grid search over K and the decay half-life, scored by holdout
/// log-loss weighted across skillsets.
fn tune(args: TuneArgs) -> Result<(), ProcessorError> {
    let scores = load_scores(&args.scores, (WIFE_MIN, WIFE_MAX))?;
    let holdout = args.holdout();

    // Match construction is parameter-independent, build once
    let matches_by_skillset: Vec<(Skillset, Vec<MatchPair>)> = Skillset::iter()
        .map(|skillset| (skillset, build_matches(&scores, skillset)))
        .filter(|(_, matches)| !matches.is_empty())
        .collect();

    let mut taus: Vec<Option<f64>> = args.tau_grid.iter().map(|t| Some(*t)).collect();
    if args.include_no_decay {
        taus.push(None);
    }

    let cells = args.k_grid.len() * taus.len();
    let bar = progress_bar(cells as u64, "Scoring parameter grid".to_string());

    let mut results: Vec<TuneResult> = Vec::new();
    for &k in &args.k_grid {
        for &tau in &taus {
            let config = EloConfig {
                rating_init: args.sim.rating_init,
                k_factor: k,
                tau_gap_days: tau,
                policy: args.sim.outcome_policy()
            };

            let mut per: Vec<(Option<f64>, Option<f64>, usize)> = Vec::new();
            for (_, matches) in &matches_by_skillset {
                let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
                let mut model = EloModel::new(config.clone());
                let samples = model.evaluate(matches, &holdout, &mut rng);
                if samples.is_empty() {
                    continue;
                }
                per.push((samples.log_loss(), samples.brier_score(), samples.len()));
            }

            let result = TuneResult {
                k,
                tau,
                log_loss: weighted_mean(per.iter().map(|(ll, _, n)| (*ll, *n))),
                brier: weighted_mean(per.iter().map(|(_, b, n)| (*b, *n))),
                n_test: per.iter().map(|(_, _, n)| n).sum()
            };
            println!(
                "K={:>4}, tau={:>5}  ->  log_loss={}  brier={}  (n={})",
                result.k,
                tau_label(result.tau),
                format_metric(result.log_loss),
                format_metric(result.brier),
                result.n_test
            );
            results.push(result);
            bar.inc(1);
        }
    }
    bar.finish();

    if results.iter().all(|r| r.n_test == 0) {
        return Err(ProcessorError::NoTestRows);
    }

    results.sort_by(|a, b| match (a.log_loss, b.log_loss) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal
    });
    let best = &results[0];

    println!("\n===== Best parameters (by log-loss) =====");
    println!(
        "K = {}, tau = {}  =>  log_loss = {}, brier = {}",
        best.k,
        tau_label(best.tau),
        format_metric(best.log_loss),
        format_metric(best.brier)
    );

    Ok(())
}

fn weighted_mean(values: impl Iterator<Item = (Option<f64>, usize)>) -> Option<f64> {
    let mut sum = 0.0;
    let mut total = 0usize;
    for (value, weight) in values {
        if let Some(v) = value {
            sum += v * weight as f64;
            total += weight;
        }
    }
    (total > 0).then(|| sum / total as f64)
}

fn format_metric(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.4}"),
        None => "n/a".to_string()
    }
}

fn tau_label(tau: Option<f64>) -> String {
    match tau {
        Some(t) => format!("{t:.0}"),
        None => "inf".to_string()
    }
}
