use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::model::{
    constants,
    elo_model::{EloConfig, HoldoutConfig},
    outcome::OutcomePolicy
};

#[derive(Parser, Clone)]
#[command(
    name = "etterna-elo",
    display_name = "Etterna Elo Processor",
    about = "Computes per-skillset Elo ratings from Etterna score history",
    long_about = "Builds personal-best matches from submitted scores and computes per-skillset \
        Elo ratings, peak ratings and a per-score rating history, with holdout tooling for \
        calibrating the K-factor and time-decay half-life."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        env = "RUST_LOG",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        help = "Sets the logging verbosity"
    )]
    pub log_level: String
}

#[derive(Subcommand, Clone)]
pub enum Command {
    /// Compute rating, peak and per-score history tables for all skillsets
    Rate(RateArgs),
    /// Measure calibration with a random holdout at one parameter setting
    Evaluate(EvaluateArgs),
    /// Grid-search the K-factor and decay half-life against holdout log-loss
    Tune(TuneArgs)
}

/// Simulation parameters shared by every subcommand.
#[derive(clap::Args, Clone)]
pub struct SimArgs {
    /// Baseline rating for players with no prior matches
    #[arg(long, default_value_t = constants::RATING_INIT)]
    pub rating_init: f64,

    /// Elo K-factor
    #[arg(short, long, default_value_t = constants::K_FACTOR)]
    pub k_factor: f64,

    /// Time-decay half-life in days
    #[arg(long, default_value_t = constants::TAU_GAP_DAYS)]
    pub tau_gap_days: f64,

    /// Disable time decay entirely
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub no_decay: bool,

    /// Outcome policy used to resolve matches
    #[arg(long, value_enum, default_value_t = PolicyArg::Ranked)]
    pub policy: PolicyArg,

    /// Equality tolerance for the ranked policy
    #[arg(long, default_value_t = constants::TOLERANCE)]
    pub tolerance: f64,

    /// Rate-log weight for the logistic policy
    #[arg(long, default_value_t = constants::RATE_LOG_SCALE)]
    pub rate_scale: f64,

    /// Wife-difference weight for the logistic policy
    #[arg(long, default_value_t = constants::WIFE_DIFF_SCALE)]
    pub wife_scale: f64
}

impl SimArgs {
    pub fn elo_config(&self) -> EloConfig {
        EloConfig {
            rating_init: self.rating_init,
            k_factor: self.k_factor,
            tau_gap_days: (!self.no_decay).then_some(self.tau_gap_days),
            policy: self.outcome_policy()
        }
    }

    pub fn outcome_policy(&self) -> OutcomePolicy {
        match self.policy {
            PolicyArg::Ranked => OutcomePolicy::Ranked {
                tolerance: self.tolerance
            },
            PolicyArg::Logistic => OutcomePolicy::Logistic {
                rate_scale: self.rate_scale,
                wife_scale: self.wife_scale
            }
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyArg {
    Ranked,
    Logistic
}

#[derive(clap::Args, Clone)]
pub struct RateArgs {
    /// CSV score table produced by the score scraper
    #[arg(short, long)]
    pub scores: PathBuf,

    /// Directory the rating, peak and history tables are written to
    #[arg(short, long, default_value = "output")]
    pub out_dir: PathBuf,

    #[command(flatten)]
    pub sim: SimArgs
}

#[derive(clap::Args, Clone)]
pub struct EvaluateArgs {
    /// CSV score table produced by the score scraper
    #[arg(short, long)]
    pub scores: PathBuf,

    #[command(flatten)]
    pub sim: SimArgs,

    /// Fraction of eligible rows withheld as test rows
    #[arg(long, default_value_t = constants::HOLDOUT_FRACTION)]
    pub fraction: f64,

    /// Minimum prior matches before a player's rows become eligible
    #[arg(long, default_value_t = constants::MIN_CAL_MATCHES)]
    pub min_matches: u32,

    /// RNG seed for the holdout draw
    #[arg(long, default_value_t = constants::RNG_SEED)]
    pub seed: u64
}

impl EvaluateArgs {
    pub fn holdout(&self) -> HoldoutConfig {
        HoldoutConfig {
            fraction: self.fraction,
            min_matches: self.min_matches
        }
    }
}

#[derive(clap::Args, Clone)]
pub struct TuneArgs {
    /// CSV score table produced by the score scraper
    #[arg(short, long)]
    pub scores: PathBuf,

    #[command(flatten)]
    pub sim: SimArgs,

    /// K-factor values to sweep
    #[arg(long, value_delimiter = ',', default_values_t = vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0])]
    pub k_grid: Vec<f64>,

    /// Decay half-life values (days) to sweep
    #[arg(long, value_delimiter = ',', default_values_t = vec![365.0])]
    pub tau_grid: Vec<f64>,

    /// Also score every K with decay disabled
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub include_no_decay: bool,

    /// Fraction of eligible rows withheld as test rows
    #[arg(long, default_value_t = constants::TUNE_HOLDOUT_FRACTION)]
    pub fraction: f64,

    /// Minimum prior matches before a player's rows become eligible
    #[arg(long, default_value_t = constants::MIN_CAL_MATCHES)]
    pub min_matches: u32,

    /// RNG seed for the holdout draw
    #[arg(long, default_value_t = constants::RNG_SEED)]
    pub seed: u64
}

impl TuneArgs {
    pub fn holdout(&self) -> HoldoutConfig {
        HoldoutConfig {
            fraction: self.fraction,
            min_matches: self.min_matches
        }
    }
}
