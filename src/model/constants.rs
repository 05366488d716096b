// Simulation constants
pub const RATING_INIT: f64 = 1500.0;
pub const K_FACTOR: f64 = 10.0;
pub const TOLERANCE: f64 = 1e-3;
pub const TAU_GAP_DAYS: f64 = 365.0 * 2.0;
// Logistic outcome policy scales
pub const RATE_LOG_SCALE: f64 = 10.0;
pub const WIFE_DIFF_SCALE: f64 = 0.5;
// Score domain filter (exclusive on both ends)
pub const WIFE_MIN: f64 = 96.0;
pub const WIFE_MAX: f64 = 99.7;
// Calibration holdout defaults
pub const HOLDOUT_FRACTION: f64 = 0.05;
pub const TUNE_HOLDOUT_FRACTION: f64 = 0.1;
pub const MIN_CAL_MATCHES: u32 = 200;
pub const RNG_SEED: u64 = 1;
// Probability clamp for the log-loss computation
pub const PROB_EPSILON: f64 = 1e-15;
