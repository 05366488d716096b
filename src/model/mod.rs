//! The rating pipeline: match construction, outcome policies, the Elo
//! simulation engine, calibration metrics and report tables.

pub mod constants;
pub mod elo_model;
pub mod leaderboard;
pub mod match_builder;
pub mod metrics;
pub mod outcome;
pub mod structures;
