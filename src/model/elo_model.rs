use std::collections::HashMap;

use indexmap::IndexMap;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::model::{
    constants::{HOLDOUT_FRACTION, K_FACTOR, MIN_CAL_MATCHES, RATING_INIT, TAU_GAP_DAYS},
    metrics::CalibrationSamples,
    outcome::OutcomePolicy,
    structures::{
        history_record::HistoryRecord, match_pair::MatchPair, player_state::PlayerState, skillset::Skillset
    }
};

/// Simulation-time parameters. Nothing here is persisted; every run
/// replays the full match history from scratch.
#[derive(Debug, Clone, PartialEq)]
pub struct EloConfig {
    pub rating_init: f64,
    pub k_factor: f64,
    /// Decay half-life in days. None disables time decay.
    pub tau_gap_days: Option<f64>,
    pub policy: OutcomePolicy
}

impl Default for EloConfig {
    fn default() -> Self {
        EloConfig {
            rating_init: RATING_INIT,
            k_factor: K_FACTOR,
            tau_gap_days: Some(TAU_GAP_DAYS),
            policy: OutcomePolicy::default()
        }
    }
}

impl EloConfig {
    pub fn without_decay(mut self) -> EloConfig {
        self.tau_gap_days = None;
        self
    }

    /// Effective K for a match with the given timestamp gap. A disabled
    /// or infinite half-life bypasses the exponential entirely so that
    /// `k_eff == k_factor` holds exactly.
    pub fn k_eff(&self, gap_days: i64) -> f64 {
        match self.tau_gap_days {
            Some(tau) if tau.is_finite() => self.k_factor * (-(gap_days as f64) / tau).exp(),
            _ => self.k_factor
        }
    }
}

/// Evaluate-mode sampling parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldoutConfig {
    /// Probability that an eligible row is withheld as a test row.
    pub fraction: f64,
    /// Rows are eligible only once both players have seen at least this
    /// many prior matches in the skillset.
    pub min_matches: u32
}

impl Default for HoldoutConfig {
    fn default() -> Self {
        HoldoutConfig {
            fraction: HOLDOUT_FRACTION,
            min_matches: MIN_CAL_MATCHES
        }
    }
}

/// Per-skillset rating state. Exclusively owned by one simulation pass;
/// players are materialized lazily at the configured baseline, and plain
/// reads never mutate the map.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingState {
    players: HashMap<String, PlayerState>,
    rating_init: f64
}

impl RatingState {
    pub fn new(rating_init: f64) -> RatingState {
        RatingState {
            players: HashMap::new(),
            rating_init
        }
    }

    pub fn rating(&self, player: &str) -> f64 {
        self.players.get(player).map_or(self.rating_init, |p| p.rating)
    }

    pub fn peak(&self, player: &str) -> f64 {
        self.players.get(player).map_or(self.rating_init, |p| p.peak)
    }

    pub fn matches_seen(&self, player: &str) -> u32 {
        self.players.get(player).map_or(0, |p| p.matches_seen)
    }

    pub fn get(&self, player: &str) -> Option<&PlayerState> {
        self.players.get(player)
    }

    pub fn players(&self) -> impl Iterator<Item = (&str, &PlayerState)> {
        self.players.iter().map(|(name, state)| (name.as_str(), state))
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    fn entry(&mut self, player: &str) -> &mut PlayerState {
        if !self.players.contains_key(player) {
            self.players
                .insert(player.to_owned(), PlayerState::new(self.rating_init));
        }
        self.players.get_mut(player).expect("player was just inserted")
    }
}

enum PassMode<'r> {
    Apply {
        history: Option<(Skillset, &'r mut Vec<HistoryRecord>)>
    },
    Evaluate {
        holdout: &'r HoldoutConfig,
        rng: &'r mut ChaCha8Rng,
        samples: &'r mut CalibrationSamples
    }
}

/// Standard Elo expectation for side A.
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((rating_b - rating_a) / 400.0))
}

/// The rating simulation engine.
///
/// Matches are consumed in the builder's emitted order, grouped into
/// batches by shared `id_a` (in first-appearance order). Within a batch
/// the A side's rating is frozen at its pre-batch snapshot: every
/// expectation uses the snapshot, A's deltas accumulate, and the sum is
/// applied once after the batch. Opponents appear at most once per batch
/// and are updated immediately. This makes a batch's effect independent
/// of the order its opponents are enumerated in.
pub struct EloModel {
    config: EloConfig,
    state: RatingState
}

impl EloModel {
    pub fn new(config: EloConfig) -> EloModel {
        let state = RatingState::new(config.rating_init);
        EloModel { config, state }
    }

    /// Apply mode: every match updates rating state.
    pub fn process(&mut self, matches: &[MatchPair]) {
        self.run_pass(matches, PassMode::Apply { history: None });
    }

    /// Apply mode, additionally recording one history row per batch with
    /// the A side's pre- and post-batch rating.
    pub fn process_with_history(&mut self, matches: &[MatchPair], skillset: Skillset) -> Vec<HistoryRecord> {
        let mut records = Vec::new();
        self.run_pass(
            matches,
            PassMode::Apply {
                history: Some((skillset, &mut records))
            }
        );
        records
    }

    /// Evaluate mode: replays the same state machine, but rows that pass
    /// the eligibility gate and the seeded random draw are scored into the
    /// returned samples instead of mutating state. `matches_seen` is still
    /// counted for every row so eligibility reflects exposure regardless
    /// of the train/test split.
    pub fn evaluate(
        &mut self,
        matches: &[MatchPair],
        holdout: &HoldoutConfig,
        rng: &mut ChaCha8Rng
    ) -> CalibrationSamples {
        let mut samples = CalibrationSamples::new();
        self.run_pass(
            matches,
            PassMode::Evaluate {
                holdout,
                rng,
                samples: &mut samples
            }
        );
        samples
    }

    pub fn state(&self) -> &RatingState {
        &self.state
    }

    pub fn into_state(self) -> RatingState {
        self.state
    }

    fn run_pass(&mut self, matches: &[MatchPair], mut mode: PassMode) {
        // Batches keyed by id_a, in order of first appearance
        let mut batches: IndexMap<i64, Vec<usize>> = IndexMap::new();
        for (row, m) in matches.iter().enumerate() {
            batches.entry(m.id_a).or_default().push(row);
        }

        for rows in batches.values() {
            let lead = &matches[rows[0]];
            // Frozen for the entire batch
            let rating_a0 = self.state.rating(&lead.player_a);
            let mut delta_a_sum = 0.0;

            for &row in rows {
                let m = &matches[row];
                let rating_b = self.state.rating(&m.player_b);
                let exp_a = expected_score(rating_a0, rating_b);
                let outcome_a = self.config.policy.outcome(m.rate_a, m.rate_b, m.wife_a, m.wife_b);

                let is_test = match &mut mode {
                    PassMode::Apply { .. } => false,
                    PassMode::Evaluate { holdout, rng, samples } => {
                        let eligible = self.state.matches_seen(&m.player_a) >= holdout.min_matches
                            && self.state.matches_seen(&m.player_b) >= holdout.min_matches;
                        // One draw per eligible row, whether or not it selects
                        if eligible && rng.random::<f64>() < holdout.fraction {
                            samples.push(exp_a, outcome_a);
                            true
                        } else {
                            false
                        }
                    }
                };

                if !is_test {
                    let k_eff = self.config.k_eff(m.gap_days());

                    // A accumulates; applied once after the batch
                    delta_a_sum += k_eff * (outcome_a - exp_a);

                    // B appears at most once per batch, safe to update now
                    let outcome_b = 1.0 - outcome_a;
                    let exp_b = 1.0 - exp_a;
                    let player_b = self.state.entry(&m.player_b);
                    player_b.rating = rating_b + k_eff * (outcome_b - exp_b);
                    player_b.peak = player_b.peak.max(player_b.rating);
                }

                // Counted for every row, test or not: eligibility tracks
                // exposure, not rating-affecting participation
                self.state.entry(&m.player_a).matches_seen += 1;
                self.state.entry(&m.player_b).matches_seen += 1;
            }

            let player_a = self.state.entry(&lead.player_a);
            player_a.rating = rating_a0 + delta_a_sum;
            player_a.peak = player_a.peak.max(player_a.rating);

            if let PassMode::Apply {
                history: Some((skillset, records))
            } = &mut mode
            {
                records.push(HistoryRecord {
                    score_id: lead.id_a,
                    player: lead.player_a.clone(),
                    skillset: *skillset,
                    datetime: lead.datetime_a,
                    elo_before: rating_a0,
                    elo_after: rating_a0 + delta_a_sum
                });
            }
        }
    }
}
