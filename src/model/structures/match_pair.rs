use chrono::{DateTime, FixedOffset};

/// A directed pairwise comparison between two score events on the same
/// chart key. Side A is always the new personal best that triggered the
/// match; side B is another player's recorded best at that moment.
/// Invariant: `player_a != player_b`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchPair {
    pub id_a: i64,
    pub id_b: i64,
    pub player_a: String,
    pub player_b: String,
    pub rate_a: f64,
    pub rate_b: f64,
    pub wife_a: f64,
    pub wife_b: f64,
    pub datetime_a: DateTime<FixedOffset>,
    pub datetime_b: DateTime<FixedOffset>
}

impl MatchPair {
    /// The later of the two timestamps. Matches are globally ordered by
    /// this value (stable within equal values).
    pub fn latest(&self) -> DateTime<FixedOffset> {
        self.datetime_a.max(self.datetime_b)
    }

    /// Whole days between the two sides, always non-negative.
    pub fn gap_days(&self) -> i64 {
        self.datetime_a.signed_duration_since(self.datetime_b).num_days().abs()
    }
}
