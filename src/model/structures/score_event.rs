use chrono::{DateTime, FixedOffset};
use strum::{EnumCount, IntoEnumIterator};

use crate::model::structures::skillset::Skillset;

/// One player's submission on one chart variant. Immutable once loaded;
/// the store adapter has already applied the wife% domain filter and
/// deduplicated by id.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEvent {
    pub id: i64,
    pub player: String,
    /// Identity of the specific chart + rate combination.
    pub chart_key: String,
    /// Identity of the underlying chart, independent of rate.
    pub chart_id: i64,
    pub rate: f64,
    pub wife: f64,
    pub datetime: DateTime<FixedOffset>,
    /// Per-skillset scores, indexed by `Skillset as usize`.
    pub skills: [f64; Skillset::COUNT],
    /// The skillset with the maximal value in `skills`.
    pub skillset: Skillset
}

impl ScoreEvent {
    /// The skillset holding the maximal skill value. Ties are broken by
    /// declaration order (earliest variant wins).
    pub fn dominant_skillset(skills: &[f64; Skillset::COUNT]) -> Skillset {
        let mut best = Skillset::Stream;
        for sk in Skillset::iter() {
            if skills[sk as usize] > skills[best as usize] {
                best = sk;
            }
        }
        best
    }

    pub fn skill_value(&self, skillset: Skillset) -> f64 {
        self.skills[skillset as usize]
    }
}

#[cfg(test)]
mod tests {
    use crate::model::structures::{score_event::ScoreEvent, skillset::Skillset};

    #[test]
    fn test_dominant_skillset() {
        let skills = [10.0, 12.0, 11.0, 9.0, 8.0];
        assert_eq!(ScoreEvent::dominant_skillset(&skills), Skillset::Jumpstream);
    }

    #[test]
    fn test_dominant_skillset_tie_prefers_declaration_order() {
        let skills = [12.0, 12.0, 12.0, 12.0, 12.0];
        assert_eq!(ScoreEvent::dominant_skillset(&skills), Skillset::Stream);

        let skills = [0.0, 7.5, 2.0, 7.5, 1.0];
        assert_eq!(ScoreEvent::dominant_skillset(&skills), Skillset::Jumpstream);
    }
}
