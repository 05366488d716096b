use chrono::{DateTime, Duration, FixedOffset};
use strum::EnumCount;

use crate::model::structures::{match_pair::MatchPair, score_event::ScoreEvent, skillset::Skillset};

pub fn base_time() -> DateTime<FixedOffset> {
    "2023-01-01T00:00:00+00:00".parse().unwrap()
}

/// A score event `day` days after the base time, with the skill vector
/// peaked on the requested skillset.
pub fn generate_score_event(
    id: i64,
    player: &str,
    chart_key: &str,
    rate: f64,
    wife: f64,
    day: i64,
    skillset: Skillset
) -> ScoreEvent {
    let mut skills = [0.0; Skillset::COUNT];
    skills[skillset as usize] = 20.0;

    ScoreEvent {
        id,
        player: player.to_owned(),
        chart_key: chart_key.to_owned(),
        chart_id: 1,
        rate,
        wife,
        datetime: base_time() + Duration::days(day),
        skills,
        skillset
    }
}

/// A denormalized match with side A `gap_days` after side B.
#[allow(clippy::too_many_arguments)]
pub fn generate_match_pair(
    id_a: i64,
    id_b: i64,
    player_a: &str,
    player_b: &str,
    rate_a: f64,
    rate_b: f64,
    wife_a: f64,
    wife_b: f64,
    gap_days: i64
) -> MatchPair {
    MatchPair {
        id_a,
        id_b,
        player_a: player_a.to_owned(),
        player_b: player_b.to_owned(),
        rate_a,
        rate_b,
        wife_a,
        wife_b,
        datetime_a: base_time() + Duration::days(gap_days),
        datetime_b: base_time()
    }
}

/// The three-player regression fixture: on one chart, x posts rate 5 /
/// wife 97 at day 0 (first event, no match), y posts rate 6 / wife 95 at
/// day 1 (one match, y as A), x posts rate 7 / wife 90 at day 2 (one
/// match against y's best).
pub fn three_player_chart_matches() -> Vec<MatchPair> {
    vec![
        MatchPair {
            id_a: 2,
            id_b: 1,
            player_a: "y".to_owned(),
            player_b: "x".to_owned(),
            rate_a: 6.0,
            rate_b: 5.0,
            wife_a: 95.0,
            wife_b: 97.0,
            datetime_a: base_time() + Duration::days(1),
            datetime_b: base_time()
        },
        MatchPair {
            id_a: 3,
            id_b: 2,
            player_a: "x".to_owned(),
            player_b: "y".to_owned(),
            rate_a: 7.0,
            rate_b: 6.0,
            wife_a: 90.0,
            wife_b: 95.0,
            datetime_a: base_time() + Duration::days(2),
            datetime_b: base_time() + Duration::days(1)
        },
    ]
}
