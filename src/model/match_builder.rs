use std::collections::BTreeMap;

use indexmap::IndexMap;
use itertools::Itertools;
use tracing::debug;

use crate::model::structures::{match_pair::MatchPair, score_event::ScoreEvent, skillset::Skillset};

/// Builds the chronological match list for one skillset.
///
/// Per chart key, events are walked in time order while tracking every
/// player's current best rate. An event that improves its player's best
/// is compared against every other player's recorded best at that moment,
/// producing one match per opponent with the new best fixed as side A.
/// Ties in rate neither emit matches nor replace the recorded best.
///
/// The concatenated matches are sorted by the later of the two timestamps;
/// the sort is stable, so equal timestamps keep emission order. Charts
/// with fewer than two distinct players contribute nothing, and an empty
/// dataset yields an empty list rather than an error.
pub fn build_matches(scores: &[ScoreEvent], skillset: Skillset) -> Vec<MatchPair> {
    // BTreeMap keeps chart iteration order independent of input order
    let mut charts: BTreeMap<&str, Vec<&ScoreEvent>> = BTreeMap::new();
    for score in scores.iter().filter(|s| s.skillset == skillset) {
        charts.entry(score.chart_key.as_str()).or_default().push(score);
    }

    let mut matches = Vec::new();
    for (chart_key, mut events) in charts {
        let distinct_players = events.iter().map(|e| e.player.as_str()).unique().count();
        if distinct_players < 2 {
            continue;
        }

        // Stable, so same-timestamp events keep input order
        events.sort_by_key(|e| e.datetime);

        // player -> their current best event on this chart
        let mut best: IndexMap<&str, &ScoreEvent> = IndexMap::new();
        for event in events {
            let improved = match best.get(event.player.as_str()) {
                None => true,
                Some(prior) => event.rate > prior.rate
            };
            if !improved {
                continue;
            }

            for (opponent, opponent_best) in &best {
                if *opponent == event.player.as_str() {
                    continue;
                }
                matches.push(pair(event, opponent_best));
            }
            best.insert(event.player.as_str(), event);
        }

        debug!(chart_key, players = distinct_players, "paired chart");
    }

    matches.sort_by_key(|m| m.latest());
    matches
}

fn pair(a: &ScoreEvent, b: &ScoreEvent) -> MatchPair {
    MatchPair {
        id_a: a.id,
        id_b: b.id,
        player_a: a.player.clone(),
        player_b: b.player.clone(),
        rate_a: a.rate,
        rate_b: b.rate,
        wife_a: a.wife,
        wife_b: b.wife,
        datetime_a: a.datetime,
        datetime_b: b.datetime
    }
}
