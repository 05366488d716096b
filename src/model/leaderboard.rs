use std::{cmp::Ordering, collections::BTreeSet, fs, path::Path};

use indexmap::IndexMap;
use strum::{EnumCount, IntoEnumIterator};

use crate::{
    error::ProcessorError,
    model::{
        elo_model::RatingState,
        structures::{player_state::PlayerState, skillset::Skillset}
    }
};

/// One table row: a player's value per skillset plus the overall
/// aggregate. Skillsets the player never appeared in contribute 0.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardRow {
    pub player: String,
    /// Mean of the player's top three per-skillset values.
    pub overall: f64,
    pub values: [f64; Skillset::COUNT]
}

/// A rating or peak table over all skillsets, sorted by overall
/// descending.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaderboard {
    pub rows: Vec<LeaderboardRow>
}

impl Leaderboard {
    pub fn final_ratings(states: &IndexMap<Skillset, RatingState>) -> Leaderboard {
        Self::build(states, |p| p.rating)
    }

    pub fn peak_ratings(states: &IndexMap<Skillset, RatingState>) -> Leaderboard {
        Self::build(states, |p| p.peak)
    }

    fn build(states: &IndexMap<Skillset, RatingState>, value: impl Fn(&PlayerState) -> f64) -> Leaderboard {
        let mut players: BTreeSet<&str> = BTreeSet::new();
        for state in states.values() {
            players.extend(state.players().map(|(name, _)| name));
        }

        let mut rows: Vec<LeaderboardRow> = players
            .into_iter()
            .map(|player| {
                let mut values = [0.0; Skillset::COUNT];
                for (skillset, state) in states {
                    values[*skillset as usize] = state.get(player).map(&value).unwrap_or(0.0);
                }
                LeaderboardRow {
                    player: player.to_owned(),
                    overall: top_three_mean(&values),
                    values
                }
            })
            .collect();

        rows.sort_by(|a, b| {
            b.overall
                .partial_cmp(&a.overall)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.player.cmp(&b.player))
        });

        Leaderboard { rows }
    }

    /// Writes the table as CSV with values rounded to integers for
    /// display, matching the Markdown writer.
    pub fn write_csv(&self, path: &Path) -> Result<(), ProcessorError> {
        let mut writer = csv::Writer::from_path(path)?;

        let mut header = vec!["player".to_owned(), "overall".to_owned()];
        header.extend(Skillset::iter().map(|s| s.to_string()));
        writer.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![row.player.clone(), rounded(row.overall)];
            record.extend(row.values.iter().map(|v| rounded(*v)));
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Writes the table as a pipe-delimited Markdown table.
    pub fn write_markdown(&self, path: &Path) -> Result<(), ProcessorError> {
        let mut out = String::new();

        out.push_str("| player | overall |");
        for skillset in Skillset::iter() {
            out.push_str(&format!(" {skillset} |"));
        }
        out.push('\n');

        out.push_str("|---|---|");
        for _ in Skillset::iter() {
            out.push_str("---|");
        }
        out.push('\n');

        for row in &self.rows {
            out.push_str(&format!("| {} | {} |", row.player, rounded(row.overall)));
            for v in &row.values {
                out.push_str(&format!(" {} |", rounded(*v)));
            }
            out.push('\n');
        }

        fs::write(path, out)?;
        Ok(())
    }
}

fn top_three_mean(values: &[f64; Skillset::COUNT]) -> f64 {
    let mut sorted = *values;
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    (sorted[0] + sorted[1] + sorted[2]) / 3.0
}

fn rounded(v: f64) -> String {
    format!("{}", v.round() as i64)
}

#[cfg(test)]
mod tests {
    use crate::{
        model::{
            elo_model::{EloConfig, EloModel, RatingState},
            leaderboard::Leaderboard,
            structures::skillset::Skillset
        },
        utils::test_utils::generate_match_pair
    };
    use approx::assert_abs_diff_eq;
    use indexmap::IndexMap;

    fn simulated_state(winner: &str, loser: &str) -> RatingState {
        let matches = vec![generate_match_pair(1, 2, winner, loser, 1.2, 1.0, 97.0, 97.0, 0)];
        let mut model = EloModel::new(EloConfig::default().without_decay());
        model.process(&matches);
        model.into_state()
    }

    #[test]
    fn test_overall_is_mean_of_top_three() {
        let mut states = IndexMap::new();
        states.insert(Skillset::Stream, simulated_state("alice", "bob"));
        states.insert(Skillset::Jumpstream, simulated_state("alice", "bob"));
        states.insert(Skillset::Technical, simulated_state("alice", "bob"));

        let board = Leaderboard::final_ratings(&states);

        assert_eq!(board.rows[0].player, "alice");
        // alice holds 1505 in three skillsets and 0 elsewhere
        assert_abs_diff_eq!(board.rows[0].overall, 1505.0);
        assert_abs_diff_eq!(board.rows[1].overall, 1495.0);
    }

    #[test]
    fn test_absent_skillsets_contribute_zero() {
        let mut states = IndexMap::new();
        states.insert(Skillset::Stream, simulated_state("alice", "bob"));
        states.insert(Skillset::Chordjacks, simulated_state("carol", "dave"));

        let board = Leaderboard::final_ratings(&states);
        let alice = board.rows.iter().find(|r| r.player == "alice").unwrap();

        assert_abs_diff_eq!(alice.values[Skillset::Stream as usize], 1505.0);
        assert_abs_diff_eq!(alice.values[Skillset::Chordjacks as usize], 0.0);
        // top three of [1505, 0, 0, 0, 0]
        assert_abs_diff_eq!(alice.overall, 1505.0 / 3.0);
    }

    #[test]
    fn test_sorted_by_overall_descending() {
        let mut states = IndexMap::new();
        states.insert(Skillset::Stream, simulated_state("alice", "bob"));

        let board = Leaderboard::final_ratings(&states);

        assert_eq!(board.rows.len(), 2);
        assert!(board.rows[0].overall >= board.rows[1].overall);
    }

    #[test]
    fn test_peak_table_tracks_maximum_attained() {
        // bob loses then wins: final rating below his peak
        let matches = vec![
            generate_match_pair(1, 100, "bob", "alice", 1.2, 1.0, 97.0, 97.0, 0),
            generate_match_pair(2, 101, "alice", "bob", 1.4, 1.2, 97.0, 97.0, 0),
        ];
        let mut model = EloModel::new(EloConfig::default().without_decay());
        model.process(&matches);

        let mut states = IndexMap::new();
        states.insert(Skillset::Stream, model.into_state());

        let ratings = Leaderboard::final_ratings(&states);
        let peaks = Leaderboard::peak_ratings(&states);

        let bob_rating = ratings.rows.iter().find(|r| r.player == "bob").unwrap();
        let bob_peak = peaks.rows.iter().find(|r| r.player == "bob").unwrap();
        assert!(bob_peak.values[Skillset::Stream as usize] > bob_rating.values[Skillset::Stream as usize]);
    }

    #[test]
    fn test_write_csv_and_markdown() {
        let mut states = IndexMap::new();
        states.insert(Skillset::Stream, simulated_state("alice", "bob"));
        let board = Leaderboard::final_ratings(&states);

        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("elo.csv");
        let md_path = dir.path().join("elo.md");

        board.write_csv(&csv_path).unwrap();
        board.write_markdown(&md_path).unwrap();

        let csv_text = std::fs::read_to_string(&csv_path).unwrap();
        assert!(csv_text.starts_with("player,overall,stream,jumpstream,handstream,chordjacks,technical"));
        assert!(csv_text.contains("alice"));
        assert!(csv_text.contains("1505"));

        let md_text = std::fs::read_to_string(&md_path).unwrap();
        assert!(md_text.starts_with("| player | overall |"));
        assert!(md_text.contains("| alice |"));
    }
}
