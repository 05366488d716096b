use std::io::Write;

use approx::assert_abs_diff_eq;
use etterna_elo::{
    model::{
        constants::{WIFE_MAX, WIFE_MIN},
        elo_model::{EloConfig, EloModel, HoldoutConfig},
        leaderboard::Leaderboard,
        match_builder::build_matches,
        structures::skillset::Skillset
    },
    store::score_store::load_scores
};
use indexmap::IndexMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const HEADER: &str = "id,player,chart_key,chart_id,rate,wife,datetime,stream,jumpstream,handstream,chordjacks,technical";

/// Three players sharing one stream chart: x posts rate 5 first (no
/// match), y posts rate 6 (one match), x improves to rate 7 (one match
/// against y's best). Outcomes are decided on rate alone.
fn three_player_table() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    writeln!(file, "1,x,c1,10,5.0,97.0,2023-01-01T00:00:00+00:00,20,0,0,0,0").unwrap();
    writeln!(file, "2,y,c1,10,6.0,96.5,2023-01-02T00:00:00+00:00,20,0,0,0,0").unwrap();
    writeln!(file, "3,x,c1,10,7.0,96.1,2023-01-03T00:00:00+00:00,20,0,0,0,0").unwrap();
    file
}

#[test]
fn test_csv_to_rating_table_end_to_end() {
    let table = three_player_table();
    let scores = load_scores(table.path(), (WIFE_MIN, WIFE_MAX)).unwrap();
    assert_eq!(scores.len(), 3);

    let matches = build_matches(&scores, Skillset::Stream);
    assert_eq!(matches.len(), 2);
    assert_eq!((matches[0].id_a, matches[0].id_b), (2, 1));
    assert_eq!((matches[1].id_a, matches[1].id_b), (3, 2));

    let mut model = EloModel::new(EloConfig::default().without_decay());
    let history = model.process_with_history(&matches, Skillset::Stream);

    // Batch 1 moves y to 1505 and x to 1495; batch 2 compares x's frozen
    // 1495 against y's 1505 and x wins on rate
    assert_abs_diff_eq!(model.state().rating("x"), 1500.1438, epsilon = 1e-3);
    assert_abs_diff_eq!(model.state().rating("y"), 1499.8561, epsilon = 1e-3);

    assert_eq!(history.len(), 2);
    assert_abs_diff_eq!(history[0].elo_before, 1500.0);
    assert_abs_diff_eq!(history[0].elo_after, 1505.0);
    assert_abs_diff_eq!(history[1].elo_before, 1495.0);

    let mut states = IndexMap::new();
    states.insert(Skillset::Stream, model.into_state());
    let board = Leaderboard::final_ratings(&states);

    assert_eq!(board.rows.len(), 2);
    assert_eq!(board.rows[0].player, "x");
    assert_eq!(board.rows[1].player, "y");

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("elo_skillsets.csv");
    board.write_csv(&csv_path).unwrap();
    let text = std::fs::read_to_string(&csv_path).unwrap();
    assert!(text.contains("x,500,1500,0,0,0,0"));
}

#[test]
fn test_csv_to_calibration_end_to_end() {
    let table = three_player_table();
    let scores = load_scores(table.path(), (WIFE_MIN, WIFE_MAX)).unwrap();
    let matches = build_matches(&scores, Skillset::Stream);

    let holdout = HoldoutConfig {
        fraction: 1.0,
        min_matches: 0
    };
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut model = EloModel::new(EloConfig::default().without_decay());
    let samples = model.evaluate(&matches, &holdout, &mut rng);

    // Every row withheld: probabilities stay at the baseline, both rows
    // are rate wins for side A
    assert_eq!(samples.len(), 2);
    assert_abs_diff_eq!(samples.probabilities[0], 0.5);
    assert_abs_diff_eq!(samples.probabilities[1], 0.5);
    assert_eq!(samples.outcomes, vec![1.0, 1.0]);
    assert_abs_diff_eq!(samples.brier_score().unwrap(), 0.25);
}
