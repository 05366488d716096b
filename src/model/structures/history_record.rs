use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::model::structures::skillset::Skillset;

/// One row of the per-score rating history: the rating of the batch's A
/// player before and after the whole batch was applied. Consumed by
/// downstream chart-difficulty estimation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRecord {
    pub score_id: i64,
    pub player: String,
    pub skillset: Skillset,
    pub datetime: DateTime<FixedOffset>,
    pub elo_before: f64,
    pub elo_after: f64
}
