use std::{collections::HashSet, path::Path};

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::Deserialize;
use tracing::info;

use crate::{
    error::ProcessorError,
    model::structures::score_event::ScoreEvent
};

/// Raw row shape of the scraped score table.
#[derive(Debug, Deserialize)]
struct RawScore {
    id: i64,
    player: String,
    chart_key: String,
    chart_id: i64,
    rate: f64,
    wife: f64,
    datetime: String,
    stream: f64,
    jumpstream: f64,
    handstream: f64,
    chordjacks: f64,
    technical: f64
}

/// Loads and pre-cleans the score table: validates rates, drops rows
/// outside the wife% band (exclusive on both ends), deduplicates the
/// surviving rows by id (first occurrence wins) and derives each row's
/// dominant skillset.
///
/// A table with no usable rows after cleaning is an input contract
/// violation, not a degenerate success.
pub fn load_scores(path: &Path, wife_range: (f64, f64)) -> Result<Vec<ScoreEvent>, ProcessorError> {
    let (wife_min, wife_max) = wife_range;
    let mut reader = csv::Reader::from_path(path)?;

    let mut seen_ids: HashSet<i64> = HashSet::new();
    let mut scores = Vec::new();
    for (index, record) in reader.deserialize::<RawScore>().enumerate() {
        // 1-based data row, accounting for the header
        let row = index as u64 + 2;
        let raw = record?;

        if raw.rate <= 0.0 {
            return Err(ProcessorError::InvalidScore {
                row,
                reason: format!("non-positive rate {}", raw.rate)
            });
        }
        let datetime = parse_datetime(&raw.datetime)
            .map_err(|reason| ProcessorError::InvalidScore { row, reason })?;

        if raw.wife <= wife_min || raw.wife >= wife_max {
            continue;
        }
        // Dedup only considers rows that survive the band filter
        if !seen_ids.insert(raw.id) {
            continue;
        }

        let skills = [raw.stream, raw.jumpstream, raw.handstream, raw.chordjacks, raw.technical];
        scores.push(ScoreEvent {
            id: raw.id,
            player: raw.player,
            chart_key: raw.chart_key,
            chart_id: raw.chart_id,
            rate: raw.rate,
            wife: raw.wife,
            datetime,
            skillset: ScoreEvent::dominant_skillset(&skills),
            skills
        });
    }

    if scores.is_empty() {
        return Err(ProcessorError::EmptyDataset { path: path.to_owned() });
    }

    info!(rows = scores.len(), path = %path.display(), "loaded score table");
    Ok(scores)
}

fn parse_datetime(raw: &str) -> Result<DateTime<FixedOffset>, String> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Ok(datetime);
    }
    // Scraper output predating the RFC 3339 switch carries naive UTC stamps
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }
    Err(format!("unparseable datetime '{raw}'"))
}
