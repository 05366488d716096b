use std::path::Path;

use crate::{error::ProcessorError, model::structures::history_record::HistoryRecord};

/// Writes the per-score rating history as CSV, one row per (score id,
/// skillset) batch processed in apply mode.
pub fn write_history(path: &Path, records: &[HistoryRecord]) -> Result<(), ProcessorError> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
