use crate::commands::{CmdMessage, CmdResult};
use crate::csv::to_csv;
use crate::error::Result;
use crate::store::backend::StorageBackend;
use crate::store::RecordStore;

/// Build the CSV report from the database as currently persisted.
pub fn run<B: StorageBackend>(store: &RecordStore<B>) -> Result<CmdResult> {
    let csv = to_csv(&store.export_snapshot()?)?;
    let rows = csv.lines().count().saturating_sub(1);

    let mut result = CmdResult::default();
    if rows == 0 {
        result.add_message(CmdMessage::info("Report has no rows."));
    }
    result.report = Some(csv);
    Ok(result)
}
