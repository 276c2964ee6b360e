use crate::commands::{records_by_selectors, CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::RecordSelector;
use crate::store::backend::StorageBackend;
use crate::store::RecordStore;

pub fn run<B: StorageBackend>(
    store: &mut RecordStore<B>,
    selectors: &[RecordSelector],
) -> Result<CmdResult> {
    // Resolve everything up front: positions shift once the first record is gone
    let targets = records_by_selectors(store, selectors)?;

    let mut result = CmdResult::default();
    for dr in targets {
        if let Some(record) = store.remove(&dr.record.id)? {
            result.add_message(CmdMessage::success(format!(
                "Removed ({}): {}",
                dr.index,
                record.display_title()
            )));
            result.affected_records.push(record);
        }
    }

    if result.affected_records.is_empty() {
        result.add_message(CmdMessage::info("No records removed."));
    }
    Ok(result)
}
