use crate::commands::{records_by_selectors, CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::RecordSelector;
use crate::model::RecordPatch;
use crate::store::backend::StorageBackend;
use crate::store::RecordStore;

pub fn run<B: StorageBackend>(
    store: &mut RecordStore<B>,
    selector: &RecordSelector,
    patch: &RecordPatch,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if patch.is_empty() {
        result.add_message(CmdMessage::info("Nothing to update."));
        return Ok(result);
    }

    let target = records_by_selectors(store, std::slice::from_ref(selector))?;
    for dr in target {
        match store.update(&dr.record.id, patch)? {
            Some(record) => {
                result.add_message(CmdMessage::success(format!(
                    "Record updated ({}): {}",
                    dr.index,
                    record.display_title()
                )));
                result.affected_records.push(record);
            }
            None => result.add_message(CmdMessage::warning(format!(
                "Record {} no longer exists, nothing updated",
                dr.record.id
            ))),
        }
    }

    Ok(result)
}
