use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::PaperFields;
use crate::store::backend::StorageBackend;
use crate::store::RecordStore;

pub fn run<B: StorageBackend>(store: &mut RecordStore<B>, fields: PaperFields) -> Result<CmdResult> {
    let record = store.add(fields)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Record added: {}",
        record.display_title()
    )));
    Ok(result.with_affected_records(vec![record]))
}
