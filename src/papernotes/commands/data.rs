//! Whole-database operations: export, import, backup, restore, purge.
//!
//! These return errors like every other command. Whether a failure is propagated or
//! only reported is decided one layer up, in the API facade.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::backend::StorageBackend;
use crate::store::RecordStore;

pub fn export<B: StorageBackend>(store: &RecordStore<B>) -> Result<CmdResult> {
    let text = store.export_snapshot()?;
    let mut result = CmdResult::default();
    result.snapshot = Some(text);
    Ok(result)
}

/// Replace the database with `text`. With `backup_first`, the current database is
/// copied to the backup slot before it is overwritten.
pub fn import<B: StorageBackend>(
    store: &mut RecordStore<B>,
    text: &str,
    backup_first: bool,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if backup_first {
        store.backup()?;
        result.add_message(CmdMessage::info("Backed up current database."));
    }
    store.import_snapshot(text)?;
    result.add_message(CmdMessage::success(format!(
        "Imported database ({} bytes).",
        text.len()
    )));
    Ok(result)
}

pub fn backup<B: StorageBackend>(store: &RecordStore<B>) -> Result<CmdResult> {
    let replaced = store.has_backup()?;
    store.backup()?;
    let mut result = CmdResult::default();
    if replaced {
        result.add_message(CmdMessage::success("Backup saved, previous backup replaced."));
    } else {
        result.add_message(CmdMessage::success("Backup saved."));
    }
    Ok(result)
}

pub fn restore<B: StorageBackend>(store: &mut RecordStore<B>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if store.restore_backup()? {
        result.add_message(CmdMessage::success("Database restored from backup."));
    } else {
        result.add_message(CmdMessage::warning("No backup to restore."));
    }
    Ok(result)
}

pub fn purge<B: StorageBackend>(store: &mut RecordStore<B>) -> Result<CmdResult> {
    let purged = store.purge()?;
    let mut result = CmdResult::default();
    if purged == 0 {
        result.add_message(CmdMessage::info("No records to purge."));
    } else {
        result.add_message(CmdMessage::success(format!("Purged {} records.", purged)));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::filter::RecordFilter;
    use crate::store::fixtures::StoreFixture;

    #[test]
    fn export_then_import_keeps_records() {
        let mut fixture = StoreFixture::new().with_papers(2);
        let before = fixture.store.find(&RecordFilter::all()).unwrap();

        let text = export(&fixture.store).unwrap().snapshot.unwrap();
        import(&mut fixture.store, &text, false).unwrap();

        assert_eq!(fixture.store.find(&RecordFilter::all()).unwrap(), before);
    }

    #[test]
    fn import_with_backup_first_keeps_old_database_restorable() {
        let mut fixture = StoreFixture::new().with_papers(3);
        let empty = StoreFixture::new();
        let empty_text = export(&empty.store).unwrap().snapshot.unwrap();

        let result = import(&mut fixture.store, &empty_text, true).unwrap();
        assert_eq!(result.messages.len(), 2);
        assert!(fixture.store.is_empty().unwrap());

        restore(&mut fixture.store).unwrap();
        assert_eq!(fixture.store.len().unwrap(), 3);
    }

    #[test]
    fn second_backup_says_it_replaced_the_first() {
        let fixture = StoreFixture::new().with_papers(1);
        let first = backup(&fixture.store).unwrap();
        assert_eq!(first.messages[0].content, "Backup saved.");

        let second = backup(&fixture.store).unwrap();
        assert_eq!(
            second.messages[0].content,
            "Backup saved, previous backup replaced."
        );
    }

    #[test]
    fn restore_without_backup_warns() {
        let mut fixture = StoreFixture::new().with_papers(1);
        let result = restore(&mut fixture.store).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Warning);
        assert_eq!(fixture.store.len().unwrap(), 1);
    }

    #[test]
    fn purge_reports_count_and_backup_survives() {
        let mut fixture = StoreFixture::new().with_papers(2);
        backup(&fixture.store).unwrap();

        let result = purge(&mut fixture.store).unwrap();
        assert_eq!(result.messages[0].content, "Purged 2 records.");
        assert!(fixture.store.is_empty().unwrap());

        restore(&mut fixture.store).unwrap();
        assert_eq!(fixture.store.len().unwrap(), 2);
    }

    #[test]
    fn purge_of_empty_store_is_informational() {
        let mut fixture = StoreFixture::new();
        let result = purge(&mut fixture.store).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Info);
    }
}
