use super::backend::StorageBackend;
use crate::error::{PapersError, Result};
use crate::filter::RecordFilter;
use crate::model::{PaperFields, Record, RecordPatch};
use crate::snapshot::Snapshot;
use chrono::Utc;
use std::cell::{RefCell, RefMut};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Key of the primary database blob.
pub const PRIMARY_KEY: &str = "papers.db";
/// Key of the backup slot.
pub const BACKUP_KEY: &str = "papers.db.backup";

pub struct RecordStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    /// Parsed primary blob. `None` until first access, and again after the
    /// blob was replaced wholesale (import, restore) and has not been re-read.
    cache: RefCell<Option<Snapshot>>,
}

impl<B: StorageBackend> RecordStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            cache: RefCell::new(None),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// False before first access and while an imported or restored blob has not been parsed yet.
    pub fn is_loaded(&self) -> bool {
        self.cache.borrow().is_some()
    }

    fn load(&self) -> Result<Snapshot> {
        match self.backend.get(PRIMARY_KEY)? {
            Some(text) => {
                let mut snapshot = Snapshot::parse(&text)?;
                snapshot.ensure_papers();
                debug!(records = snapshot.records().len(), "Loaded papers database");
                Ok(snapshot)
            }
            None => {
                debug!("No papers database yet, starting empty");
                Ok(Snapshot::empty())
            }
        }
    }

    fn snapshot(&self) -> Result<RefMut<'_, Snapshot>> {
        let mut cache = self.cache.borrow_mut();
        if cache.is_none() {
            *cache = Some(self.load()?);
        }
        Ok(RefMut::map(cache, |c| c.get_or_insert_with(Snapshot::empty)))
    }

    /// Run `f` against the live records and write the result through to the backend.
    /// A failed write drops the cache so the next access re-reads what was persisted.
    fn mutate<T>(&self, f: impl FnOnce(&mut Vec<Record>) -> T) -> Result<T> {
        let (out, text) = {
            let mut snapshot = self.snapshot()?;
            let out = f(snapshot.records_mut());
            (out, snapshot.to_text())
        };

        if let Err(e) = text.and_then(|text| self.backend.set(PRIMARY_KEY, &text)) {
            self.cache.replace(None);
            return Err(e);
        }
        Ok(out)
    }

    pub fn add(&mut self, fields: PaperFields) -> Result<Record> {
        let record = Record::new(fields);
        let stored = record.clone();
        self.mutate(|records| records.push(stored))?;
        debug!(id = %record.id, "Record added");
        Ok(record)
    }

    pub fn find(&self, filter: &RecordFilter) -> Result<Vec<Record>> {
        let snapshot = self.snapshot()?;
        let records = snapshot
            .records()
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        Ok(records)
    }

    pub fn find_by_id(&self, id: &Uuid) -> Result<Option<Record>> {
        let snapshot = self.snapshot()?;
        let found = snapshot.records().iter().find(|r| r.id == *id).cloned();
        Ok(found)
    }

    /// Merge `patch` over the record's fields. Returns `None`, writing nothing,
    /// when no record has this id.
    pub fn update(&mut self, id: &Uuid, patch: &RecordPatch) -> Result<Option<Record>> {
        if self.find_by_id(id)?.is_none() {
            warn!(%id, "Update skipped, no such record");
            return Ok(None);
        }

        let updated = self.mutate(|records| {
            records.iter_mut().find(|r| r.id == *id).map(|record| {
                patch.apply(&mut record.fields);
                record.updated_at = Some(Utc::now());
                record.clone()
            })
        })?;
        debug!(%id, "Record updated");
        Ok(updated)
    }

    /// Delete the record with this id. Returns the removed record, or `None`
    /// (writing nothing) if there was none.
    pub fn remove(&mut self, id: &Uuid) -> Result<Option<Record>> {
        if self.find_by_id(id)?.is_none() {
            debug!(%id, "Remove skipped, no such record");
            return Ok(None);
        }

        let removed = self.mutate(|records| {
            records
                .iter()
                .position(|r| r.id == *id)
                .map(|pos| records.remove(pos))
        })?;
        debug!(%id, "Record removed");
        Ok(removed)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.snapshot()?.records().len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// The primary blob exactly as the backend holds it.
    pub fn export_snapshot(&self) -> Result<String> {
        match self.backend.get(PRIMARY_KEY)? {
            Some(text) => Ok(text),
            None => Snapshot::empty().to_text(),
        }
    }

    /// Overwrite the primary blob with `text`, verbatim.
    ///
    /// Nothing is validated here: a malformed document is only reported when the
    /// store next loads, i.e. on the following read or write.
    pub fn import_snapshot(&mut self, text: &str) -> Result<()> {
        self.backend.set(PRIMARY_KEY, text)?;
        self.cache.replace(None);
        info!(bytes = text.len(), "Imported papers database");
        Ok(())
    }

    pub fn backup(&self) -> Result<()> {
        let text = self.export_snapshot()?;
        self.backend.set(BACKUP_KEY, &text)?;
        info!(bytes = text.len(), "Backed up papers database");
        Ok(())
    }

    pub fn has_backup(&self) -> Result<bool> {
        self.backend.contains(BACKUP_KEY)
    }

    /// Copy the backup slot over the primary blob. Returns `false` when there is
    /// no backup to restore.
    pub fn restore_backup(&mut self) -> Result<bool> {
        let Some(text) = self.backend.get(BACKUP_KEY)? else {
            warn!("Restore skipped, no backup present");
            return Ok(false);
        };
        self.backend.set(PRIMARY_KEY, &text)?;
        self.cache.replace(None);
        info!(bytes = text.len(), "Restored papers database from backup");
        Ok(true)
    }

    /// Remove every record. The backup slot is left alone.
    ///
    /// An unreadable primary blob (e.g. after a bad import) is replaced by an empty
    /// database, so purge always leaves the store usable.
    pub fn purge(&mut self) -> Result<usize> {
        if let Err(PapersError::Parse(reason)) = self.snapshot().map(|_| ()) {
            warn!(%reason, "Papers database unreadable, resetting to empty");
            let empty = Snapshot::empty();
            self.backend.set(PRIMARY_KEY, &empty.to_text()?)?;
            self.cache.replace(Some(empty));
            return Ok(0);
        }

        let purged = self.mutate(|records| {
            let count = records.len();
            records.clear();
            count
        })?;
        info!(purged, "Purged papers database");
        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PapersError;
    use crate::model::Field;
    use crate::store::mem_backend::MemBackend;

    fn make_store() -> RecordStore<MemBackend> {
        RecordStore::with_backend(MemBackend::new())
    }

    fn t1() -> PaperFields {
        PaperFields {
            title: "T1".into(),
            authors: "A1".into(),
            year: "1999".into(),
            found: "F1".into(),
            notes: "N1".into(),
            points: "P1".into(),
            org_link: "http://x".into(),
            hl_link: "http://y".into(),
        }
    }

    fn titled(title: &str) -> PaperFields {
        PaperFields {
            title: title.into(),
            ..Default::default()
        }
    }

    // --- Basic CRUD Tests ---

    #[test]
    fn add_then_find_by_id_returns_same_fields() {
        let mut store = make_store();
        let added = store.add(t1()).unwrap();

        let found = store.find_by_id(&added.id).unwrap().unwrap();
        assert_eq!(found.fields, t1());
        assert_eq!(found.id, added.id);
        assert!(found.created_at.is_some());
    }

    #[test]
    fn add_accepts_empty_fields() {
        let mut store = make_store();
        let added = store.add(PaperFields::default()).unwrap();
        assert_eq!(added.fields, PaperFields::default());
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn add_generates_unique_ids() {
        let mut store = make_store();
        let a = store.add(titled("A")).unwrap();
        let b = store.add(titled("A")).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn find_preserves_insertion_order() {
        let mut store = make_store();
        for title in ["first", "second", "third"] {
            store.add(titled(title)).unwrap();
        }
        let titles: Vec<String> = store
            .find(&RecordFilter::all())
            .unwrap()
            .into_iter()
            .map(|r| r.fields.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn find_with_filter_and_no_match_is_empty() {
        let mut store = make_store();
        store.add(t1()).unwrap();
        store.add(titled("Other")).unwrap();

        let hits = store
            .find(&RecordFilter::all().with_field(Field::Year, "1999"))
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].fields.title, "T1");

        let none = store
            .find(&RecordFilter::all().with_field(Field::Year, "2042"))
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn find_on_fresh_store_is_empty() {
        let store = make_store();
        assert!(store.find(&RecordFilter::all()).unwrap().is_empty());
    }

    #[test]
    fn missing_id_is_absent_not_error() {
        let mut store = make_store();
        store.add(t1()).unwrap();

        let missing = Uuid::new_v4();
        assert!(store.find_by_id(&missing).unwrap().is_none());
        assert!(store.remove(&missing).unwrap().is_none());
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn update_overwrites_only_given_fields() {
        let mut store = make_store();
        let added = store.add(t1()).unwrap();

        let patch = RecordPatch::default()
            .with(Field::Notes, "rewritten")
            .with(Field::Year, "2000");
        let updated = store.update(&added.id, &patch).unwrap().unwrap();

        assert_eq!(updated.id, added.id);
        assert_eq!(updated.fields.notes, "rewritten");
        assert_eq!(updated.fields.year, "2000");
        assert_eq!(updated.fields.title, "T1");
        assert_eq!(updated.fields.hl_link, "http://y");
        assert_eq!(updated.created_at, added.created_at);

        let reloaded = store.find_by_id(&added.id).unwrap().unwrap();
        assert_eq!(reloaded, updated);
    }

    #[test]
    fn update_of_missing_id_is_a_no_op() {
        let mut store = make_store();
        store.add(t1()).unwrap();
        let before = store.export_snapshot().unwrap();

        let patch = RecordPatch::default().with(Field::Title, "X");
        assert!(store.update(&Uuid::new_v4(), &patch).unwrap().is_none());
        assert_eq!(store.export_snapshot().unwrap(), before);
    }

    #[test]
    fn remove_deletes_exactly_one() {
        let mut store = make_store();
        let a = store.add(titled("A")).unwrap();
        let b = store.add(titled("B")).unwrap();

        let removed = store.remove(&a.id).unwrap().unwrap();
        assert_eq!(removed.id, a.id);
        assert!(store.find_by_id(&a.id).unwrap().is_none());
        assert!(store.find_by_id(&b.id).unwrap().is_some());
        assert_eq!(store.len().unwrap(), 1);
    }

    // --- Persistence Tests ---

    #[test]
    fn mutations_write_through_to_backend() {
        let mut store = make_store();
        let added = store.add(t1()).unwrap();

        let reopened = RecordStore::with_backend(store.backend);
        let found = reopened.find_by_id(&added.id).unwrap().unwrap();
        assert_eq!(found.fields, t1());
    }

    #[test]
    fn load_is_lazy() {
        let store = make_store();
        assert!(!store.is_loaded());
        store.len().unwrap();
        assert!(store.is_loaded());
    }

    // --- Snapshot Lifecycle Tests ---

    #[test]
    fn export_of_fresh_store_is_empty_database() {
        let store = make_store();
        let text = store.export_snapshot().unwrap();
        let snapshot = Snapshot::parse(&text).unwrap();
        assert!(snapshot.papers().is_some());
        assert!(snapshot.records().is_empty());
    }

    #[test]
    fn export_returns_persisted_bytes() {
        let mut store = make_store();
        store.add(t1()).unwrap();
        let raw = store.backend.get(PRIMARY_KEY).unwrap().unwrap();
        assert_eq!(store.export_snapshot().unwrap(), raw);
    }

    #[test]
    fn export_import_round_trip_keeps_records() {
        let mut store = make_store();
        store.add(t1()).unwrap();
        store.add(titled("Second")).unwrap();
        let before = store.find(&RecordFilter::all()).unwrap();

        let text = store.export_snapshot().unwrap();
        store.import_snapshot(&text).unwrap();

        assert_eq!(store.find(&RecordFilter::all()).unwrap(), before);
    }

    #[test]
    fn import_replaces_instead_of_merging() {
        let mut source = make_store();
        source.add(titled("From elsewhere")).unwrap();
        let text = source.export_snapshot().unwrap();

        let mut store = make_store();
        store.add(titled("Local")).unwrap();
        store.import_snapshot(&text).unwrap();

        let records = store.find(&RecordFilter::all()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fields.title, "From elsewhere");
    }

    #[test]
    fn malformed_import_is_accepted_and_fails_on_next_load() {
        let mut store = make_store();
        store.add(t1()).unwrap();

        store.import_snapshot("this is not json").unwrap();
        assert!(!store.is_loaded());
        assert_eq!(store.export_snapshot().unwrap(), "this is not json");

        let err = store.find(&RecordFilter::all()).unwrap_err();
        assert!(matches!(err, PapersError::Parse(_)));

        // Still broken until a good snapshot is imported
        assert!(store.add(t1()).is_err());
        store.import_snapshot(&Snapshot::empty().to_text().unwrap()).unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn import_without_papers_collection_loads_empty() {
        let mut store = make_store();
        store
            .import_snapshot(r#"{"filename": "papers.db", "collections": []}"#)
            .unwrap();
        assert!(store.find(&RecordFilter::all()).unwrap().is_empty());

        store.add(titled("New")).unwrap();
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn import_accepts_browser_exports() {
        let mut store = make_store();
        store
            .import_snapshot(
                r#"{
                    "filename": "papers.db",
                    "collections": [{
                        "name": "papers",
                        "data": [{
                            "title": "Old paper",
                            "authors": "Someone",
                            "_id": "0b0c7a5e-4a4e-4c0b-9f57-2f3f1c1d9a11",
                            "meta": {"revision": 2, "created": 1553000000000, "version": 0},
                            "$loki": 1
                        }],
                        "idIndex": [1],
                        "maxId": 1
                    }],
                    "databaseVersion": 1.5
                }"#,
            )
            .unwrap();

        let id = Uuid::parse_str("0b0c7a5e-4a4e-4c0b-9f57-2f3f1c1d9a11").unwrap();
        let record = store.find_by_id(&id).unwrap().unwrap();
        assert_eq!(record.fields.title, "Old paper");
        assert_eq!(record.fields.notes, "");
    }

    #[test]
    fn purge_empties_store_but_keeps_backup() {
        let mut store = make_store();
        store.add(t1()).unwrap();
        store.add(titled("B")).unwrap();
        store.backup().unwrap();

        assert_eq!(store.purge().unwrap(), 2);
        assert!(store.find(&RecordFilter::all()).unwrap().is_empty());
        assert!(store.has_backup().unwrap());

        assert!(store.restore_backup().unwrap());
        let titles: Vec<String> = store
            .find(&RecordFilter::all())
            .unwrap()
            .into_iter()
            .map(|r| r.fields.title)
            .collect();
        assert_eq!(titles, vec!["T1", "B"]);
    }

    #[test]
    fn purge_keeps_store_usable() {
        let mut store = make_store();
        store.add(t1()).unwrap();
        store.purge().unwrap();
        store.add(titled("After")).unwrap();
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn purge_resets_unreadable_database() {
        let mut store = make_store();
        store.add(t1()).unwrap();
        store.import_snapshot("this is not json").unwrap();

        assert_eq!(store.purge().unwrap(), 0);
        assert!(store.find(&RecordFilter::all()).unwrap().is_empty());
        assert!(Snapshot::parse(&store.export_snapshot().unwrap()).is_ok());

        store.add(titled("After")).unwrap();
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn failed_reset_keeps_unreadable_blob() {
        let mut store = make_store();
        store.add(t1()).unwrap();
        store.import_snapshot("this is not json").unwrap();
        store.backend.set_simulate_write_error(true);

        assert!(matches!(store.purge(), Err(PapersError::Storage(_))));
        store.backend.set_simulate_write_error(false);
        assert_eq!(store.export_snapshot().unwrap(), "this is not json");
    }

    #[test]
    fn backup_overwrites_previous_backup() {
        let mut store = make_store();
        store.add(titled("one")).unwrap();
        store.backup().unwrap();
        store.add(titled("two")).unwrap();
        store.backup().unwrap();
        store.purge().unwrap();

        store.restore_backup().unwrap();
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn restore_without_backup_is_a_no_op() {
        let mut store = make_store();
        store.add(t1()).unwrap();
        assert!(!store.restore_backup().unwrap());
        assert_eq!(store.len().unwrap(), 1);
    }

    // --- Error Handling Tests ---

    #[test]
    fn add_fails_on_write_error_and_leaves_store_unchanged() {
        let mut store = make_store();
        store.add(titled("kept")).unwrap();

        store.backend.set_simulate_write_error(true);
        let err = store.add(t1()).unwrap_err();
        assert!(matches!(err, PapersError::Storage(_)));

        store.backend.set_simulate_write_error(false);
        let records = store.find(&RecordFilter::all()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fields.title, "kept");
    }

    #[test]
    fn snapshot_operations_report_storage_failures() {
        let mut store = make_store();
        store.add(t1()).unwrap();

        store.backend.set_simulate_write_error(true);
        assert!(store.backup().is_err());
        assert!(store.import_snapshot("{}").is_err());

        store.backend.set_simulate_read_error(true);
        assert!(store.export_snapshot().is_err());
    }
}
