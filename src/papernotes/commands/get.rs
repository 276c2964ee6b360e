use crate::commands::{indexed_records, records_by_selectors, CmdMessage, CmdResult};
use crate::error::Result;
use crate::filter::RecordFilter;
use crate::index::{DisplayRecord, RecordSelector};
use crate::store::backend::StorageBackend;
use crate::store::RecordStore;

/// List records matching `filter`, numbered by their position in the full listing.
pub fn run<B: StorageBackend>(store: &RecordStore<B>, filter: &RecordFilter) -> Result<CmdResult> {
    let listed: Vec<DisplayRecord> = if filter.is_match_all() {
        indexed_records(store)?
    } else {
        let matching = store.find(filter)?;
        indexed_records(store)?
            .into_iter()
            .filter(|dr| matching.iter().any(|r| r.id == dr.record.id))
            .collect()
    };

    let mut result = CmdResult::default();
    if listed.is_empty() {
        result.add_message(CmdMessage::info("No records found."));
    }
    Ok(result.with_listed_records(listed))
}

/// Show the records named by `selectors`.
pub fn view<B: StorageBackend>(
    store: &RecordStore<B>,
    selectors: &[RecordSelector],
) -> Result<CmdResult> {
    let selected = records_by_selectors(store, selectors)?;
    Ok(CmdResult::default().with_listed_records(selected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Field, PaperFields};
    use crate::store::fixtures::StoreFixture;

    #[test]
    fn lists_all_in_store_order() {
        let fixture = StoreFixture::new().with_papers(3);
        let result = run(&fixture.store, &RecordFilter::all()).unwrap();

        let titles: Vec<&str> = result
            .listed_records
            .iter()
            .map(|dr| dr.record.title())
            .collect();
        assert_eq!(titles, vec!["Paper 1", "Paper 2", "Paper 3"]);
        assert!(result.messages.is_empty());
    }

    #[test]
    fn filtered_list_keeps_full_listing_positions() {
        let fixture = StoreFixture::new().with_papers(3);
        let filter = RecordFilter::all().with_field(Field::Year, "2002");
        let result = run(&fixture.store, &filter).unwrap();

        assert_eq!(result.listed_records.len(), 1);
        assert_eq!(result.listed_records[0].index, 3);
        assert_eq!(result.listed_records[0].record.title(), "Paper 3");
    }

    #[test]
    fn empty_result_has_info_message() {
        let fixture = StoreFixture::new();
        let result = run(&fixture.store, &RecordFilter::all()).unwrap();
        assert!(result.listed_records.is_empty());
        assert_eq!(result.messages[0].content, "No records found.");
    }

    #[test]
    fn view_resolves_selectors_once_each() {
        let fixture = StoreFixture::new()
            .with_papers(2)
            .with_paper(PaperFields {
                title: "Third".into(),
                ..Default::default()
            });
        let selectors = vec![
            RecordSelector::Index(3),
            RecordSelector::Index(1),
            RecordSelector::Index(3),
        ];
        let result = view(&fixture.store, &selectors).unwrap();

        let indexes: Vec<usize> = result.listed_records.iter().map(|dr| dr.index).collect();
        assert_eq!(indexes, vec![3, 1]);
        assert_eq!(result.listed_records[0].record.title(), "Third");
    }

    #[test]
    fn view_fails_for_unknown_index() {
        let fixture = StoreFixture::new().with_papers(1);
        assert!(view(&fixture.store, &[RecordSelector::Index(5)]).is_err());
    }
}
