//! CSV report over a database snapshot.
//!
//! The report is a flat, six-column view (links are left out). Values are not quoted;
//! instead every comma and newline inside a value is replaced with `" | "`, so a row
//! is always exactly one line with exactly six columns.

use crate::error::{PapersError, Result};
use crate::model::Field;
use crate::snapshot::{Snapshot, COLLECTION_NAME};
use once_cell::sync::Lazy;

pub const COLUMNS: [Field; 6] = [
    Field::Title,
    Field::Year,
    Field::Authors,
    Field::Found,
    Field::Notes,
    Field::Points,
];

const SEPARATOR: &str = ", ";
const FLATTENED: &str = " | ";

pub static HEADER: Lazy<String> = Lazy::new(|| {
    COLUMNS
        .iter()
        .map(|f| f.as_str().to_uppercase())
        .collect::<Vec<_>>()
        .join(SEPARATOR)
});

fn flatten(value: &str) -> String {
    value.replace(',', FLATTENED).replace('\n', FLATTENED)
}

/// Project the `papers` collection of `snapshot_text` to CSV text.
///
/// Output is the header line followed by one line per record, in collection order.
pub fn to_csv(snapshot_text: &str) -> Result<String> {
    let snapshot = Snapshot::parse(snapshot_text)?;
    let papers = snapshot.papers().ok_or_else(|| {
        PapersError::Parse(format!("no collection named '{}'", COLLECTION_NAME))
    })?;

    let rows: Vec<String> = papers
        .iter()
        .map(|record| {
            COLUMNS
                .iter()
                .map(|f| flatten(record.fields.get(*f)))
                .collect::<Vec<_>>()
                .join(SEPARATOR)
        })
        .collect();

    Ok(format!("{}\n{}", *HEADER, rows.join("\n")))
}
