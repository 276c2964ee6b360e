//! # Snapshot Format
//!
//! The whole catalog is persisted as one JSON document:
//!
//! ```text
//! {
//!   "filename": "papers.db",
//!   "collections": [
//!     { "name": "papers", "data": [ { "id": "...", "title": "...", ... } ] }
//!   ]
//! }
//! ```
//!
//! Only the `papers` collection is read as records. Any other collection in an
//! imported document is kept as raw JSON, whatever its entries look like, and written
//! back in its original position with the next change.

use crate::error::{PapersError, Result};
use crate::model::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DATABASE_NAME: &str = "papers.db";
pub const COLLECTION_NAME: &str = "papers";

/// A collection as it appears on disk. Entries stay untyped until needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    #[serde(default)]
    pub data: Vec<Value>,
}

impl Collection {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            data: Vec::new(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Document {
    #[serde(default = "default_filename")]
    filename: String,
    collections: Vec<Collection>,
}

fn default_filename() -> String {
    DATABASE_NAME.to_string()
}

/// A parsed database: the typed `papers` records plus every other collection as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub filename: String,
    /// All collections in document order. The `papers` entry, when present, is a
    /// placeholder whose data lives in `records`.
    collections: Vec<Collection>,
    records: Option<Vec<Record>>,
}

impl Snapshot {
    /// A database holding a single, empty `papers` collection.
    pub fn empty() -> Self {
        Self {
            filename: default_filename(),
            collections: vec![Collection::new(COLLECTION_NAME)],
            records: Some(Vec::new()),
        }
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut doc: Document = serde_json::from_str(text)
            .map_err(|e| PapersError::Parse(format!("malformed papers database: {}", e)))?;

        let records = match doc
            .collections
            .iter_mut()
            .find(|c| c.name == COLLECTION_NAME)
        {
            Some(papers) => Some(
                std::mem::take(&mut papers.data)
                    .into_iter()
                    .map(|entry| {
                        serde_json::from_value::<Record>(entry).map_err(|e| {
                            PapersError::Parse(format!("malformed paper record: {}", e))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
            None => None,
        };

        Ok(Self {
            filename: doc.filename,
            collections: doc.collections,
            records,
        })
    }

    pub fn to_text(&self) -> Result<String> {
        let mut collections = self.collections.clone();
        if let Some(records) = &self.records {
            if let Some(papers) = collections.iter_mut().find(|c| c.name == COLLECTION_NAME) {
                papers.data = records
                    .iter()
                    .map(serde_json::to_value)
                    .collect::<std::result::Result<_, _>>()?;
            }
        }

        let doc = Document {
            filename: self.filename.clone(),
            collections,
        };
        serde_json::to_string_pretty(&doc).map_err(PapersError::Serialization)
    }

    /// Names of all collections, in document order.
    pub fn collection_names(&self) -> Vec<&str> {
        self.collections.iter().map(|c| c.name.as_str()).collect()
    }

    /// The `papers` records, or `None` when the document has no such collection.
    pub fn papers(&self) -> Option<&[Record]> {
        self.records.as_deref()
    }

    /// Add an empty `papers` collection when the document does not have one yet.
    pub fn ensure_papers(&mut self) {
        if self.records.is_none() {
            self.collections.push(Collection::new(COLLECTION_NAME));
            self.records = Some(Vec::new());
        }
    }

    pub fn records(&self) -> &[Record] {
        self.papers().unwrap_or(&[])
    }

    pub fn records_mut(&mut self) -> &mut Vec<Record> {
        self.ensure_papers();
        self.records.get_or_insert_with(Vec::new)
    }
}
