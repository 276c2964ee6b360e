use crate::config::PapersConfig;
use crate::error::Result;
use crate::filter::RecordFilter;
use crate::index::{index_records, resolve, DisplayRecord, RecordSelector};
use crate::model::Record;
use crate::store::backend::StorageBackend;
use crate::store::RecordStore;
use std::path::PathBuf;

pub mod add;
pub mod config;
pub mod data;
pub mod get;
pub mod remove;
pub mod report;
pub mod update;

#[derive(Debug, Clone)]
pub struct PapersPaths {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_records: Vec<Record>,
    pub listed_records: Vec<DisplayRecord>,
    /// Raw database text produced by `export`
    pub snapshot: Option<String>,
    /// CSV text produced by `csv`
    pub report: Option<String>,
    pub config: Option<PapersConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_records(mut self, records: Vec<Record>) -> Self {
        self.affected_records = records;
        self
    }

    pub fn with_listed_records(mut self, records: Vec<DisplayRecord>) -> Self {
        self.listed_records = records;
        self
    }

    pub fn with_config(mut self, config: PapersConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|m| m.level == MessageLevel::Error)
    }
}

/// All records, numbered in store order.
pub(crate) fn indexed_records<B: StorageBackend>(
    store: &RecordStore<B>,
) -> Result<Vec<DisplayRecord>> {
    Ok(index_records(store.find(&RecordFilter::all())?))
}

/// Resolve each selector against the full listing, keeping the given order and
/// dropping repeats.
pub(crate) fn records_by_selectors<B: StorageBackend>(
    store: &RecordStore<B>,
    selectors: &[RecordSelector],
) -> Result<Vec<DisplayRecord>> {
    let indexed = indexed_records(store)?;
    let mut selected: Vec<DisplayRecord> = Vec::new();
    for selector in selectors {
        let hit = resolve(&indexed, selector)?;
        if !selected.iter().any(|dr| dr.record.id == hit.record.id) {
            selected.push(hit.clone());
        }
    }
    Ok(selected)
}
