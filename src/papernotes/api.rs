//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single entry point
//! for every catalog operation, whatever UI sits on top.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (selector strings → [`RecordSelector`]s)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## Fail-soft Database Operations
//!
//! `export`, `import`, `backup`, `restore` and `purge` never return `Err`. A storage or
//! parse failure is logged and turned into an error-level [`CmdMessage`] on an otherwise
//! empty result. Callers that need to branch on failure use
//! [`CmdResult::has_errors`]. Every other operation propagates errors normally, and
//! the CSV report in particular fails synchronously on a malformed database.
//!
//! ## Generic Over StorageBackend
//!
//! `PapersApi<B: StorageBackend>` is generic over the storage backend:
//! - Production: `PapersApi<FsBackend>`
//! - Testing: `PapersApi<MemBackend>`

use crate::commands;
use crate::error::Result;
use crate::filter::RecordFilter;
use crate::index::RecordSelector;
use crate::model::{PaperFields, RecordPatch};
use crate::store::backend::StorageBackend;
use crate::store::RecordStore;
use tracing::{error, warn};

/// The main API facade for catalog operations.
///
/// All UI clients (CLI, web, etc.) should interact through this API.
pub struct PapersApi<B: StorageBackend> {
    store: RecordStore<B>,
    paths: commands::PapersPaths,
}

impl<B: StorageBackend> PapersApi<B> {
    pub fn new(store: RecordStore<B>, paths: commands::PapersPaths) -> Self {
        Self { store, paths }
    }

    pub fn add(&mut self, fields: PaperFields) -> Result<commands::CmdResult> {
        commands::add::run(&mut self.store, fields)
    }

    pub fn list(&self, filter: &RecordFilter) -> Result<commands::CmdResult> {
        commands::get::run(&self.store, filter)
    }

    pub fn view<I: AsRef<str>>(&self, selectors: &[I]) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(selectors)?;
        commands::get::view(&self.store, &selectors)
    }

    pub fn update(&mut self, selector: &str, patch: &RecordPatch) -> Result<commands::CmdResult> {
        let selector: RecordSelector = selector.parse()?;
        commands::update::run(&mut self.store, &selector, patch)
    }

    pub fn remove<I: AsRef<str>>(&mut self, selectors: &[I]) -> Result<commands::CmdResult> {
        let selectors = parse_selectors(selectors)?;
        commands::remove::run(&mut self.store, &selectors)
    }

    pub fn export(&self) -> Result<commands::CmdResult> {
        fail_soft("Export", commands::data::export(&self.store))
    }

    pub fn import(&mut self, text: &str, backup_first: bool) -> Result<commands::CmdResult> {
        fail_soft(
            "Import",
            commands::data::import(&mut self.store, text, backup_first),
        )
    }

    pub fn backup(&self) -> Result<commands::CmdResult> {
        fail_soft("Backup", commands::data::backup(&self.store))
    }

    pub fn restore(&mut self) -> Result<commands::CmdResult> {
        fail_soft("Restore", commands::data::restore(&mut self.store))
    }

    pub fn purge(&mut self) -> Result<commands::CmdResult> {
        fail_soft("Purge", commands::data::purge(&mut self.store))
    }

    /// Records a purge would remove, or `None` when the database cannot be read.
    pub fn purge_count(&self) -> Option<usize> {
        match self.store.len() {
            Ok(count) => Some(count),
            Err(e) => {
                warn!(error = %e, "Could not count records before purge");
                None
            }
        }
    }

    pub fn csv(&self) -> Result<commands::CmdResult> {
        commands::report::run(&self.store)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn paths(&self) -> &commands::PapersPaths {
        &self.paths
    }

    pub fn store(&self) -> &RecordStore<B> {
        &self.store
    }
}

fn parse_selectors<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<RecordSelector>> {
    inputs.iter().map(|s| s.as_ref().parse()).collect()
}

fn fail_soft(
    action: &str,
    outcome: Result<commands::CmdResult>,
) -> Result<commands::CmdResult> {
    match outcome {
        Ok(result) => Ok(result),
        Err(e) => {
            error!(action, error = %e, "Database operation failed");
            let mut result = commands::CmdResult::default();
            result.add_message(CmdMessage::error(format!("{} failed: {}", action, e)));
            Ok(result)
        }
    }
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, MessageLevel, PapersPaths};
