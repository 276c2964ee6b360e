//! # Storage Layer
//!
//! The catalog is persisted through a tiny key/value substrate, abstracted by the
//! [`backend::StorageBackend`] trait (`get` / `set` by string key).
//! [`record_store::RecordStore`] sits on top of it and owns the record collection.
//!
//! ## Persisted Keys
//!
//! ```text
//! <data dir>/
//! ├── papers.db           # Primary blob: the whole database as JSON
//! ├── papers.db.backup    # Backup slot: copy of papers.db taken by `backup`
//! └── config.json         # Configuration (not managed by the store)
//! ```
//!
//! ## Load and Write Model
//!
//! - **Lazy load**: the primary blob is parsed on first access and cached.
//! - **Write-through**: every mutation (`add`, `update`, `remove`, `purge`) re-serializes
//!   the collection and writes it back immediately. If that write fails the cache is
//!   dropped, so memory never runs ahead of what was persisted.
//! - **Wholesale replacement**: `import_snapshot` and `restore_backup` overwrite the
//!   primary blob without looking at it and mark the cache unloaded. A malformed blob
//!   therefore surfaces as a parse error on the *next* operation, not on import.
//!
//! ## Misses
//!
//! Lookups by id never fail for an unknown id: `find_by_id`, `update` and `remove`
//! return `Ok(None)` and leave the store untouched.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: one file per key in the data directory, atomic writes.
//! - [`mem_backend::MemBackend`]: in-memory, with failure simulation for tests.

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod record_store;

pub use record_store::{RecordStore, BACKUP_KEY, PRIMARY_KEY};

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::mem_backend::MemBackend;
    use super::RecordStore;
    use crate::model::PaperFields;

    pub struct StoreFixture {
        pub store: RecordStore<MemBackend>,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: RecordStore::with_backend(MemBackend::new()),
            }
        }

        pub fn with_papers(mut self, count: usize) -> Self {
            for i in 0..count {
                self.store
                    .add(PaperFields {
                        title: format!("Paper {}", i + 1),
                        authors: format!("Author {}", i + 1),
                        year: format!("{}", 2000 + i),
                        ..Default::default()
                    })
                    .unwrap();
            }
            self
        }

        pub fn with_paper(mut self, fields: PaperFields) -> Self {
            self.store.add(fields).unwrap();
            self
        }
    }
}
