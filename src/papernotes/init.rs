use crate::api::{PapersApi, PapersPaths};
use crate::config::PapersConfig;
use crate::error::{PapersError, Result};
use crate::store::fs_backend::FsBackend;
use crate::store::RecordStore;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Overrides the platform data directory.
pub const HOME_ENV: &str = "PAPERS_HOME";

pub struct PapersContext {
    pub api: PapersApi<FsBackend>,
    pub config: PapersConfig,
}

/// Where the database lives: `$PAPERS_HOME` if set, else the platform data directory
/// (e.g. `~/.local/share/papernotes` on Linux).
pub fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "papernotes", "papernotes")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| PapersError::Storage("Could not determine data directory".to_string()))
}

/// Build the one store for this process, rooted at `data_dir`.
pub fn initialize(data_dir: &Path) -> PapersContext {
    debug!(path = %data_dir.display(), "Opening papers catalog");

    let config = PapersConfig::load(data_dir).unwrap_or_else(|e| {
        warn!(error = %e, "Ignoring unreadable config, using defaults");
        PapersConfig::default()
    });

    let store = RecordStore::with_backend(FsBackend::new(data_dir.to_path_buf()));
    let paths = PapersPaths {
        data_dir: data_dir.to_path_buf(),
    };
    let api = PapersApi::new(store, paths);

    PapersContext { api, config }
}
