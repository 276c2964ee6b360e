use crate::error::Result;

/// Abstract interface for the raw key/value substrate.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while RecordStore handles the "what" (collection, snapshots, backups).
pub trait StorageBackend {
    /// Read the text stored under `key`.
    /// Returns Ok(None) if nothing was ever written there.
    /// Returns Err only on actual failures (permissions, disk failure).
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace whatever is stored under `key`.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}
