use super::backend::StorageBackend;
use crate::error::{PapersError, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since the catalog is single-threaded,
/// so the `StorageBackend` trait can use `&self` for all methods.
#[derive(Default)]
pub struct MemBackend {
    entries: RefCell<HashMap<String, String>>,
    simulate_write_error: Cell<bool>,
    simulate_read_error: Cell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation (e.g. quota exceeded).
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Enable read error simulation (e.g. storage unavailable).
    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.set(simulate);
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl StorageBackend for MemBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.simulate_read_error.get() {
            return Err(PapersError::Storage("Simulated read error".to_string()));
        }
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(PapersError::Storage("Simulated write error".to_string()));
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get() {
        let backend = MemBackend::new();
        assert_eq!(backend.get("k").unwrap(), None);

        backend.set("k", "v").unwrap();
        assert_eq!(backend.get("k").unwrap().as_deref(), Some("v"));
        assert!(backend.contains("k").unwrap());
        assert!(!backend.contains("other").unwrap());
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn simulated_failures() {
        let backend = MemBackend::new();
        backend.set("k", "v").unwrap();

        backend.set_simulate_write_error(true);
        assert!(matches!(backend.set("k", "w"), Err(PapersError::Storage(_))));
        assert_eq!(backend.get("k").unwrap().as_deref(), Some("v"));

        backend.set_simulate_read_error(true);
        assert!(matches!(backend.get("k"), Err(PapersError::Storage(_))));
    }
}
