use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Session-scoped key holding the name of the last selected city.
pub const LAST_CITY_KEY: &str = "cravelle:lastCity";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    StorageUnavailable,
    Io(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::StorageUnavailable => write!(f, "browser storage unavailable"),
            StoreError::Io(msg) => write!(f, "session storage error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Remembers which point of interest was selected last.
///
/// Values are opaque names; validating them against the known points is the
/// caller's job.
pub trait SelectionStore {
    fn load(&self) -> Result<Option<String>, StoreError>;
    fn save(&mut self, name: &str) -> Result<(), StoreError>;
}

/// In-process store keyed like browser storage.
///
/// Clones share the same slots, the way two components in one tab share
/// `sessionStorage`.
#[derive(Debug, Clone)]
pub struct InMemorySelectionStore {
    key: String,
    slots: Rc<RefCell<BTreeMap<String, String>>>,
}

impl Default for InMemorySelectionStore {
    fn default() -> Self {
        Self::new(LAST_CITY_KEY)
    }
}

impl InMemorySelectionStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            slots: Rc::new(RefCell::new(BTreeMap::new())),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Writes a raw value, bypassing any validation (simulates a stale or
    /// hand-edited entry).
    pub fn put_raw(&self, value: impl Into<String>) {
        self.slots.borrow_mut().insert(self.key.clone(), value.into());
    }
}

impl SelectionStore for InMemorySelectionStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slots.borrow().get(&self.key).cloned())
    }

    fn save(&mut self, name: &str) -> Result<(), StoreError> {
        self.slots
            .borrow_mut()
            .insert(self.key.clone(), name.to_string());
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_storage {
    use super::{SelectionStore, StoreError};

    #[derive(Debug)]
    pub struct SessionStorageSelectionStore {
        key: String,
    }

    impl SessionStorageSelectionStore {
        pub fn new(key: impl Into<String>) -> Result<Self, StoreError> {
            // Probe once so callers can tell "no storage" apart from "nothing stored".
            window_session_storage()?;
            Ok(Self { key: key.into() })
        }
    }

    impl SelectionStore for SessionStorageSelectionStore {
        fn load(&self) -> Result<Option<String>, StoreError> {
            let storage = window_session_storage()?;
            let raw = storage
                .get_item(&self.key)
                .map_err(|e| StoreError::Io(format!("get_item failed: {:?}", e)))?;
            Ok(raw.filter(|v| !v.trim().is_empty()))
        }

        fn save(&mut self, name: &str) -> Result<(), StoreError> {
            let storage = window_session_storage()?;
            storage
                .set_item(&self.key, name)
                .map_err(|e| StoreError::Io(format!("set_item failed: {:?}", e)))
        }
    }

    fn window_session_storage() -> Result<web_sys::Storage, StoreError> {
        let win = web_sys::window().ok_or(StoreError::StorageUnavailable)?;
        win.session_storage()
            .map_err(|e| StoreError::Io(format!("sessionStorage error: {:?}", e)))?
            .ok_or(StoreError::StorageUnavailable)
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_storage::SessionStorageSelectionStore;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct SessionStorageSelectionStore;

#[cfg(not(target_arch = "wasm32"))]
impl SessionStorageSelectionStore {
    pub fn new(_key: impl Into<String>) -> Result<Self, StoreError> {
        Err(StoreError::StorageUnavailable)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl SelectionStore for SessionStorageSelectionStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Err(StoreError::StorageUnavailable)
    }

    fn save(&mut self, _name: &str) -> Result<(), StoreError> {
        Err(StoreError::StorageUnavailable)
    }
}

/// Store that fails every call, for exercising the "storage blocked" path.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableSelectionStore;

impl SelectionStore for UnavailableSelectionStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Err(StoreError::StorageUnavailable)
    }

    fn save(&mut self, _name: &str) -> Result<(), StoreError> {
        Err(StoreError::StorageUnavailable)
    }
}
