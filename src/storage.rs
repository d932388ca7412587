//! Browser local storage backend for the session gate

use study_sync::{SessionStorage, SyncError, SyncResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

impl SessionStorage for BrowserStorage {
    fn load(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok().flatten()
    }

    fn save(&self, key: &str, value: &str) -> SyncResult<()> {
        let storage = local_storage().ok_or_else(|| SyncError::validation("Local storage is unavailable"))?;
        storage
            .set_item(key, value)
            .map_err(|_| SyncError::validation("Could not save your session"))
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(key);
        }
    }
}
